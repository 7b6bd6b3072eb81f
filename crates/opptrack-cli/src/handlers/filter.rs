use anyhow::Result;
use opptrack_runtime::Selection;
use std::collections::BTreeMap;

use super::HandlerContext;
use crate::args::{FilterAction, FilterCommand};
use crate::presentation::views::{FilterView, short_id};

/// One filter dimension: its universe of ids and how keys resolve into it
struct Dimension {
    name: &'static str,
    universe: Vec<String>,
    labels: BTreeMap<String, String>,
}

impl Dimension {
    fn companies(ctx: &HandlerContext) -> Result<Self> {
        let companies = ctx.tracker.companies().list()?;
        Ok(Self {
            name: "Company",
            universe: companies.iter().map(|c| c.id.clone()).collect(),
            labels: companies
                .into_iter()
                .map(|c| (c.id, format!("{} ({})", c.name, c.slug)))
                .collect(),
        })
    }

    fn opportunities(ctx: &HandlerContext) -> Result<Self> {
        let rows = ctx.tracker.opportunities().list_all()?;
        Ok(Self {
            name: "Opportunity",
            universe: rows.iter().map(|o| o.id.clone()).collect(),
            labels: rows
                .into_iter()
                .map(|o| {
                    let label = format!("{} ({})", o.name, short_id(&o.id));
                    (o.id, label)
                })
                .collect(),
        })
    }

    fn label(&self, id: &str) -> String {
        self.labels
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("{} (missing)", id))
    }
}

pub fn handle(ctx: &HandlerContext, command: FilterCommand) -> Result<()> {
    let mut state = ctx.tracker.load_view_state();

    let (dimension, action, is_company) = match command {
        FilterCommand::Company { action } => (Dimension::companies(ctx)?, action, true),
        FilterCommand::Opportunity { action } => (Dimension::opportunities(ctx)?, action, false),
    };

    let resolve = |key: &str| -> Result<String> {
        if is_company {
            Ok(ctx.tracker.companies().resolve(key)?.id)
        } else {
            Ok(ctx.tracker.opportunities().resolve(key)?.id)
        }
    };

    let selection = if is_company {
        &mut state.company_filter
    } else {
        &mut state.opportunity_filter
    };

    let changed = match action {
        FilterAction::All => {
            selection.reset();
            true
        }
        FilterAction::SelectAll => {
            selection.select_all(&dimension.universe);
            true
        }
        FilterAction::Only { ids } => {
            let ids = ids
                .iter()
                .map(|key| resolve(key))
                .collect::<Result<Vec<_>>>()?;
            *selection = Selection::only(ids);
            true
        }
        FilterAction::Toggle { id } => {
            let id = resolve(&id)?;
            selection.toggle(&id, &dimension.universe);
            true
        }
        FilterAction::Clear => {
            selection.clear_all();
            true
        }
        FilterAction::Show => false,
    };

    let view = FilterView {
        dimension: dimension.name,
        labels: selection.ids.iter().map(|id| dimension.label(id)).collect(),
        selection: selection.clone(),
    };

    if changed {
        ctx.tracker.save_view_state(&state)?;
    }
    ctx.render(&view)
}
