use anyhow::{Result, bail};
use opptrack_runtime::view::group_by_month;
use opptrack_runtime::{OpportunityForm, SettleOutcome, Summary, TableSort, Tracker, ViewState};
use opptrack_types::{CompanyRef, DemoLink, DemoLinks, FieldPatch, OpportunityField};
use std::collections::BTreeMap;

use super::HandlerContext;
use crate::args::{OppCommand, OppFieldArgs, SortArg, direction};
use crate::handlers::export;
use crate::presentation::views::{
    ColumnChars, DeletedView, EditView, LinkRow, MovedView, OpportunityDetailView,
    OpportunityTableView, SavedView, TimelineView, filter_line,
};

pub fn handle(ctx: &HandlerContext, command: OppCommand) -> Result<()> {
    match command {
        OppCommand::Add {
            name,
            fields,
            links,
        } => add(ctx, name, &fields, &links),
        OppCommand::List {
            sort,
            desc,
            summary,
        } => list(ctx, sort, desc, summary),
        OppCommand::Show { id } => show(ctx, &id),
        OppCommand::Set { id, field, value } => set(ctx, &id, &field, &value),
        OppCommand::Edit {
            id,
            name,
            fields,
            clear_company,
        } => edit(ctx, &id, name, &fields, clear_company),
        OppCommand::Delete { id } => delete(ctx, &id),
        OppCommand::Move { id, position } => move_to(ctx, &id, position),
        OppCommand::Timeline => timeline(ctx),
        OppCommand::Export { to, output } => export::handle(ctx, to, output.as_deref()),
    }
}

fn add(ctx: &HandlerContext, name: String, fields: &OppFieldArgs, links: &[String]) -> Result<()> {
    let mut form = OpportunityForm::create(name);
    apply_fields(&ctx.tracker, &mut form, fields)?;
    for raw in links {
        let link = DemoLink::parse(raw);
        form.add_link(&link.label, &link.url)?;
    }

    let opportunity = ctx.tracker.opportunities().create(&form)?;
    ctx.render(&SavedView {
        action: "Created",
        opportunity,
    })
}

fn list(ctx: &HandlerContext, sort: Option<SortArg>, desc: bool, summary: bool) -> Result<()> {
    let mut state = ctx.tracker.load_view_state();
    if let Some(key) = sort {
        state.sort = TableSort::new(key.into(), direction(desc));
    }

    let rows = ctx.tracker.opportunities().list(&state)?;
    let filters_active = !state.company_filter.is_all() || !state.opportunity_filter.is_all();
    let filter_line = if !state.sidebar_collapsed && filters_active {
        Some(filter_line(&state, &company_names(&ctx.tracker)?))
    } else {
        None
    };

    ctx.render(&OpportunityTableView {
        summary: summary.then(|| Summary::from_rows(&rows)),
        opportunities: rows,
        columns: ColumnChars::from_state(&state),
        filter_line,
    })
}

fn show(ctx: &HandlerContext, key: &str) -> Result<()> {
    let opportunity = ctx.tracker.opportunities().resolve(key)?;
    let links = LinkRow::rows(DemoLinks::from_raw(&opportunity.demo_links).links());
    let attachments = ctx.tracker.attachments().list(&opportunity.id)?;

    ctx.render(&OpportunityDetailView {
        opportunity,
        links,
        attachments,
    })
}

/// Inline edit of one field through the optimistic table
fn set(ctx: &HandlerContext, key: &str, field: &str, value: &str) -> Result<()> {
    let ops = ctx.tracker.opportunities();
    let field: OpportunityField = field.parse()?;
    let id = ops.resolve(key)?.id;

    let patch = match field {
        OpportunityField::Company => FieldPatch::Company(company_ref(&ctx.tracker, value)?),
        _ => FieldPatch::parse(field, value)?,
    };

    // Edits target the unfiltered table; filters only shape listings.
    let state = ViewState::default();
    let mut table = ops.table(&state)?;
    let outcome = ops.edit(&mut table, &state, &id, patch.clone())?;

    let view = EditView::new(&id, &patch, &outcome.settled, table.row(&id));
    ctx.render(&view)?;

    if let SettleOutcome::Reverted { error, .. } = &outcome.settled {
        bail!("Edit of {} was reverted: {}", field, error);
    }
    Ok(())
}

fn edit(
    ctx: &HandlerContext,
    key: &str,
    name: Option<String>,
    fields: &OppFieldArgs,
    clear_company: bool,
) -> Result<()> {
    let ops = ctx.tracker.opportunities();
    let mut form = OpportunityForm::edit(&ops.resolve(key)?);

    if let Some(name) = name {
        form.draft.name = name;
    }
    if clear_company {
        form.draft.company = CompanyRef::none();
    }
    apply_fields(&ctx.tracker, &mut form, fields)?;

    let opportunity = ops.save(&form)?;
    ctx.render(&SavedView {
        action: "Updated",
        opportunity,
    })
}

fn delete(ctx: &HandlerContext, key: &str) -> Result<()> {
    let report = ctx.tracker.opportunities().delete(key)?;
    ctx.render(&DeletedView {
        id: report.id,
        attachments_removed: report.attachments_removed,
        orphaned_blobs: report.orphaned_blobs,
    })
}

fn move_to(ctx: &HandlerContext, key: &str, position: usize) -> Result<()> {
    let ops = ctx.tracker.opportunities();
    let id = ops.resolve(key)?.id;
    let changes = ops.move_to(&id, position)?;

    ctx.render(&MovedView {
        id,
        position,
        renumbered: changes.len(),
    })
}

fn timeline(ctx: &HandlerContext) -> Result<()> {
    let state = ctx.tracker.load_view_state();
    let rows = ctx.tracker.opportunities().list(&state)?;
    ctx.render(&TimelineView {
        groups: group_by_month(&rows),
    })
}

pub(crate) fn company_names(tracker: &Tracker) -> Result<BTreeMap<String, String>> {
    Ok(tracker
        .companies()
        .list()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

/// Company id or slug; empty detaches
fn company_ref(tracker: &Tracker, key: &str) -> Result<CompanyRef> {
    let key = key.trim();
    if key.is_empty() {
        return Ok(CompanyRef::none());
    }
    let company = tracker.companies().resolve(key)?;
    Ok(CompanyRef::from_company(&company))
}

fn apply_fields(
    tracker: &Tracker,
    form: &mut OpportunityForm,
    fields: &OppFieldArgs,
) -> Result<()> {
    if let Some(key) = &fields.company {
        form.draft.company = company_ref(tracker, key)?;
    }

    let phase = fields.phase.map(|p| p.to_string());
    let values = [
        (OpportunityField::Description, fields.description.as_deref()),
        (OpportunityField::Phase, phase.as_deref()),
        (OpportunityField::Status, fields.status.as_deref()),
        (OpportunityField::Messaging, fields.messaging.as_deref()),
        (OpportunityField::Campaign, fields.campaign.as_deref()),
        (OpportunityField::Pricing, fields.pricing.as_deref()),
        (OpportunityField::SalesAlignment, fields.sales_alignment.as_deref()),
        (OpportunityField::MarketSize, fields.market_size.as_deref()),
        (OpportunityField::TargetDate, fields.target_date.as_deref()),
        (OpportunityField::NextSteps, fields.next_steps.as_deref()),
    ];

    for (field, value) in values {
        if let Some(value) = value {
            FieldPatch::parse(field, value)?.apply_to_draft(&mut form.draft);
        }
    }
    Ok(())
}
