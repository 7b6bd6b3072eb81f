use opptrack_runtime::{FilterMode, Selection, SortDirection, TableSort, ViewState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::presentation::{Palette, View};

/// Sidebar summary shown above the table while it is expanded
pub fn filter_line(state: &ViewState, company_names: &BTreeMap<String, String>) -> String {
    let companies = match state.company_filter.mode {
        FilterMode::All => "all".to_string(),
        FilterMode::Selected if state.company_filter.ids.is_empty() => "none selected".to_string(),
        FilterMode::Selected => state
            .company_filter
            .ids
            .iter()
            .map(|id| company_names.get(id).cloned().unwrap_or_else(|| id.clone()))
            .collect::<Vec<_>>()
            .join(", "),
    };
    let opportunities = match state.opportunity_filter.mode {
        FilterMode::All => "all".to_string(),
        FilterMode::Selected => format!("{} selected", state.opportunity_filter.ids.len()),
    };
    format!("Companies: {}  |  Opportunities: {}", companies, opportunities)
}

#[derive(Serialize)]
pub struct FilterView {
    pub dimension: &'static str,
    #[serde(flatten)]
    pub selection: Selection,
    /// Display label per selected id
    #[serde(skip)]
    pub labels: Vec<String>,
}

impl View for FilterView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        match self.selection.mode {
            FilterMode::All => writeln!(f, "{} filter: all", self.dimension),
            FilterMode::Selected => {
                writeln!(
                    f,
                    "{} filter: {} selected",
                    self.dimension,
                    self.selection.ids.len()
                )?;
                for label in &self.labels {
                    writeln!(f, "  {}", palette.dim(label))?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Serialize)]
pub struct LayoutView {
    pub sidebar_collapsed: bool,
    pub column_widths: BTreeMap<String, u32>,
    pub sort: TableSort,
}

impl LayoutView {
    pub fn from_state(state: &ViewState) -> Self {
        Self {
            sidebar_collapsed: state.sidebar_collapsed,
            column_widths: state.column_widths.clone(),
            sort: state.sort,
        }
    }
}

impl View for LayoutView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(
            f,
            "Sidebar: {}",
            if self.sidebar_collapsed { "collapsed" } else { "expanded" }
        )?;
        writeln!(
            f,
            "Sort:    {} {}",
            self.sort.key.as_str(),
            match self.sort.direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            }
        )?;
        if self.column_widths.is_empty() {
            writeln!(f, "Columns: default widths")?;
        } else {
            writeln!(f, "Columns:")?;
            for (column, width) in &self.column_widths {
                writeln!(f, "  {:<16} {}px", column, width)?;
            }
        }
        Ok(())
    }
}
