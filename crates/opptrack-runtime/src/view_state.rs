use opptrack_store::OpportunityQuery;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::filter::Selection;
use crate::view::{MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, TableSort, is_column};
use crate::{Error, Result};

pub const VIEW_STATE_FILE: &str = "view-state.json";

/// Per-user layout and filter state, persisted next to the database
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub sidebar_collapsed: bool,
    #[serde(default)]
    pub company_filter: Selection,
    #[serde(default)]
    pub opportunity_filter: Selection,
    /// Column key to width in pixels
    #[serde(default)]
    pub column_widths: BTreeMap<String, u32>,
    #[serde(default)]
    pub sort: TableSort,
}

impl ViewState {
    /// Load from `path`. A missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "view state unreadable, using defaults"
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "view state corrupt, using defaults");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set a column width, clamped to the allowed range
    pub fn set_column_width(&mut self, column: &str, width: u32) -> Result<u32> {
        if !is_column(column) {
            return Err(Error::Validation(format!("unknown column '{}'", column)));
        }
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        self.column_widths.insert(column.to_string(), width);
        Ok(width)
    }

    pub fn reset_column_width(&mut self, column: &str) -> bool {
        self.column_widths.remove(column).is_some()
    }

    /// Store query shaped by both filters
    pub fn query(&self) -> OpportunityQuery {
        let mut query = OpportunityQuery::all();
        if let Some(ids) = self.company_filter.to_query_ids() {
            query = query.companies(ids);
        }
        if let Some(ids) = self.opportunity_filter.to_query_ids() {
            query = query.opportunities(ids);
        }
        query
    }
}
