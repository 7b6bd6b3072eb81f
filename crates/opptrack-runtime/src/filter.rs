use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every record passes; the id set is ignored
    #[default]
    All,
    /// Only ids in the set pass; an empty set passes nothing
    Selected,
}

/// One filter dimension (companies or opportunities)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub ids: BTreeSet<String>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: FilterMode::Selected,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip one id. Switches to explicit selection, seeded with `universe`
    /// when coming from `All` so that the toggle removes just that id.
    pub fn toggle(&mut self, id: &str, universe: &[String]) {
        if self.mode == FilterMode::All {
            self.mode = FilterMode::Selected;
            self.ids = universe.iter().cloned().collect();
        }

        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Explicitly select every id in `universe`
    pub fn select_all(&mut self, universe: &[String]) {
        self.mode = FilterMode::Selected;
        self.ids = universe.iter().cloned().collect();
    }

    /// Explicitly select nothing
    pub fn clear_all(&mut self) {
        self.mode = FilterMode::Selected;
        self.ids.clear();
    }

    /// Back to pass-through
    pub fn reset(&mut self) {
        *self = Self::all();
    }

    pub fn is_all(&self) -> bool {
        self.mode == FilterMode::All
    }

    /// Id restriction for a store query; `None` means unrestricted
    pub fn to_query_ids(&self) -> Option<Vec<String>> {
        match self.mode {
            FilterMode::All => None,
            FilterMode::Selected => Some(self.ids.iter().cloned().collect()),
        }
    }
}
