use opptrack_types::demo_link::SEPARATOR;
use opptrack_types::{DemoLink, DemoLinks, Error as TypesError, Opportunity, OpportunityDraft};

use crate::{Error, Result};

/// Full create/edit form for one opportunity.
///
/// Demo links are edited as a typed list and encoded only on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityForm {
    pub draft: OpportunityDraft,
    pub links: DemoLinks,
    editing: Option<String>,
}

impl OpportunityForm {
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            draft: OpportunityDraft::new(name),
            links: DemoLinks::default(),
            editing: None,
        }
    }

    pub fn edit(opp: &Opportunity) -> Self {
        Self {
            draft: OpportunityDraft::from_opportunity(opp),
            links: DemoLinks::from_raw(&opp.demo_links),
            editing: Some(opp.id.clone()),
        }
    }

    /// Id of the record being edited; `None` for a new record
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn add_link(&mut self, label: &str, url: &str) -> Result<()> {
        let link = if label.trim().is_empty() {
            DemoLink::unlabeled(url.trim())
        } else {
            DemoLink::new(label.trim(), url.trim())?
        };
        self.links.add(link)?;
        Ok(())
    }

    pub fn remove_link(&mut self, index: usize) -> Result<DemoLink> {
        Ok(self.links.remove(index)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.draft.name.trim().is_empty() {
            return Err(Error::Validation("name is required".to_string()));
        }

        validate_market_size(self.draft.market_size)?;

        for link in self.links.links() {
            if link.label.contains(SEPARATOR) {
                return Err(TypesError::LabelContainsSeparator(link.label.clone()).into());
            }
        }

        Ok(())
    }

    /// Validated draft with links encoded for storage
    pub fn submit(&self) -> Result<OpportunityDraft> {
        self.validate()?;

        let mut draft = self.draft.clone();
        draft.name = draft.name.trim().to_string();
        draft.demo_links = self.links.to_raw();
        Ok(draft)
    }
}

/// Shared by the form and inline edits
pub(crate) fn validate_market_size(market_size: Option<f64>) -> Result<()> {
    match market_size {
        Some(size) if !size.is_finite() || size < 0.0 => Err(Error::Validation(format!(
            "market size must be a non-negative amount, got {}",
            size
        ))),
        _ => Ok(()),
    }
}
