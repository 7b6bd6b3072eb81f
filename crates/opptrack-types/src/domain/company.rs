use serde::{Deserialize, Serialize};

/// A company that opportunities are tracked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Reference from an opportunity to its company.
///
/// `id` is the preferred link; `name` is the denormalized copy kept for
/// records written before companies had ids. Writers keep both in sync.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl CompanyRef {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_company(company: &Company) -> Self {
        Self {
            id: Some(company.id.clone()),
            name: Some(company.name.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}
