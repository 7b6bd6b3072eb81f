use opptrack_store::Database;
use opptrack_types::{Company, new_id, slugify};
use tracing::info;

use crate::{Error, Result};

pub struct CompanyOps<'a> {
    db: &'a Database,
}

impl<'a> CompanyOps<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn add(&self, name: &str, slug: Option<&str>) -> Result<Company> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("company name is required".to_string()));
        }

        let slug = slugify(slug.unwrap_or(name));
        if slug.is_empty() {
            return Err(Error::Validation(format!(
                "cannot derive a slug from '{}'",
                name
            )));
        }
        if self.db.get_company_by_slug(&slug)?.is_some() {
            return Err(Error::Validation(format!(
                "company slug '{}' already exists",
                slug
            )));
        }

        let company = Company {
            id: new_id(),
            name: name.to_string(),
            slug,
        };
        self.db.insert_company(&company)?;
        info!(company = %company.id, slug = %company.slug, "company added");

        Ok(company)
    }

    /// Sorted by name
    pub fn list(&self) -> Result<Vec<Company>> {
        Ok(self.db.list_companies()?)
    }

    /// Look up by id, then by slug
    pub fn resolve(&self, key: &str) -> Result<Company> {
        if let Some(company) = self.db.get_company(key)? {
            return Ok(company);
        }
        self.db
            .get_company_by_slug(key)?
            .ok_or_else(|| Error::NotFound(format!("company '{}'", key)))
    }

    /// Rename; opportunities pick up the new name
    pub fn rename(&self, key: &str, name: &str) -> Result<Company> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("company name is required".to_string()));
        }

        let mut company = self.resolve(key)?;
        self.db.rename_company(&company.id, name)?;
        company.name = name.to_string();
        Ok(company)
    }

    /// Delete; opportunities keep the company name as text
    pub fn remove(&self, key: &str) -> Result<Company> {
        let company = self.resolve(key)?;
        self.db.delete_company(&company.id)?;
        info!(company = %company.id, "company removed");
        Ok(company)
    }

    pub fn ids(&self) -> Result<Vec<String>> {
        Ok(self.list()?.into_iter().map(|c| c.id).collect())
    }
}
