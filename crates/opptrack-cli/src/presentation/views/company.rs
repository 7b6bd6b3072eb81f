use opptrack_types::Company;
use serde::Serialize;
use std::fmt;

use crate::presentation::{Palette, View};

#[derive(Serialize)]
pub struct CompanyListView {
    pub companies: Vec<Company>,
}

impl View for CompanyListView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        if self.companies.is_empty() {
            return writeln!(f, "No companies. Add one with `opptrack company add <name>`.");
        }

        let slug_w = self
            .companies
            .iter()
            .map(|c| c.slug.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        writeln!(f, "{}", palette.bold(&format!("{:<slug_w$}  NAME", "SLUG")))?;
        for company in &self.companies {
            writeln!(
                f,
                "{:<slug_w$}  {}  {}",
                company.slug,
                company.name,
                palette.dim(&company.id)
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct CompanyView {
    pub action: &'static str,
    pub company: Company,
}

impl View for CompanyView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(
            f,
            "{} company {} ({})",
            self.action, self.company.name, self.company.slug
        )
    }
}
