use serde::Serialize;
use std::fmt;

use super::LinkRow;
use crate::presentation::{Palette, View};

#[derive(Serialize)]
pub struct LinkListView {
    pub opportunity_id: String,
    pub links: Vec<LinkRow>,
}

impl View for LinkListView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        if self.links.is_empty() {
            return writeln!(f, "No demo links.");
        }
        for link in &self.links {
            writeln!(
                f,
                "[{}] {}  {}",
                link.index,
                link.display,
                palette.dim(&link.url)
            )?;
        }
        Ok(())
    }
}
