use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::presentation::{Palette, View};

#[derive(Serialize)]
pub struct InitView {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub blob_dir: PathBuf,
}

impl View for InitView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        writeln!(f, "Initialized {}", self.data_dir.display())?;
        writeln!(f, "  database: {}", self.database.display())?;
        writeln!(f, "  files:    {}", self.blob_dir.display())?;
        writeln!(f)?;
        writeln!(f, "{}", palette.bold("Next steps:"))?;
        writeln!(f, "  opptrack company add \"Acme\"")?;
        writeln!(f, "  opptrack opp add \"Support copilot\" --company acme")?;
        writeln!(f, "  opptrack opp list")
    }
}

/// One line of plain text, `{"message": ...}` as JSON
#[derive(Serialize)]
pub struct MessageView {
    pub message: String,
}

impl MessageView {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl View for MessageView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(f, "{}", self.message)
    }
}
