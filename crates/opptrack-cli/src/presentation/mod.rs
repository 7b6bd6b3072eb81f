pub mod style;
pub mod views;

pub use style::Palette;

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::args::OutputFormat;

/// A command result that can be printed as text or JSON
pub trait View: Serialize {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result;
}

pub fn render<V: View>(view: &V, format: OutputFormat, palette: Palette) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Plain => {
            let mut out = String::new();
            view.write_plain(&mut out, palette)?;
            print!("{}", out);
        }
    }
    Ok(())
}
