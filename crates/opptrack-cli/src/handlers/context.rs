use anyhow::Result;
use opptrack_runtime::Tracker;

use crate::args::OutputFormat;
use crate::presentation::{Palette, View, render};

/// Opened tracker plus output settings, shared by every handler
pub struct HandlerContext {
    pub format: OutputFormat,
    pub palette: Palette,
    pub tracker: Tracker,
}

impl HandlerContext {
    pub fn new(format: OutputFormat, tracker: Tracker) -> Self {
        Self {
            format,
            palette: Palette::detect(),
            tracker,
        }
    }

    pub fn render<V: View>(&self, view: &V) -> Result<()> {
        render(view, self.format, self.palette)
    }
}
