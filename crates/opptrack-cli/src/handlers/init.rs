use anyhow::{Context, Result};
use opptrack_runtime::Tracker;
use std::path::Path;

use crate::args::OutputFormat;
use crate::presentation::views::InitView;
use crate::presentation::{Palette, render};

pub fn handle(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let tracker = Tracker::init(data_dir.to_path_buf())
        .with_context(|| format!("Failed to initialize {}", data_dir.display()))?;

    let view = InitView {
        data_dir: tracker.data_dir().to_path_buf(),
        database: tracker.database_path(),
        blob_dir: tracker.config().blob_dir(tracker.data_dir()),
    };
    render(&view, format, Palette::detect())
}
