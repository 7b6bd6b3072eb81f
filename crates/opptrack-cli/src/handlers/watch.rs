use anyhow::Result;
use opptrack_runtime::{StoreWatcher, WaitResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::HandlerContext;
use crate::args::OutputFormat;
use crate::presentation::views::{ColumnChars, OpportunityTableView};

const TICK: Duration = Duration::from_millis(250);

/// Print the table, then again after every change to the database file
pub fn handle(ctx: &HandlerContext, interval_ms: Option<u64>) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let watcher = match interval_ms {
        Some(ms) => StoreWatcher::new(&ctx.tracker.database_path(), Duration::from_millis(ms))?,
        None => ctx.tracker.watch()?,
    };

    render_table(ctx)?;

    while running.load(Ordering::SeqCst) {
        match watcher.wait(TICK) {
            WaitResult::Changed { coalesced } => {
                debug!(coalesced, "database changed, refetching");
                if let Err(err) = render_table(ctx) {
                    // Keep watching; the next change may succeed
                    warn!(error = %err, "refetch failed");
                    eprintln!("{}", err);
                }
            }
            WaitResult::Idle => {}
            WaitResult::Closed => break,
        }
    }
    Ok(())
}

fn render_table(ctx: &HandlerContext) -> Result<()> {
    let state = ctx.tracker.load_view_state();
    let rows = ctx.tracker.opportunities().list(&state)?;
    if ctx.format == OutputFormat::Plain {
        println!("--- {} ---", chrono::Local::now().format("%H:%M:%S"));
    }
    ctx.render(&OpportunityTableView {
        opportunities: rows,
        summary: None,
        columns: ColumnChars::from_state(&state),
        filter_line: None,
    })
}
