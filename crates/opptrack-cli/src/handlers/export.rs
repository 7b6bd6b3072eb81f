use anyhow::{Context, Result};
use opptrack_types::{DemoLinks, Opportunity};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::HandlerContext;
use crate::args::ExportFormat;

/// One flat CSV record per opportunity.
///
/// Demo links keep their `label|url` encoding, one per line within the cell.
#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    company: &'a str,
    name: &'a str,
    description: &'a str,
    phase: u8,
    status: &'a str,
    messaging: &'a str,
    campaign: &'a str,
    pricing: &'a str,
    sales_alignment: &'a str,
    market_size: Option<f64>,
    target_date: Option<String>,
    next_steps: &'a str,
    demo_links: String,
}

impl<'a> From<&'a Opportunity> for ExportRow<'a> {
    fn from(opp: &'a Opportunity) -> Self {
        Self {
            id: &opp.id,
            company: opp.company_display(),
            name: &opp.name,
            description: &opp.description,
            phase: opp.phase.value(),
            status: opp.status.as_str(),
            messaging: opp.indicators.messaging.as_str(),
            campaign: opp.indicators.campaign.as_str(),
            pricing: opp.indicators.pricing.as_str(),
            sales_alignment: opp.indicators.sales_alignment.as_str(),
            market_size: opp.market_size,
            target_date: opp.target_date.map(|d| d.format("%Y-%m-%d").to_string()),
            next_steps: &opp.next_steps,
            demo_links: DemoLinks::from_raw(&opp.demo_links).to_raw().join("\n"),
        }
    }
}

/// Export the filtered, sorted table
pub fn handle(ctx: &HandlerContext, to: ExportFormat, output: Option<&Path>) -> Result<()> {
    let state = ctx.tracker.load_view_state();
    let rows = ctx.tracker.opportunities().list(&state)?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match to {
        ExportFormat::Csv => write_csv(writer, &rows)?,
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &rows)?;
            writeln!(writer)?;
        }
    }

    if let Some(path) = output {
        eprintln!("Exported {} opportunities to {}", rows.len(), path.display());
    }
    Ok(())
}

fn write_csv(writer: Box<dyn Write>, rows: &[Opportunity]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for opp in rows {
        csv.serialize(ExportRow::from(opp))?;
    }
    csv.flush()?;
    Ok(())
}
