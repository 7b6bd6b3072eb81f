use opptrack_runtime::view::table::COLUMNS;
use opptrack_runtime::{SettleOutcome, Summary, TimelineGroup, ViewState};
use opptrack_types::format::{EMPTY, format_currency, format_date, format_file_size, truncate};
use opptrack_types::{Attachment, DemoLink, FieldPatch, Opportunity, Readiness, Status};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::presentation::{Palette, View};

const PX_PER_CHAR: u32 = 8;
const MIN_CHARS: usize = 4;

/// Text column widths in characters, from the saved pixel widths
#[derive(Debug, Clone)]
pub struct ColumnChars {
    chars: BTreeMap<&'static str, usize>,
}

impl ColumnChars {
    pub fn from_state(state: &ViewState) -> Self {
        let chars = COLUMNS
            .iter()
            .map(|column| {
                let width = match state.column_widths.get(*column) {
                    Some(px) => ((px / PX_PER_CHAR) as usize).max(MIN_CHARS),
                    None => default_chars(column),
                };
                (*column, width)
            })
            .collect();
        Self { chars }
    }

    pub fn get(&self, column: &str) -> usize {
        self.chars
            .get(column)
            .copied()
            .unwrap_or_else(|| default_chars(column))
    }
}

impl Default for ColumnChars {
    fn default() -> Self {
        Self::from_state(&ViewState::default())
    }
}

fn default_chars(column: &str) -> usize {
    match column {
        "company" => 16,
        "name" => 28,
        "description" | "next_steps" => 32,
        _ => 12,
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn or_empty(text: &str) -> &str {
    if text.trim().is_empty() { EMPTY } else { text }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width))
}

fn indicator_strip(opp: &Opportunity, palette: Palette) -> String {
    Readiness::ALL
        .iter()
        .map(|dimension| palette.indicator(opp.indicators.get(*dimension)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable value of a single-field edit
pub fn patch_value(patch: &FieldPatch) -> String {
    match patch {
        FieldPatch::Name(v) | FieldPatch::Description(v) | FieldPatch::NextSteps(v) => {
            or_empty(v).to_string()
        }
        FieldPatch::Phase(v) => v.to_string(),
        FieldPatch::Status(v) => v.label().to_string(),
        FieldPatch::Messaging(v)
        | FieldPatch::Campaign(v)
        | FieldPatch::Pricing(v)
        | FieldPatch::SalesAlignment(v) => v.as_str().to_string(),
        FieldPatch::MarketSize(v) => format_currency(*v),
        FieldPatch::TargetDate(v) => format_date(*v),
        FieldPatch::SortOrder(v) => v.to_string(),
        FieldPatch::Company(v) => v
            .name
            .as_deref()
            .or(v.id.as_deref())
            .unwrap_or(EMPTY)
            .to_string(),
    }
}

// --------------------------------------------------------
// Table
// --------------------------------------------------------

#[derive(Serialize)]
pub struct OpportunityTableView {
    pub opportunities: Vec<Opportunity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip)]
    pub columns: ColumnChars,
    /// Filter panel line, shown while the sidebar is expanded
    #[serde(skip)]
    pub filter_line: Option<String>,
}

impl View for OpportunityTableView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        if let Some(line) = &self.filter_line {
            writeln!(f, "{}", palette.dim(line))?;
            writeln!(f)?;
        }

        if self.opportunities.is_empty() {
            writeln!(f, "No opportunities.")?;
        } else {
            let company_w = self.columns.get("company");
            let name_w = self.columns.get("name");

            writeln!(
                f,
                "{}",
                palette.bold(&format!(
                    "{:<8}  {:<company_w$}  {:<name_w$}  {:<2}  {:<11}  {:<7}  {:>7}  {:<12}  {}",
                    "ID", "COMPANY", "NAME", "PH", "STATUS", "M C P S", "MARKET", "TARGET", "LINKS"
                ))
            )?;

            for opp in &self.opportunities {
                writeln!(
                    f,
                    "{:<8}  {}  {}  {:<2}  {}  {}  {:>7}  {:<12}  {}",
                    short_id(&opp.id),
                    pad(or_empty(opp.company_display()), company_w),
                    pad(&opp.name, name_w),
                    opp.phase.value(),
                    palette.status(opp.status, 11),
                    indicator_strip(opp, palette),
                    format_currency(opp.market_size),
                    format_date(opp.target_date),
                    opp.demo_links.len(),
                )?;
            }
        }

        if let Some(summary) = &self.summary {
            writeln!(f)?;
            write_summary(f, summary, palette)?;
        }

        Ok(())
    }
}

fn write_summary(f: &mut dyn fmt::Write, summary: &Summary, palette: Palette) -> fmt::Result {
    writeln!(
        f,
        "{} opportunities, {} total market size",
        summary.total,
        format_currency(Some(summary.total_market_size))
    )?;
    let counts: Vec<String> = Status::ALL
        .iter()
        .map(|status| {
            palette.tone(
                &format!("{} {}", status.label(), summary.count(*status)),
                status.tone(),
            )
        })
        .collect();
    writeln!(f, "{}", counts.join("  "))
}

// --------------------------------------------------------
// Detail
// --------------------------------------------------------

#[derive(Serialize)]
pub struct LinkRow {
    pub index: usize,
    pub label: String,
    pub url: String,
    pub display: String,
}

impl LinkRow {
    pub fn rows(links: &[DemoLink]) -> Vec<Self> {
        links
            .iter()
            .enumerate()
            .map(|(index, link)| Self {
                index,
                label: link.label.clone(),
                url: link.url.clone(),
                display: link.display(),
            })
            .collect()
    }
}

#[derive(Serialize)]
pub struct OpportunityDetailView {
    pub opportunity: Opportunity,
    pub links: Vec<LinkRow>,
    pub attachments: Vec<Attachment>,
}

impl View for OpportunityDetailView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        let opp = &self.opportunity;
        writeln!(f, "{}  {}", palette.bold(&opp.name), palette.dim(&opp.id))?;
        writeln!(f, "  Company:          {}", or_empty(opp.company_display()))?;
        writeln!(f, "  Phase:            {}", opp.phase)?;
        writeln!(
            f,
            "  Status:           {}",
            palette.tone(opp.status.label(), opp.status.tone())
        )?;
        for dimension in Readiness::ALL {
            let indicator = opp.indicators.get(dimension);
            writeln!(
                f,
                "  {:<17} {}",
                format!("{}:", label_for(dimension)),
                palette.tone(indicator.as_str(), indicator.tone())
            )?;
        }
        writeln!(f, "  Market size:      {}", format_currency(opp.market_size))?;
        writeln!(f, "  Target date:      {}", format_date(opp.target_date))?;
        writeln!(f, "  Next steps:       {}", or_empty(&opp.next_steps))?;
        writeln!(f, "  Description:      {}", or_empty(&opp.description))?;

        writeln!(f, "  Demo links:")?;
        if self.links.is_empty() {
            writeln!(f, "    {}", EMPTY)?;
        }
        for link in &self.links {
            writeln!(f, "    [{}] {}  {}", link.index, link.display, palette.dim(&link.url))?;
        }

        writeln!(f, "  Attachments:")?;
        if self.attachments.is_empty() {
            writeln!(f, "    {}", EMPTY)?;
        }
        for attachment in &self.attachments {
            writeln!(
                f,
                "    {}  {}  {}  {}",
                attachment.file_name,
                format_file_size(attachment.file_size),
                attachment.mime_type,
                palette.dim(&attachment.id)
            )?;
        }
        Ok(())
    }
}

fn label_for(dimension: Readiness) -> &'static str {
    match dimension {
        Readiness::Messaging => "Messaging",
        Readiness::Campaign => "Campaign",
        Readiness::Pricing => "Pricing",
        Readiness::SalesAlignment => "Sales alignment",
    }
}

// --------------------------------------------------------
// Mutations
// --------------------------------------------------------

#[derive(Serialize)]
pub struct SavedView {
    pub action: &'static str,
    pub opportunity: Opportunity,
}

impl View for SavedView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(
            f,
            "{} opportunity {} ({})",
            self.action, self.opportunity.name, self.opportunity.id
        )
    }
}

#[derive(Serialize)]
pub struct EditView {
    pub id: String,
    pub field: String,
    pub value: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity: Option<Opportunity>,
}

impl EditView {
    pub fn new(
        id: &str,
        patch: &FieldPatch,
        settled: &SettleOutcome,
        opportunity: Option<Opportunity>,
    ) -> Self {
        let (outcome, value, error) = match settled {
            SettleOutcome::Confirmed => ("confirmed", patch_value(patch), None),
            SettleOutcome::Reverted { reverted_to, error } => {
                ("reverted", patch_value(reverted_to), Some(error.clone()))
            }
            SettleOutcome::Superseded => ("superseded", patch_value(patch), None),
        };
        Self {
            id: id.to_string(),
            field: patch.field().to_string(),
            value,
            outcome,
            error,
            opportunity,
        }
    }
}

impl View for EditView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        match &self.error {
            None => writeln!(f, "{} {}: {}", short_id(&self.id), self.field, self.value),
            Some(error) => writeln!(
                f,
                "{} {} kept at {}: {}",
                short_id(&self.id),
                self.field,
                self.value,
                palette.tone(error, opptrack_types::format::Tone::Red)
            ),
        }
    }
}

#[derive(Serialize)]
pub struct DeletedView {
    pub id: String,
    pub attachments_removed: usize,
    pub orphaned_blobs: Vec<String>,
}

impl View for DeletedView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(
            f,
            "Deleted opportunity {} ({} attachments)",
            self.id, self.attachments_removed
        )?;
        for path in &self.orphaned_blobs {
            writeln!(f, "  warning: blob not removed: {}", path)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct MovedView {
    pub id: String,
    pub position: usize,
    pub renumbered: usize,
}

impl View for MovedView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(
            f,
            "Moved {} to position {} ({} reordered)",
            short_id(&self.id),
            self.position,
            self.renumbered
        )
    }
}

// --------------------------------------------------------
// Timeline
// --------------------------------------------------------

#[derive(Serialize)]
pub struct TimelineView {
    pub groups: Vec<TimelineGroup>,
}

impl View for TimelineView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        if self.groups.is_empty() {
            return writeln!(f, "No opportunities.");
        }

        for group in &self.groups {
            writeln!(
                f,
                "{} {}",
                palette.bold(&group.label),
                palette.dim(&format!("({})", group.items.len()))
            )?;
            for opp in &group.items {
                let day = opp
                    .target_date
                    .map(|d| d.format("%b %-d").to_string())
                    .unwrap_or_else(|| EMPTY.to_string());
                writeln!(
                    f,
                    "  {:<7} {}  {}  {}",
                    day,
                    pad(&opp.name, 28),
                    pad(or_empty(opp.company_display()), 16),
                    palette.tone(opp.status.label(), opp.status.tone())
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use opptrack_types::{CompanyRef, Indicators, Phase};

    fn sample() -> Opportunity {
        Opportunity {
            id: "7f2abd2d-0000-4000-8000-000000000000".to_string(),
            company: CompanyRef {
                id: Some("c1".to_string()),
                name: Some("Acme".to_string()),
            },
            name: "Support copilot".to_string(),
            description: String::new(),
            phase: Phase::new(2).unwrap(),
            status: Status::InProgress,
            indicators: Indicators::default(),
            market_size: Some(1_200_000.0),
            target_date: NaiveDate::from_ymd_opt(2025, 3, 5),
            next_steps: String::new(),
            sort_order: 0,
            demo_links: vec!["Demo|https://x.com".to_string()],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn plain<V: View>(view: &V) -> String {
        let mut out = String::new();
        view.write_plain(&mut out, Palette::plain()).unwrap();
        out
    }

    #[test]
    fn test_table_row() {
        let view = OpportunityTableView {
            opportunities: vec![sample()],
            summary: None,
            columns: ColumnChars::default(),
            filter_line: None,
        };
        let out = plain(&view);
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("7f2abd2d  Acme"));
        assert!(row.contains("In Progress"));
        assert!(row.contains("R R R R"));
        assert!(row.contains("$1.2M"));
        assert!(row.contains("Mar 5, 2025"));
    }

    #[test]
    fn test_column_width_from_pixels() {
        let mut state = ViewState::default();
        state.set_column_width("name", 80).unwrap();
        let columns = ColumnChars::from_state(&state);
        assert_eq!(columns.get("name"), 10);
        assert_eq!(columns.get("company"), 16);
    }

    #[test]
    fn test_edit_view_reverted() {
        let view = EditView::new(
            "7f2abd2d-xyz",
            &FieldPatch::Status(Status::Done),
            &SettleOutcome::Reverted {
                reverted_to: FieldPatch::Status(Status::Planned),
                error: "boom".to_string(),
            },
            None,
        );
        assert_eq!(view.outcome, "reverted");
        assert_eq!(plain(&view), "7f2abd2d status kept at Planned: boom\n");
    }

    #[test]
    fn test_empty_table() {
        let view = OpportunityTableView {
            opportunities: Vec::new(),
            summary: None,
            columns: ColumnChars::default(),
            filter_line: Some("Companies: none selected".to_string()),
        };
        assert_eq!(plain(&view), "Companies: none selected\n\nNo opportunities.\n");
    }
}
