use chrono::NaiveDate;
use opptrack_types::{
    Attachment, Company, CompanyRef, Indicator, Indicators, Opportunity, Phase, Status,
};
use rusqlite::Row;

use crate::{Error, Result};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column list matching `OpportunityRecord::from_row`.
///
/// `company_name` resolves through the join first so renamed companies show
/// their current name; legacy rows fall back to the stored copy.
pub(crate) const OPPORTUNITY_COLUMNS: &str = r#"
    o.id, o.company_id, COALESCE(c.name, o.company_name), o.name, o.description,
    o.phase, o.status, o.messaging_indicator, o.campaign_indicator,
    o.pricing_indicator, o.sales_alignment_indicator, o.market_size,
    o.target_date, o.next_steps, o.sort_order, o.demo_links,
    o.created_at, o.updated_at
"#;

/// Raw opportunity row as stored. Enumerations and dates are still text.
#[derive(Debug, Clone)]
pub(crate) struct OpportunityRecord {
    pub id: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub name: String,
    pub description: String,
    pub phase: i64,
    pub status: String,
    pub messaging: String,
    pub campaign: String,
    pub pricing: String,
    pub sales_alignment: String,
    pub market_size: Option<f64>,
    pub target_date: Option<String>,
    pub next_steps: String,
    pub sort_order: i64,
    pub demo_links: String,
    pub created_at: String,
    pub updated_at: String,
}

impl OpportunityRecord {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            company_id: row.get(1)?,
            company_name: row.get(2)?,
            name: row.get(3)?,
            description: row.get(4)?,
            phase: row.get(5)?,
            status: row.get(6)?,
            messaging: row.get(7)?,
            campaign: row.get(8)?,
            pricing: row.get(9)?,
            sales_alignment: row.get(10)?,
            market_size: row.get(11)?,
            target_date: row.get(12)?,
            next_steps: row.get(13)?,
            sort_order: row.get(14)?,
            demo_links: row.get(15)?,
            created_at: row.get(16)?,
            updated_at: row.get(17)?,
        })
    }

    pub fn into_opportunity(self) -> Result<Opportunity> {
        let target_date = match self.target_date.as_deref() {
            Some(raw) if !raw.is_empty() => Some(
                NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                    Error::Decode(format!(
                        "opportunity {}: target_date '{}': {}",
                        self.id, raw, e
                    ))
                })?,
            ),
            _ => None,
        };

        let demo_links: Vec<String> = serde_json::from_str(&self.demo_links).map_err(|e| {
            Error::Decode(format!("opportunity {}: demo_links: {}", self.id, e))
        })?;

        Ok(Opportunity {
            company: CompanyRef {
                id: self.company_id,
                name: self.company_name,
            },
            name: self.name,
            description: self.description,
            phase: Phase::new(self.phase)?,
            status: self.status.parse::<Status>()?,
            indicators: Indicators {
                messaging: self.messaging.parse::<Indicator>()?,
                campaign: self.campaign.parse::<Indicator>()?,
                pricing: self.pricing.parse::<Indicator>()?,
                sales_alignment: self.sales_alignment.parse::<Indicator>()?,
            },
            market_size: self.market_size,
            target_date,
            next_steps: self.next_steps,
            sort_order: self.sort_order,
            demo_links,
            created_at: self.created_at,
            updated_at: self.updated_at,
            id: self.id,
        })
    }
}

pub(crate) fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
    })
}

pub(crate) fn attachment_from_row(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        opportunity_id: row.get(1)?,
        file_name: row.get(2)?,
        file_path: row.get(3)?,
        file_size: row.get(4)?,
        mime_type: row.get(5)?,
        uploaded_at: row.get(6)?,
    })
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}
