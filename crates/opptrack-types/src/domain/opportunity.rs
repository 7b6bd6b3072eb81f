use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::CompanyRef;
use crate::{Error, Result};

/// Lifecycle status of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Done,
    InProgress,
    Paused,
    Planned,
    NotGo,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Done,
        Status::InProgress,
        Status::Paused,
        Status::Planned,
        Status::NotGo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Done => "done",
            Status::InProgress => "in_progress",
            Status::Paused => "paused",
            Status::Planned => "planned",
            Status::NotGo => "not_go",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Status::Done => "Done",
            Status::InProgress => "In Progress",
            Status::Paused => "Paused",
            Status::Planned => "Planned",
            Status::NotGo => "Not Go",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "done" => Ok(Status::Done),
            "in_progress" => Ok(Status::InProgress),
            "paused" => Ok(Status::Paused),
            "planned" => Ok(Status::Planned),
            "not_go" => Ok(Status::NotGo),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// Three-state readiness flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Green,
    Amber,
    #[default]
    Red,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Green => "green",
            Indicator::Amber => "amber",
            Indicator::Red => "red",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Indicator::Green),
            "amber" => Ok(Indicator::Amber),
            "red" => Ok(Indicator::Red),
            _ => Err(Error::UnknownIndicator(s.to_string())),
        }
    }
}

/// The four readiness dimensions tracked per opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readiness {
    Messaging,
    Campaign,
    Pricing,
    SalesAlignment,
}

impl Readiness {
    pub const ALL: [Readiness; 4] = [
        Readiness::Messaging,
        Readiness::Campaign,
        Readiness::Pricing,
        Readiness::SalesAlignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::Messaging => "messaging",
            Readiness::Campaign => "campaign",
            Readiness::Pricing => "pricing",
            Readiness::SalesAlignment => "sales_alignment",
        }
    }
}

/// Lifecycle stage, always within 0..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Phase(u8);

impl Phase {
    pub const MAX: u8 = 4;

    pub fn new(value: i64) -> Result<Self> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::InvalidPhase(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Phase {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Phase::new(value)
    }
}

impl From<Phase> for i64 {
    fn from(phase: Phase) -> Self {
        phase.0 as i64
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {}", self.0)
    }
}

/// Readiness indicators for one opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Indicators {
    pub messaging: Indicator,
    pub campaign: Indicator,
    pub pricing: Indicator,
    pub sales_alignment: Indicator,
}

impl Indicators {
    pub fn get(&self, dimension: Readiness) -> Indicator {
        match dimension {
            Readiness::Messaging => self.messaging,
            Readiness::Campaign => self.campaign,
            Readiness::Pricing => self.pricing,
            Readiness::SalesAlignment => self.sales_alignment,
        }
    }

    pub fn set(&mut self, dimension: Readiness, value: Indicator) {
        match dimension {
            Readiness::Messaging => self.messaging = value,
            Readiness::Campaign => self.campaign = value,
            Readiness::Pricing => self.pricing = value,
            Readiness::SalesAlignment => self.sales_alignment = value,
        }
    }
}

/// A tracked opportunity as stored in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub company: CompanyRef,
    pub name: String,
    pub description: String,
    pub phase: Phase,
    pub status: Status,
    pub indicators: Indicators,
    pub market_size: Option<f64>,
    pub target_date: Option<NaiveDate>,
    pub next_steps: String,
    pub sort_order: i64,
    /// Encoded demo links (`label|url` or bare `url`)
    pub demo_links: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Opportunity {
    /// Company name for display, falling back to the legacy denormalized copy
    pub fn company_display(&self) -> &str {
        self.company.name.as_deref().unwrap_or("")
    }
}

/// Form payload for creating or fully updating an opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityDraft {
    pub company: CompanyRef,
    pub name: String,
    pub description: String,
    pub phase: Phase,
    pub status: Status,
    pub indicators: Indicators,
    pub market_size: Option<f64>,
    pub target_date: Option<NaiveDate>,
    pub next_steps: String,
    pub sort_order: Option<i64>,
    pub demo_links: Vec<String>,
}

impl OpportunityDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            company: CompanyRef::none(),
            name: name.into(),
            description: String::new(),
            phase: Phase::default(),
            status: Status::Planned,
            indicators: Indicators::default(),
            market_size: None,
            target_date: None,
            next_steps: String::new(),
            sort_order: None,
            demo_links: Vec::new(),
        }
    }

    pub fn from_opportunity(opp: &Opportunity) -> Self {
        Self {
            company: opp.company.clone(),
            name: opp.name.clone(),
            description: opp.description.clone(),
            phase: opp.phase,
            status: opp.status,
            indicators: opp.indicators,
            market_size: opp.market_size,
            target_date: opp.target_date,
            next_steps: opp.next_steps.clone(),
            sort_order: Some(opp.sort_order),
            demo_links: opp.demo_links.clone(),
        }
    }
}
