//! Single-field edits applied inline from the table view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    CompanyRef, Error, Indicator, Opportunity, OpportunityDraft, Phase, Readiness, Result, Status,
};

/// Fields that can be edited inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityField {
    Name,
    Description,
    Phase,
    Status,
    Messaging,
    Campaign,
    Pricing,
    SalesAlignment,
    MarketSize,
    TargetDate,
    NextSteps,
    SortOrder,
    Company,
}

impl OpportunityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityField::Name => "name",
            OpportunityField::Description => "description",
            OpportunityField::Phase => "phase",
            OpportunityField::Status => "status",
            OpportunityField::Messaging => "messaging",
            OpportunityField::Campaign => "campaign",
            OpportunityField::Pricing => "pricing",
            OpportunityField::SalesAlignment => "sales_alignment",
            OpportunityField::MarketSize => "market_size",
            OpportunityField::TargetDate => "target_date",
            OpportunityField::NextSteps => "next_steps",
            OpportunityField::SortOrder => "sort_order",
            OpportunityField::Company => "company",
        }
    }
}

impl From<Readiness> for OpportunityField {
    fn from(dimension: Readiness) -> Self {
        match dimension {
            Readiness::Messaging => OpportunityField::Messaging,
            Readiness::Campaign => OpportunityField::Campaign,
            Readiness::Pricing => OpportunityField::Pricing,
            Readiness::SalesAlignment => OpportunityField::SalesAlignment,
        }
    }
}

impl fmt::Display for OpportunityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let field = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => OpportunityField::Name,
            "description" => OpportunityField::Description,
            "phase" => OpportunityField::Phase,
            "status" => OpportunityField::Status,
            "messaging" => OpportunityField::Messaging,
            "campaign" => OpportunityField::Campaign,
            "pricing" => OpportunityField::Pricing,
            "sales_alignment" | "sales" => OpportunityField::SalesAlignment,
            "market_size" => OpportunityField::MarketSize,
            "target_date" => OpportunityField::TargetDate,
            "next_steps" => OpportunityField::NextSteps,
            "sort_order" => OpportunityField::SortOrder,
            "company" | "company_id" => OpportunityField::Company,
            _ => return Err(Error::UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

/// A typed value for one field of one opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldPatch {
    Name(String),
    Description(String),
    Phase(Phase),
    Status(Status),
    Messaging(Indicator),
    Campaign(Indicator),
    Pricing(Indicator),
    SalesAlignment(Indicator),
    MarketSize(Option<f64>),
    TargetDate(Option<NaiveDate>),
    NextSteps(String),
    SortOrder(i64),
    Company(CompanyRef),
}

impl FieldPatch {
    /// Parse the raw text entered for `field`.
    ///
    /// Empty input clears optional fields. A company value is the company id;
    /// the caller is expected to fill in the name before applying.
    pub fn parse(field: OpportunityField, raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = || Error::InvalidValue {
            field: field.as_str().to_string(),
            value: raw.to_string(),
        };

        let patch = match field {
            OpportunityField::Name => FieldPatch::Name(raw.to_string()),
            OpportunityField::Description => FieldPatch::Description(raw.to_string()),
            OpportunityField::NextSteps => FieldPatch::NextSteps(raw.to_string()),
            OpportunityField::Phase => {
                let value: i64 = trimmed.parse().map_err(|_| invalid())?;
                FieldPatch::Phase(Phase::new(value)?)
            }
            OpportunityField::Status => FieldPatch::Status(trimmed.parse()?),
            OpportunityField::Messaging => FieldPatch::Messaging(trimmed.parse()?),
            OpportunityField::Campaign => FieldPatch::Campaign(trimmed.parse()?),
            OpportunityField::Pricing => FieldPatch::Pricing(trimmed.parse()?),
            OpportunityField::SalesAlignment => FieldPatch::SalesAlignment(trimmed.parse()?),
            OpportunityField::MarketSize => {
                if trimmed.is_empty() {
                    FieldPatch::MarketSize(None)
                } else {
                    let cleaned: String = trimmed
                        .chars()
                        .filter(|c| !matches!(c, '$' | ',' | '_'))
                        .collect();
                    let value: f64 = cleaned.parse().map_err(|_| invalid())?;
                    if !value.is_finite() || value < 0.0 {
                        return Err(invalid());
                    }
                    FieldPatch::MarketSize(Some(value))
                }
            }
            OpportunityField::TargetDate => {
                if trimmed.is_empty() {
                    FieldPatch::TargetDate(None)
                } else {
                    let date =
                        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?;
                    FieldPatch::TargetDate(Some(date))
                }
            }
            OpportunityField::SortOrder => {
                FieldPatch::SortOrder(trimmed.parse().map_err(|_| invalid())?)
            }
            OpportunityField::Company => FieldPatch::Company(CompanyRef {
                id: (!trimmed.is_empty()).then(|| trimmed.to_string()),
                name: None,
            }),
        };

        Ok(patch)
    }

    pub fn field(&self) -> OpportunityField {
        match self {
            FieldPatch::Name(_) => OpportunityField::Name,
            FieldPatch::Description(_) => OpportunityField::Description,
            FieldPatch::Phase(_) => OpportunityField::Phase,
            FieldPatch::Status(_) => OpportunityField::Status,
            FieldPatch::Messaging(_) => OpportunityField::Messaging,
            FieldPatch::Campaign(_) => OpportunityField::Campaign,
            FieldPatch::Pricing(_) => OpportunityField::Pricing,
            FieldPatch::SalesAlignment(_) => OpportunityField::SalesAlignment,
            FieldPatch::MarketSize(_) => OpportunityField::MarketSize,
            FieldPatch::TargetDate(_) => OpportunityField::TargetDate,
            FieldPatch::NextSteps(_) => OpportunityField::NextSteps,
            FieldPatch::SortOrder(_) => OpportunityField::SortOrder,
            FieldPatch::Company(_) => OpportunityField::Company,
        }
    }

    /// Capture the current value of `field` on `opp` as a patch, so it can be
    /// re-applied to undo an edit.
    pub fn capture(field: OpportunityField, opp: &Opportunity) -> Self {
        match field {
            OpportunityField::Name => FieldPatch::Name(opp.name.clone()),
            OpportunityField::Description => FieldPatch::Description(opp.description.clone()),
            OpportunityField::Phase => FieldPatch::Phase(opp.phase),
            OpportunityField::Status => FieldPatch::Status(opp.status),
            OpportunityField::MarketSize => FieldPatch::MarketSize(opp.market_size),
            OpportunityField::TargetDate => FieldPatch::TargetDate(opp.target_date),
            OpportunityField::NextSteps => FieldPatch::NextSteps(opp.next_steps.clone()),
            OpportunityField::SortOrder => FieldPatch::SortOrder(opp.sort_order),
            OpportunityField::Company => FieldPatch::Company(opp.company.clone()),
            OpportunityField::Messaging => FieldPatch::Messaging(opp.indicators.messaging),
            OpportunityField::Campaign => FieldPatch::Campaign(opp.indicators.campaign),
            OpportunityField::Pricing => FieldPatch::Pricing(opp.indicators.pricing),
            OpportunityField::SalesAlignment => {
                FieldPatch::SalesAlignment(opp.indicators.sales_alignment)
            }
        }
    }

    pub fn indicator(dimension: Readiness, value: Indicator) -> Self {
        match dimension {
            Readiness::Messaging => FieldPatch::Messaging(value),
            Readiness::Campaign => FieldPatch::Campaign(value),
            Readiness::Pricing => FieldPatch::Pricing(value),
            Readiness::SalesAlignment => FieldPatch::SalesAlignment(value),
        }
    }

    pub fn apply(&self, opp: &mut Opportunity) {
        match self {
            FieldPatch::Name(v) => opp.name = v.clone(),
            FieldPatch::Description(v) => opp.description = v.clone(),
            FieldPatch::Phase(v) => opp.phase = *v,
            FieldPatch::Status(v) => opp.status = *v,
            FieldPatch::Messaging(v) => opp.indicators.messaging = *v,
            FieldPatch::Campaign(v) => opp.indicators.campaign = *v,
            FieldPatch::Pricing(v) => opp.indicators.pricing = *v,
            FieldPatch::SalesAlignment(v) => opp.indicators.sales_alignment = *v,
            FieldPatch::MarketSize(v) => opp.market_size = *v,
            FieldPatch::TargetDate(v) => opp.target_date = *v,
            FieldPatch::NextSteps(v) => opp.next_steps = v.clone(),
            FieldPatch::SortOrder(v) => opp.sort_order = *v,
            FieldPatch::Company(v) => opp.company = v.clone(),
        }
    }

    /// Same as [`FieldPatch::apply`], for a form draft
    pub fn apply_to_draft(&self, draft: &mut OpportunityDraft) {
        match self {
            FieldPatch::Name(v) => draft.name = v.clone(),
            FieldPatch::Description(v) => draft.description = v.clone(),
            FieldPatch::Phase(v) => draft.phase = *v,
            FieldPatch::Status(v) => draft.status = *v,
            FieldPatch::Messaging(v) => draft.indicators.messaging = *v,
            FieldPatch::Campaign(v) => draft.indicators.campaign = *v,
            FieldPatch::Pricing(v) => draft.indicators.pricing = *v,
            FieldPatch::SalesAlignment(v) => draft.indicators.sales_alignment = *v,
            FieldPatch::MarketSize(v) => draft.market_size = *v,
            FieldPatch::TargetDate(v) => draft.target_date = *v,
            FieldPatch::NextSteps(v) => draft.next_steps = v.clone(),
            FieldPatch::SortOrder(v) => draft.sort_order = Some(*v),
            FieldPatch::Company(v) => draft.company = v.clone(),
        }
    }
}
