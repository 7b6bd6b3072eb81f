use opptrack_types::Opportunity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Table columns, in display order. Keys of `ViewState::column_widths`.
pub const COLUMNS: [&str; 13] = [
    "company",
    "name",
    "description",
    "phase",
    "status",
    "messaging",
    "campaign",
    "pricing",
    "sales_alignment",
    "market_size",
    "target_date",
    "next_steps",
    "demo_links",
];

pub const MIN_COLUMN_WIDTH: u32 = 48;
pub const MAX_COLUMN_WIDTH: u32 = 1200;

pub fn is_column(name: &str) -> bool {
    COLUMNS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// `sort_order`, as arranged by the user
    #[default]
    Manual,
    Name,
    Company,
    Phase,
    Status,
    MarketSize,
    TargetDate,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Manual,
        SortKey::Name,
        SortKey::Company,
        SortKey::Phase,
        SortKey::Status,
        SortKey::MarketSize,
        SortKey::TargetDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Manual => "manual",
            SortKey::Name => "name",
            SortKey::Company => "company",
            SortKey::Phase => "phase",
            SortKey::Status => "status",
            SortKey::MarketSize => "market_size",
            SortKey::TargetDate => "target_date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| Error::Validation(format!("unknown sort key '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSort {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl TableSort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

// None sorts after Some in both directions
fn cmp_optional<T, F>(a: Option<T>, b: Option<T>, direction: SortDirection, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => cmp(&a, &b),
            SortDirection::Desc => cmp(&b, &a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Stable sort; ties fall back to manual order
pub fn sort_rows(rows: &mut [Opportunity], sort: TableSort) {
    let direction = sort.direction;
    rows.sort_by(|a, b| {
        let primary = match sort.key {
            SortKey::Manual => cmp_optional(
                Some(a.sort_order),
                Some(b.sort_order),
                direction,
                Ord::cmp,
            ),
            SortKey::Name => cmp_optional(
                non_empty(&a.name),
                non_empty(&b.name),
                direction,
                Ord::cmp,
            ),
            SortKey::Company => cmp_optional(
                non_empty(a.company_display()),
                non_empty(b.company_display()),
                direction,
                Ord::cmp,
            ),
            SortKey::Phase => cmp_optional(Some(a.phase), Some(b.phase), direction, Ord::cmp),
            SortKey::Status => cmp_optional(Some(a.status), Some(b.status), direction, Ord::cmp),
            SortKey::MarketSize => {
                cmp_optional(a.market_size, b.market_size, direction, f64::total_cmp)
            }
            SortKey::TargetDate => {
                cmp_optional(a.target_date, b.target_date, direction, Ord::cmp)
            }
        };
        primary.then_with(|| a.sort_order.cmp(&b.sort_order))
    });
}

/// New dense sort orders after moving `id` to `new_index` within `rows`
/// (rows given in manual order). Only changed entries are returned.
pub fn reorder(rows: &[Opportunity], id: &str, new_index: usize) -> Result<Vec<(String, i64)>> {
    let from = rows
        .iter()
        .position(|row| row.id == id)
        .ok_or_else(|| Error::NotFound(format!("opportunity {}", id)))?;

    if new_index >= rows.len() {
        return Err(Error::Validation(format!(
            "position {} is out of range (0..{})",
            new_index,
            rows.len()
        )));
    }

    let mut ordered: Vec<&Opportunity> = rows.iter().collect();
    let moved = ordered.remove(from);
    ordered.insert(new_index, moved);

    Ok(ordered
        .into_iter()
        .enumerate()
        .filter(|(position, row)| row.sort_order != *position as i64)
        .map(|(position, row)| (row.id.clone(), position as i64))
        .collect())
}
