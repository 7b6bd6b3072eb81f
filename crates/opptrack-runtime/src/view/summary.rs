use opptrack_types::{Opportunity, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals over the visible rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub total_market_size: f64,
}

impl Summary {
    pub fn from_rows(rows: &[Opportunity]) -> Self {
        let mut by_status: BTreeMap<Status, usize> =
            Status::ALL.into_iter().map(|status| (status, 0)).collect();
        let mut total_market_size = 0.0;

        for row in rows {
            *by_status.entry(row.status).or_default() += 1;
            total_market_size += row.market_size.unwrap_or(0.0);
        }

        Self {
            total: rows.len(),
            by_status,
            total_market_size,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}
