use chrono::{Datelike, NaiveDate};
use opptrack_types::Opportunity;
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNSCHEDULED: &str = "Unscheduled";

/// Opportunities sharing a target month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineGroup {
    /// `YYYY-MM`, or `None` for the unscheduled group
    pub month: Option<String>,
    /// `Mar 2025` or `Unscheduled`
    pub label: String,
    pub items: Vec<Opportunity>,
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Group by target month, earliest first; undated records trail.
/// Within a month records are ordered by date, then manual order.
pub fn group_by_month(rows: &[Opportunity]) -> Vec<TimelineGroup> {
    let mut months: BTreeMap<NaiveDate, Vec<Opportunity>> = BTreeMap::new();
    let mut unscheduled = Vec::new();

    for row in rows {
        match row.target_date {
            Some(date) => months.entry(month_start(date)).or_default().push(row.clone()),
            None => unscheduled.push(row.clone()),
        }
    }

    let mut groups: Vec<TimelineGroup> = months
        .into_iter()
        .map(|(month, mut items)| {
            items.sort_by(|a, b| {
                a.target_date
                    .cmp(&b.target_date)
                    .then_with(|| a.sort_order.cmp(&b.sort_order))
            });
            TimelineGroup {
                month: Some(month.format("%Y-%m").to_string()),
                label: month.format("%b %Y").to_string(),
                items,
            }
        })
        .collect();

    if !unscheduled.is_empty() {
        unscheduled.sort_by_key(|row| row.sort_order);
        groups.push(TimelineGroup {
            month: None,
            label: UNSCHEDULED.to_string(),
            items: unscheduled,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use opptrack_types::{CompanyRef, Indicators, Phase, Status};

    fn row(id: &str, order: i64, date: Option<(i32, u32, u32)>) -> Opportunity {
        Opportunity {
            id: id.to_string(),
            company: CompanyRef::none(),
            name: id.to_string(),
            description: String::new(),
            phase: Phase::default(),
            status: Status::Planned,
            indicators: Indicators::default(),
            market_size: None,
            target_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            next_steps: String::new(),
            sort_order: order,
            demo_links: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_groups_ascending_with_unscheduled_last() {
        let rows = vec![
            row("undated", 0, None),
            row("june-late", 1, Some((2025, 6, 28))),
            row("march", 2, Some((2025, 3, 5))),
            row("june-early", 3, Some((2025, 6, 2))),
            row("next-year", 4, Some((2026, 1, 15))),
        ];

        let groups = group_by_month(&rows);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Mar 2025", "Jun 2025", "Jan 2026", "Unscheduled"]);

        assert_eq!(groups[0].month.as_deref(), Some("2025-03"));
        assert_eq!(groups[3].month, None);

        let june: Vec<&str> = groups[1].items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(june, vec!["june-early", "june-late"]);
    }

    #[test]
    fn test_no_unscheduled_group_when_all_dated() {
        let rows = vec![row("a", 0, Some((2025, 1, 1)))];
        let groups = group_by_month(&rows);
        assert_eq!(groups.len(), 1);
        assert!(group_by_month(&[]).is_empty());
    }
}
