//! Display formatting shared by every view.

use chrono::NaiveDate;

use crate::{Indicator, Status};

pub const EMPTY: &str = "—";

/// Colour family a value should be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Cyan,
    Red,
}

impl Status {
    pub fn tone(&self) -> Tone {
        match self {
            Status::Done => Tone::Green,
            Status::InProgress => Tone::Blue,
            Status::Paused => Tone::Yellow,
            Status::Planned => Tone::Cyan,
            Status::NotGo => Tone::Red,
        }
    }
}

impl Indicator {
    pub fn tone(&self) -> Tone {
        match self {
            Indicator::Green => Tone::Green,
            Indicator::Amber => Tone::Yellow,
            Indicator::Red => Tone::Red,
        }
    }
}

/// Compact currency: `$1.2B`, `$3.4M`, `$250K`, `$900`
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount else {
        return EMPTY.to_string();
    };

    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();

    let body = if abs >= 1e9 {
        format!("{}B", one_decimal(abs / 1e9))
    } else if abs >= 1e6 {
        format!("{}M", one_decimal(abs / 1e6))
    } else if abs >= 1e3 {
        format!("{}K", one_decimal(abs / 1e3))
    } else {
        format!("{:.0}", abs)
    };

    format!("{}${}", sign, body)
}

fn one_decimal(value: f64) -> String {
    let s = format!("{:.1}", value);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// `Mar 5, 2025`
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => EMPTY.to_string(),
    }
}

/// Binary units with one decimal above bytes: `512 B`, `1.5 KB`, `2.0 MB`
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes.max(0));
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Truncate to `max` characters, appending `…` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
