//! Assertions over `--format json` output.

use anyhow::{Context, Result, bail};
use serde_json::Value;

fn opportunities(json: &Value) -> Result<&Vec<Value>> {
    json["opportunities"]
        .as_array()
        .context("Expected 'opportunities' array in JSON")
}

/// Assert that a listing holds `expected` opportunities.
pub fn assert_opportunity_count(json: &Value, expected: usize) -> Result<()> {
    let rows = opportunities(json)?;
    if rows.len() != expected {
        bail!("Expected {} opportunities, got {}", expected, rows.len());
    }
    Ok(())
}

/// Names in listing order.
pub fn opportunity_names(json: &Value) -> Result<Vec<String>> {
    opportunities(json)?
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row["name"]
                .as_str()
                .map(str::to_string)
                .with_context(|| format!("Opportunity {} missing name", i))
        })
        .collect()
}

/// Assert the listing shows exactly these names, in this order.
pub fn assert_names_in_order(json: &Value, expected: &[&str]) -> Result<()> {
    let names = opportunity_names(json)?;
    if names != expected {
        bail!("Expected order {:?}, got {:?}", expected, names);
    }
    Ok(())
}

/// Id of a record in any `{"opportunity": {...}}` or `{"company": {...}}`
/// response.
pub fn record_id(json: &Value, key: &str) -> Result<String> {
    json[key]["id"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("Expected '{}.id' in JSON", key))
}
