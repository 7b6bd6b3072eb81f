use opptrack_types::{FieldPatch, Opportunity};
use rusqlite::types::Value;
use rusqlite::{Connection, ToSql, params};

use crate::records::{OPPORTUNITY_COLUMNS, OpportunityRecord, format_date};
use crate::{Error, Result};

/// Which opportunities a listing should return.
///
/// `None` means "no restriction"; `Some(ids)` restricts to the given ids and
/// matches nothing when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityQuery {
    pub company_ids: Option<Vec<String>>,
    pub opportunity_ids: Option<Vec<String>>,
}

impl OpportunityQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn companies(mut self, ids: Vec<String>) -> Self {
        self.company_ids = Some(ids);
        self
    }

    pub fn opportunities(mut self, ids: Vec<String>) -> Self {
        self.opportunity_ids = Some(ids);
        self
    }

    fn matches_nothing(&self) -> bool {
        matches!(&self.company_ids, Some(ids) if ids.is_empty())
            || matches!(&self.opportunity_ids, Some(ids) if ids.is_empty())
    }
}

pub fn insert(conn: &Connection, opp: &Opportunity) -> Result<()> {
    let demo_links = serde_json::to_string(&opp.demo_links)?;

    conn.execute(
        r#"
        INSERT INTO opportunities (
            id, company_id, company_name, name, description, phase, status,
            messaging_indicator, campaign_indicator, pricing_indicator, sales_alignment_indicator,
            market_size, target_date, next_steps, sort_order, demo_links, created_at, updated_at
        )
        VALUES (
            ?1, ?2, COALESCE((SELECT name FROM companies WHERE id = ?2), ?3), ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
        )
        "#,
        params![
            &opp.id,
            &opp.company.id,
            &opp.company.name,
            &opp.name,
            &opp.description,
            i64::from(opp.phase),
            opp.status.as_str(),
            opp.indicators.messaging.as_str(),
            opp.indicators.campaign.as_str(),
            opp.indicators.pricing.as_str(),
            opp.indicators.sales_alignment.as_str(),
            opp.market_size,
            format_date(opp.target_date),
            &opp.next_steps,
            opp.sort_order,
            demo_links,
            &opp.created_at,
            &opp.updated_at
        ],
    )?;

    Ok(())
}

/// Full-form save: every field except id and created_at is overwritten
pub fn update(conn: &Connection, opp: &Opportunity) -> Result<usize> {
    let demo_links = serde_json::to_string(&opp.demo_links)?;

    let updated = conn.execute(
        r#"
        UPDATE opportunities SET
            company_id = ?2,
            company_name = COALESCE((SELECT name FROM companies WHERE id = ?2), ?3),
            name = ?4,
            description = ?5,
            phase = ?6,
            status = ?7,
            messaging_indicator = ?8,
            campaign_indicator = ?9,
            pricing_indicator = ?10,
            sales_alignment_indicator = ?11,
            market_size = ?12,
            target_date = ?13,
            next_steps = ?14,
            sort_order = ?15,
            demo_links = ?16,
            updated_at = ?17
        WHERE id = ?1
        "#,
        params![
            &opp.id,
            &opp.company.id,
            &opp.company.name,
            &opp.name,
            &opp.description,
            i64::from(opp.phase),
            opp.status.as_str(),
            opp.indicators.messaging.as_str(),
            opp.indicators.campaign.as_str(),
            opp.indicators.pricing.as_str(),
            opp.indicators.sales_alignment.as_str(),
            opp.market_size,
            format_date(opp.target_date),
            &opp.next_steps,
            opp.sort_order,
            demo_links,
            &opp.updated_at
        ],
    )?;

    Ok(updated)
}

/// Inline edit of a single column
pub fn update_field(
    conn: &Connection,
    id: &str,
    patch: &FieldPatch,
    updated_at: &str,
) -> Result<usize> {
    if let FieldPatch::Company(company) = patch {
        let updated = conn.execute(
            r#"
            UPDATE opportunities SET
                company_id = ?2,
                company_name = COALESCE((SELECT name FROM companies WHERE id = ?2), ?3),
                updated_at = ?4
            WHERE id = ?1
            "#,
            params![id, &company.id, &company.name, updated_at],
        )?;
        return Ok(updated);
    }

    let (column, value) = column_value(patch);
    let sql = format!(
        "UPDATE opportunities SET {} = ?2, updated_at = ?3 WHERE id = ?1",
        column
    );
    let updated = conn.execute(&sql, params![id, value, updated_at])?;

    Ok(updated)
}

fn column_value(patch: &FieldPatch) -> (&'static str, Value) {
    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    match patch {
        FieldPatch::Name(v) => ("name", text(v)),
        FieldPatch::Description(v) => ("description", text(v)),
        FieldPatch::Phase(v) => ("phase", Value::Integer(i64::from(*v))),
        FieldPatch::Status(v) => ("status", text(v.as_str())),
        FieldPatch::Messaging(v) => ("messaging_indicator", text(v.as_str())),
        FieldPatch::Campaign(v) => ("campaign_indicator", text(v.as_str())),
        FieldPatch::Pricing(v) => ("pricing_indicator", text(v.as_str())),
        FieldPatch::SalesAlignment(v) => ("sales_alignment_indicator", text(v.as_str())),
        FieldPatch::MarketSize(v) => ("market_size", v.map(Value::Real).unwrap_or(Value::Null)),
        FieldPatch::TargetDate(v) => (
            "target_date",
            format_date(*v).map(Value::Text).unwrap_or(Value::Null),
        ),
        FieldPatch::NextSteps(v) => ("next_steps", text(v)),
        FieldPatch::SortOrder(v) => ("sort_order", Value::Integer(*v)),
        FieldPatch::Company(_) => ("company_id", Value::Null),
    }
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Opportunity>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {}
        FROM opportunities o
        LEFT JOIN companies c ON o.company_id = c.id
        WHERE o.id = ?1
        "#,
        OPPORTUNITY_COLUMNS
    ))?;

    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        let record = OpportunityRecord::from_row(row)?;
        Ok(Some(record.into_opportunity()?))
    } else {
        Ok(None)
    }
}

/// Filtered listing in manual sort order
pub fn list(conn: &Connection, query: &OpportunityQuery) -> Result<Vec<Opportunity>> {
    if query.matches_nothing() {
        return Ok(Vec::new());
    }

    let mut where_clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(ids) = &query.company_ids {
        let placeholders = placeholders(ids.len());
        // Legacy rows carry only a company name; match them through the
        // companies table so both shapes filter the same way.
        where_clauses.push(format!(
            "(o.company_id IN ({0}) OR (o.company_id IS NULL AND o.company_name IN \
             (SELECT name FROM companies WHERE id IN ({0}))))",
            placeholders
        ));
        for id in ids {
            params.push(Box::new(id.clone()));
        }
        for id in ids {
            params.push(Box::new(id.clone()));
        }
    }

    if let Some(ids) = &query.opportunity_ids {
        where_clauses.push(format!("o.id IN ({})", placeholders(ids.len())));
        for id in ids {
            params.push(Box::new(id.clone()));
        }
    }

    let where_clause = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let sql = format!(
        r#"
        SELECT {}
        FROM opportunities o
        LEFT JOIN companies c ON o.company_id = c.id
        {}
        ORDER BY o.sort_order ASC, o.created_at ASC
        "#,
        OPPORTUNITY_COLUMNS, where_clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let records = stmt
        .query_map(param_refs.as_slice(), OpportunityRecord::from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    records
        .into_iter()
        .map(OpportunityRecord::into_opportunity)
        .collect()
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub fn delete(conn: &Connection, id: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM opportunities WHERE id = ?1", [id])?;
    Ok(deleted)
}

pub fn next_sort_order(conn: &Connection) -> Result<i64> {
    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM opportunities",
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}

/// Persist a manual ordering in one transaction
pub fn set_sort_orders(
    conn: &Connection,
    orders: &[(String, i64)],
    updated_at: &str,
) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "UPDATE opportunities SET sort_order = ?2, updated_at = ?3 WHERE id = ?1",
        )?;
        for (id, order) in orders {
            if stmt.execute(params![id, order, updated_at])? == 0 {
                return Err(Error::NotFound {
                    entity: "Opportunity",
                    id: id.clone(),
                });
            }
        }
    }
    tx.commit()?;
    Ok(())
}

/// Ids starting with `prefix`, at most two (enough to detect ambiguity)
pub fn find_ids_by_prefix(conn: &Connection, prefix: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id
        FROM opportunities
        WHERE id LIKE ?1 ESCAPE '\'
        LIMIT 2
        "#,
    )?;

    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("{}%", escaped);
    let ids = stmt
        .query_map([&pattern], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(ids)
}
