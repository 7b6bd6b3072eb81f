use rusqlite::Connection;

use crate::{Error, Result};

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 1;

// NOTE: Unlike a rebuildable index, this database is the source of truth.
// Tables are never dropped on open; a newer on-disk version is refused.
//
// - companies.slug is unique; opportunities keep company_id and the
//   denormalized company_name side by side for legacy rows.
// - demo_links is a JSON array of encoded `label|url` strings.
// - attachments cascade with their opportunity; blobs are removed by the caller.

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version > SCHEMA_VERSION {
        return Err(Error::SchemaTooNew {
            found: current_version,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS opportunities (
            id TEXT PRIMARY KEY,
            company_id TEXT,
            company_name TEXT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            phase INTEGER NOT NULL DEFAULT 0 CHECK (phase BETWEEN 0 AND 4),
            status TEXT NOT NULL DEFAULT 'planned',
            messaging_indicator TEXT NOT NULL DEFAULT 'red',
            campaign_indicator TEXT NOT NULL DEFAULT 'red',
            pricing_indicator TEXT NOT NULL DEFAULT 'red',
            sales_alignment_indicator TEXT NOT NULL DEFAULT 'red',
            market_size REAL,
            target_date TEXT,
            next_steps TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL DEFAULT 0,
            demo_links TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS attachments (
            id TEXT PRIMARY KEY,
            opportunity_id TEXT NOT NULL,
            file_name TEXT NOT NULL,
            file_path TEXT NOT NULL,
            file_size INTEGER NOT NULL,
            mime_type TEXT NOT NULL,
            uploaded_at TEXT NOT NULL,
            FOREIGN KEY (opportunity_id) REFERENCES opportunities(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_opportunities_company ON opportunities(company_id);
        CREATE INDEX IF NOT EXISTS idx_opportunities_order ON opportunities(sort_order);
        CREATE INDEX IF NOT EXISTS idx_attachments_opportunity ON attachments(opportunity_id, uploaded_at DESC);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}
