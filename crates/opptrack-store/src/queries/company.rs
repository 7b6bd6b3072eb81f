use opptrack_types::Company;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Result;
use crate::records::company_from_row;

pub fn insert(conn: &Connection, company: &Company) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO companies (id, name, slug)
        VALUES (?1, ?2, ?3)
        "#,
        params![&company.id, &company.name, &company.slug],
    )?;

    Ok(())
}

/// Rename a company and refresh the denormalized name on its opportunities
pub fn rename(conn: &Connection, id: &str, name: &str) -> Result<usize> {
    let updated = conn.execute("UPDATE companies SET name = ?2 WHERE id = ?1", params![id, name])?;
    if updated > 0 {
        conn.execute(
            "UPDATE opportunities SET company_name = ?2 WHERE company_id = ?1",
            params![id, name],
        )?;
    }
    Ok(updated)
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Company>> {
    let company = conn
        .query_row(
            "SELECT id, name, slug FROM companies WHERE id = ?1",
            [id],
            company_from_row,
        )
        .optional()?;

    Ok(company)
}

pub fn get_by_slug(conn: &Connection, slug: &str) -> Result<Option<Company>> {
    let company = conn
        .query_row(
            "SELECT id, name, slug FROM companies WHERE slug = ?1",
            [slug],
            company_from_row,
        )
        .optional()?;

    Ok(company)
}

pub fn list(conn: &Connection) -> Result<Vec<Company>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, slug
        FROM companies
        ORDER BY name COLLATE NOCASE ASC
        "#,
    )?;

    let companies = stmt
        .query_map([], company_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(companies)
}

pub fn delete(conn: &Connection, id: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM companies WHERE id = ?1", [id])?;
    Ok(deleted)
}
