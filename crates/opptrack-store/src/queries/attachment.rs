use opptrack_types::Attachment;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Result;
use crate::records::attachment_from_row;

const COLUMNS: &str = "id, opportunity_id, file_name, file_path, file_size, mime_type, uploaded_at";

pub fn insert(conn: &Connection, attachment: &Attachment) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO attachments (id, opportunity_id, file_name, file_path, file_size, mime_type, uploaded_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            &attachment.id,
            &attachment.opportunity_id,
            &attachment.file_name,
            &attachment.file_path,
            attachment.file_size,
            &attachment.mime_type,
            &attachment.uploaded_at
        ],
    )?;

    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Attachment>> {
    let attachment = conn
        .query_row(
            &format!("SELECT {} FROM attachments WHERE id = ?1", COLUMNS),
            [id],
            attachment_from_row,
        )
        .optional()?;

    Ok(attachment)
}

/// Attachments of one opportunity, newest upload first
pub fn list_for_opportunity(conn: &Connection, opportunity_id: &str) -> Result<Vec<Attachment>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {}
        FROM attachments
        WHERE opportunity_id = ?1
        ORDER BY uploaded_at DESC, id DESC
        "#,
        COLUMNS
    ))?;

    let attachments = stmt
        .query_map([opportunity_id], attachment_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(attachments)
}

pub fn list_all(conn: &Connection) -> Result<Vec<Attachment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM attachments ORDER BY uploaded_at DESC, id DESC",
        COLUMNS
    ))?;

    let attachments = stmt
        .query_map([], attachment_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(attachments)
}

pub fn delete(conn: &Connection, id: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM attachments WHERE id = ?1", [id])?;
    Ok(deleted)
}
