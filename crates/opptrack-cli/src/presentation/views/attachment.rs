use opptrack_types::Attachment;
use opptrack_types::format::format_file_size;
use serde::Serialize;
use std::fmt;

use crate::presentation::{Palette, View};

#[derive(Serialize)]
pub struct AttachmentListView {
    pub opportunity_id: String,
    pub attachments: Vec<Attachment>,
}

impl View for AttachmentListView {
    fn write_plain(&self, f: &mut dyn fmt::Write, palette: Palette) -> fmt::Result {
        if self.attachments.is_empty() {
            return writeln!(f, "No attachments.");
        }
        for attachment in &self.attachments {
            writeln!(
                f,
                "{}  {:<32}  {:>9}  {:<24}  {}",
                palette.dim(&attachment.id),
                attachment.file_name,
                format_file_size(attachment.file_size),
                attachment.mime_type,
                attachment.uploaded_at
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct AttachmentView {
    pub attachment: Attachment,
    pub url: String,
}

impl View for AttachmentView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(
            f,
            "Uploaded {} ({}) as {}",
            self.attachment.file_name,
            format_file_size(self.attachment.file_size),
            self.attachment.id
        )?;
        writeln!(f, "  {}", self.url)
    }
}

#[derive(Serialize)]
pub struct AttachmentDeletedView {
    pub attachment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphaned_blob: Option<String>,
}

impl View for AttachmentDeletedView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(f, "Deleted attachment {}", self.attachment_id)?;
        if let Some(path) = &self.orphaned_blob {
            writeln!(f, "  warning: blob not removed: {}", path)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct AttachmentUrlView {
    pub attachment_id: String,
    pub url: String,
}

impl View for AttachmentUrlView {
    fn write_plain(&self, f: &mut dyn fmt::Write, _palette: Palette) -> fmt::Result {
        writeln!(f, "{}", self.url)
    }
}
