use chrono::Utc;
use opptrack_store::{BlobStore, Database};
use opptrack_types::{Attachment, guess_mime_type, new_id, now_rfc3339, storage_path};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Result of deleting an attachment. The metadata row is always gone;
/// `orphaned_blob` names a blob that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub attachment_id: String,
    pub orphaned_blob: Option<String>,
}

/// Two-step attachment lifecycle over the record store and the blob store.
///
/// Upload writes bytes first, then metadata; a failed metadata insert
/// removes the fresh blob. Delete removes metadata first, then bytes.
pub struct AttachmentOps<'a> {
    db: &'a Database,
    blobs: &'a dyn BlobStore,
}

impl<'a> AttachmentOps<'a> {
    pub fn new(db: &'a Database, blobs: &'a dyn BlobStore) -> Self {
        Self { db, blobs }
    }

    pub fn upload(
        &self,
        opportunity_id: &str,
        file_name: &str,
        bytes: &[u8],
        mime_type: Option<&str>,
    ) -> Result<Attachment> {
        let id = new_id();
        let path = storage_path(
            opportunity_id,
            &id,
            file_name,
            Utc::now().timestamp_millis(),
        );

        self.blobs.upload(&path, bytes)?;

        let attachment = Attachment {
            id,
            opportunity_id: opportunity_id.to_string(),
            file_name: file_name.to_string(),
            file_path: path.clone(),
            file_size: bytes.len() as i64,
            mime_type: mime_type
                .map(str::to_string)
                .unwrap_or_else(|| guess_mime_type(file_name).to_string()),
            uploaded_at: now_rfc3339(),
        };

        if let Err(source) = self.db.insert_attachment(&attachment) {
            let orphaned = match self.blobs.remove(&[path.as_str()]) {
                Ok(()) => {
                    debug!(path = %path, "removed blob after failed metadata insert");
                    false
                }
                Err(err) => {
                    warn!(
                        path = %path,
                        error = %err,
                        "orphaned blob: metadata insert failed and blob removal failed"
                    );
                    true
                }
            };
            return Err(Error::Upload {
                path,
                source,
                orphaned,
            });
        }

        info!(
            attachment = %attachment.id,
            opportunity = %opportunity_id,
            size = attachment.file_size,
            "attachment uploaded"
        );
        Ok(attachment)
    }

    /// Upload a file from disk, keeping its base name
    pub fn upload_file(
        &self,
        opportunity_id: &str,
        file: &Path,
        mime_type: Option<&str>,
    ) -> Result<Attachment> {
        let bytes = std::fs::read(file)?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::Validation(format!("not a file name: {}", file.display())))?;

        self.upload(opportunity_id, file_name, &bytes, mime_type)
    }

    pub fn delete(&self, attachment_id: &str, file_path: &str) -> Result<DeleteOutcome> {
        self.db.delete_attachment(attachment_id)?;

        let orphaned_blob = match self.blobs.remove(&[file_path]) {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    path = %file_path,
                    error = %err,
                    "orphaned blob: attachment deleted but blob removal failed"
                );
                Some(file_path.to_string())
            }
        };

        Ok(DeleteOutcome {
            attachment_id: attachment_id.to_string(),
            orphaned_blob,
        })
    }

    /// Delete by id, looking up the blob path
    pub fn delete_by_id(&self, attachment_id: &str) -> Result<DeleteOutcome> {
        let attachment = self
            .db
            .get_attachment(attachment_id)?
            .ok_or_else(|| Error::NotFound(format!("attachment {}", attachment_id)))?;
        self.delete(&attachment.id, &attachment.file_path)
    }

    /// Newest first
    pub fn list(&self, opportunity_id: &str) -> Result<Vec<Attachment>> {
        Ok(self.db.list_attachments(opportunity_id)?)
    }

    pub fn get(&self, attachment_id: &str) -> Result<Attachment> {
        self.db
            .get_attachment(attachment_id)?
            .ok_or_else(|| Error::NotFound(format!("attachment {}", attachment_id)))
    }

    pub fn public_url(&self, attachment: &Attachment) -> Result<String> {
        Ok(self.blobs.public_url(&attachment.file_path)?)
    }

    pub fn download(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        Ok(self.blobs.download(&attachment.file_path)?)
    }

    /// Remove blobs of rows already deleted by a cascade.
    /// Returns the paths that could not be removed.
    pub(crate) fn remove_blobs(&self, attachments: &[Attachment]) -> Vec<String> {
        if attachments.is_empty() {
            return Vec::new();
        }

        let paths: Vec<&str> = attachments.iter().map(|a| a.file_path.as_str()).collect();
        match self.blobs.remove(&paths) {
            Ok(()) => Vec::new(),
            Err(err) => {
                warn!(count = paths.len(), error = %err, "orphaned blobs after cascade delete");
                paths.into_iter().map(str::to_string).collect()
            }
        }
    }
}
