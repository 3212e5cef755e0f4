//! Domain service for files attached to tracked jobs.

use crate::constants::attachments::MAX_FILE_SIZE;
use crate::db::RepositoryError;
use crate::domain::{AttachmentId, JobId};
use crate::models::{AttachmentFile, AttachmentMeta, FileKind, NewAttachment, attachment};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Attachment not found: {0}")]
    NotFound(AttachmentId),

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AttachmentError {
    pub(crate) fn from_repo(err: RepositoryError, id: &AttachmentId) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(id.clone()),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Checks kind, MIME type and size, in that order.
///
/// Returns the normalized MIME type on success.
pub fn validate_upload(upload: &NewAttachment) -> Result<String, AttachmentError> {
    if FileKind::parse(&upload.file_type).is_none() {
        return Err(AttachmentError::InvalidInput(format!(
            "invalid file type: {} (must be 'resume' or 'cover_letter')",
            upload.file_type
        )));
    }

    let mime = attachment::normalize_mime(&upload.mime_type);
    if !attachment::is_allowed_mime(&mime) {
        return Err(AttachmentError::InvalidInput(format!(
            "invalid MIME type: {} (allowed: PDF, DOC, DOCX)",
            upload.mime_type
        )));
    }

    if upload.data.len() > MAX_FILE_SIZE {
        return Err(AttachmentError::InvalidInput(
            "file too large: max size is 10MB".to_string(),
        ));
    }

    Ok(mime)
}

#[async_trait::async_trait]
pub trait AttachmentService: Send + Sync {
    /// Stores a validated upload against an existing job.
    ///
    /// # Errors
    ///
    /// - [`AttachmentError::InvalidInput`] for a bad kind, MIME type or size
    /// - [`AttachmentError::JobNotFound`] if the job does not exist
    async fn create_attachment(&self, upload: NewAttachment)
    -> Result<AttachmentMeta, AttachmentError>;

    async fn get_attachment(&self, id: &AttachmentId) -> Result<AttachmentMeta, AttachmentError>;

    /// Newest first.
    async fn list_attachments(&self, job_id: &JobId)
    -> Result<Vec<AttachmentMeta>, AttachmentError>;

    /// Metadata together with the stored bytes.
    async fn download_attachment(
        &self,
        id: &AttachmentId,
    ) -> Result<AttachmentFile, AttachmentError>;

    async fn delete_attachment(&self, id: &AttachmentId) -> Result<(), AttachmentError>;
}
