use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::constants::attachments::ALLOWED_MIME_TYPES;
use crate::domain::{AttachmentId, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Resume,
    CoverLetter,
}

impl FileKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::CoverLetter => "cover_letter",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resume" => Some(Self::Resume),
            "cover_letter" => Some(Self::CoverLetter),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strips parameters (`; charset=...`) and case from a MIME type.
#[must_use]
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[must_use]
pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Attachment metadata. This is all that list and get responses expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentMeta {
    pub id: AttachmentId,
    pub job_id: JobId,
    pub file_name: String,
    pub file_type: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Metadata plus payload, for downloads.
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub meta: AttachmentMeta,
    pub data: Vec<u8>,
}

/// An upload as received from a client, before validation.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub job_id: JobId,
    pub file_name: String,
    pub file_type: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
