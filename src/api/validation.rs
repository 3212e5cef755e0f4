use super::ApiError;
use crate::domain::{AttachmentId, JobId};

const MAX_ID_LEN: usize = 64;

fn validate_id<'a>(kind: &str, id: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{kind} ID cannot be empty")));
    }
    if trimmed.len() > MAX_ID_LEN {
        return Err(ApiError::validation(format!(
            "Invalid {kind} ID: must be {MAX_ID_LEN} characters or less"
        )));
    }
    Ok(trimmed)
}

pub fn validate_job_id(id: &str) -> Result<JobId, ApiError> {
    validate_id("job", id).map(JobId::from)
}

pub fn validate_attachment_id(id: &str) -> Result<AttachmentId, ApiError> {
    validate_id("attachment", id).map(AttachmentId::from)
}

/// Reduces a client-supplied file name to its last path segment and drops
/// characters that would break a `Content-Disposition` header.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}
