use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::validation::{sanitize_file_name, validate_attachment_id, validate_job_id};
use super::{ApiError, ApiResponse, AppState};
use crate::constants::attachments::DEFAULT_FILE_TYPE;
use crate::domain::JobId;
use crate::models::{AttachmentMeta, NewAttachment};
use crate::services::AttachmentError;

const OCTET_STREAM: &str = "application/octet-stream";

impl From<AttachmentError> for ApiError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::NotFound(_) => Self::not_found("Attachment"),
            AttachmentError::JobNotFound(_) => Self::not_found("Job"),
            AttachmentError::InvalidInput(msg) => Self::ValidationError(msg),
            AttachmentError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// Attachments are addressed through their job; a mismatch is reported as
/// missing.
fn ensure_belongs_to(meta: &AttachmentMeta, job_id: &JobId) -> Result<(), ApiError> {
    if &meta.job_id == job_id {
        Ok(())
    } else {
        Err(ApiError::not_found("Attachment"))
    }
}

fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(mime) if !mime.is_empty() && mime != OCTET_STREAM => mime.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or(OCTET_STREAM)
            .to_string(),
    }
}

/// `POST /api/jobs/{id}/attachments`
///
/// Multipart form with a `file` part and an optional `file_type` field
/// (`resume` when omitted).
pub async fn upload_attachment(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AttachmentMeta>>), ApiError> {
    let job_id = validate_job_id(&job_id)?;
    let mut multipart =
        multipart.map_err(|_| ApiError::validation("Failed to parse form data"))?;

    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut file_type = String::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let file_name = sanitize_file_name(field.file_name().unwrap_or_default());
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            Some("file_type") => {
                file_type = field.text().await?.trim().to_string();
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| ApiError::validation("Failed to get file from form"))?;

    if file_type.is_empty() {
        file_type = DEFAULT_FILE_TYPE.to_string();
    }

    let mime_type = resolve_mime(content_type.as_deref(), &file_name);

    let meta = state
        .attachment_service()
        .create_attachment(NewAttachment {
            job_id,
            file_name,
            file_type,
            mime_type,
            data,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(meta))))
}

pub async fn list_attachments(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AttachmentMeta>>>, ApiError> {
    let job_id = validate_job_id(&job_id)?;
    let attachments = state.attachment_service().list_attachments(&job_id).await?;
    Ok(Json(ApiResponse::success(attachments)))
}

pub async fn get_attachment(
    State(state): State<Arc<AppState>>,
    Path((job_id, attachment_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<AttachmentMeta>>, ApiError> {
    let job_id = validate_job_id(&job_id)?;
    let attachment_id = validate_attachment_id(&attachment_id)?;

    let meta = state
        .attachment_service()
        .get_attachment(&attachment_id)
        .await?;
    ensure_belongs_to(&meta, &job_id)?;

    Ok(Json(ApiResponse::success(meta)))
}

/// `GET /api/jobs/{id}/attachments/{attachment_id}/download`
pub async fn download_attachment(
    State(state): State<Arc<AppState>>,
    Path((job_id, attachment_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let job_id = validate_job_id(&job_id)?;
    let attachment_id = validate_attachment_id(&attachment_id)?;

    let file = state
        .attachment_service()
        .download_attachment(&attachment_id)
        .await?;
    ensure_belongs_to(&file.meta, &job_id)?;

    let content_type = HeaderValue::from_str(&file.meta.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM));
    let disposition =
        HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", file.meta.file_name).as_bytes())
            .map_err(|e| ApiError::internal(format!("Invalid file name header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(file.meta.file_size)),
        ],
        Body::from(file.data),
    )
        .into_response())
}

pub async fn delete_attachment(
    State(state): State<Arc<AppState>>,
    Path((job_id, attachment_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let job_id = validate_job_id(&job_id)?;
    let attachment_id = validate_attachment_id(&attachment_id)?;

    let meta = state
        .attachment_service()
        .get_attachment(&attachment_id)
        .await?;
    ensure_belongs_to(&meta, &job_id)?;

    state
        .attachment_service()
        .delete_attachment(&attachment_id)
        .await?;

    Ok(Json(ApiResponse::success_message(
        "Attachment deleted successfully",
    )))
}
