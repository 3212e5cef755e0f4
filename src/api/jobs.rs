use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_job_id;
use super::{ApiError, ApiResponse, AppState, StatusUpdateRequest};
use crate::models::{BatchCreateResult, Job, JobCreateInput, JobFilter, JobUpdate};
use crate::services::JobError;

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound(_) => Self::not_found("Job"),
            JobError::AlreadyExists(_) => {
                Self::Conflict("Job with this URL already exists".to_string())
            }
            JobError::InvalidInput(msg) => Self::ValidationError(msg),
            JobError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<ApiResponse<Vec<Job>>>, ApiError> {
    let jobs = state.job_service().list_jobs(&filter).await?;
    Ok(Json(ApiResponse::success(jobs)))
}

pub async fn create_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JobCreateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Job>>), ApiError> {
    let Json(input) = payload?;
    let job = state.job_service().create_job(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(job))))
}

pub async fn create_jobs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<JobCreateInput>>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BatchCreateResult>>), ApiError> {
    let Json(inputs) = payload?;
    let result = state.job_service().create_jobs(inputs).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Job>>, ApiError> {
    let id = validate_job_id(&id)?;
    let job = state.job_service().get_job(&id).await?;
    Ok(Json(ApiResponse::success(job)))
}

pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Job>>, ApiError> {
    let id = validate_job_id(&id)?;
    let Json(update) = payload?;
    let job = state.job_service().update_job(&id, update).await?;
    Ok(Json(ApiResponse::success(job)))
}

pub async fn update_job_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Job>>, ApiError> {
    let id = validate_job_id(&id)?;
    let Json(request) = payload?;
    let job = state
        .job_service()
        .update_job_status(&id, request.status)
        .await?;
    Ok(Json(ApiResponse::success(job)))
}

pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_job_id(&id)?;
    state.job_service().delete_job(&id).await?;
    Ok(Json(ApiResponse::success_message("Job deleted successfully")))
}
