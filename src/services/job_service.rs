//! Domain service for tracked job postings.

use crate::db::RepositoryError;
use crate::domain::JobId;
use crate::models::{BatchCreateResult, Job, JobCreateInput, JobFilter, JobUpdate};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Job with this URL already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid job data: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl JobError {
    /// Maps a repository failure for the job identified by `id`.
    pub(crate) fn from_repo(err: RepositoryError, id: &JobId) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(id.clone()),
            RepositoryError::Conflict(msg) => Self::AlreadyExists(msg),
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for JobError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Checks that `url` is an absolute http(s) URL.
pub fn validate_job_url(url: &str) -> Result<(), JobError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| JobError::InvalidInput(format!("job_url is not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(JobError::InvalidInput(format!(
            "job_url must use http or https, got '{other}'"
        ))),
    }
}

/// Validates the fields a new job cannot do without.
pub fn validate_create_input(input: &JobCreateInput) -> Result<(), JobError> {
    if input.job_title.trim().is_empty() {
        return Err(JobError::InvalidInput("job_title is required".to_string()));
    }
    if input.job_url.is_empty() {
        return Err(JobError::InvalidInput("job_url is required".to_string()));
    }
    validate_job_url(&input.job_url)
}

/// Job tracking operations.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// Creates a job in the "new" state.
    ///
    /// # Errors
    ///
    /// - [`JobError::InvalidInput`] if the title is empty or the URL is not http(s)
    /// - [`JobError::AlreadyExists`] if a job with the same URL is tracked
    async fn create_job(&self, input: JobCreateInput) -> Result<Job, JobError>;

    async fn get_job(&self, id: &JobId) -> Result<Job, JobError>;

    /// Lists jobs newest first, optionally filtered by status and source.
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, JobError>;

    /// Applies a partial update. Absent and empty fields keep their value.
    ///
    /// # Errors
    ///
    /// - [`JobError::NotFound`] if the job does not exist
    /// - [`JobError::AlreadyExists`] if a changed URL belongs to another job
    async fn update_job(&self, id: &JobId, update: JobUpdate) -> Result<Job, JobError>;

    /// Overwrites the status. Values outside [`crate::models::JobStatus`] are
    /// accepted.
    async fn update_job_status(&self, id: &JobId, status: String) -> Result<Job, JobError>;

    /// Deletes the job and all of its attachments.
    async fn delete_job(&self, id: &JobId) -> Result<(), JobError>;

    /// Saves several jobs at once, skipping URLs that are already tracked.
    async fn create_jobs(&self, inputs: Vec<JobCreateInput>)
    -> Result<BatchCreateResult, JobError>;
}
