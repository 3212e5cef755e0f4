pub mod attachment;
pub mod job;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors surfaced by the repository layer.
///
/// "No matching row" and unique-index violations are classified here so the
/// services never have to inspect driver errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Classifies an error returned by an insert or update.
    pub(crate) fn from_write(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(msg),
            _ => Self::Database(err),
        }
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;
