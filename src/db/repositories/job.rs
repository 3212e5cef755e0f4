use crate::domain::JobId;
use crate::entities::{attachments, jobs, prelude::*};
use crate::models::{Job, JobFilter};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::{debug, info};

use super::{RepoResult, RepositoryError};

/// Repository for job postings
pub struct JobRepository {
    conn: DatabaseConnection,
}

impl JobRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(m: jobs::Model) -> Job {
        Job {
            id: JobId::from(m.id),
            job_title: m.job_title,
            company_name: m.company_name,
            location: m.location,
            job_url: m.job_url,
            description: m.description,
            salary: m.salary,
            job_type: m.job_type,
            is_remote: m.is_remote,
            source: m.source,
            status: m.status,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn to_active_model(job: &Job) -> jobs::ActiveModel {
        jobs::ActiveModel {
            id: Set(job.id.as_str().to_string()),
            job_title: Set(job.job_title.clone()),
            company_name: Set(job.company_name.clone()),
            location: Set(job.location.clone()),
            job_url: Set(job.job_url.clone()),
            description: Set(job.description.clone()),
            salary: Set(job.salary.clone()),
            job_type: Set(job.job_type.clone()),
            is_remote: Set(job.is_remote),
            source: Set(job.source.clone()),
            status: Set(job.status.clone()),
            notes: Set(job.notes.clone()),
            created_at: Set(job.created_at),
            updated_at: Set(job.updated_at),
        }
    }

    // ========================================================================
    // Job Operations
    // ========================================================================

    pub async fn create(&self, job: &Job) -> RepoResult<()> {
        Jobs::insert(Self::to_active_model(job))
            .exec_without_returning(&self.conn)
            .await
            .map_err(RepositoryError::from_write)?;

        debug!(job_id = %job.id, url = %job.job_url, "Inserted job");
        Ok(())
    }

    /// Inserts all jobs with a single statement. Either every row lands or none.
    pub async fn create_batch(&self, jobs: &[Job]) -> RepoResult<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        Jobs::insert_many(jobs.iter().map(Self::to_active_model))
            .exec_without_returning(&self.conn)
            .await
            .map_err(RepositoryError::from_write)?;

        info!("Inserted {} jobs in batch", jobs.len());
        Ok(())
    }

    pub async fn get(&self, id: &JobId) -> RepoResult<Job> {
        Jobs::find_by_id(id.as_str())
            .one(&self.conn)
            .await?
            .map(Self::map_model)
            .ok_or(RepositoryError::NotFound)
    }

    /// Newest first.
    pub async fn list(&self, filter: &JobFilter) -> RepoResult<Vec<Job>> {
        let mut query = Jobs::find();

        if let Some(status) = filter.status() {
            query = query.filter(jobs::Column::Status.eq(status));
        }
        if let Some(source) = filter.source() {
            query = query.filter(jobs::Column::Source.eq(source));
        }

        let rows = query
            .order_by_desc(jobs::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn exists_by_url(&self, url: &str) -> RepoResult<bool> {
        let count = Jobs::find()
            .filter(jobs::Column::JobUrl.eq(url))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn update(&self, job: &Job) -> RepoResult<()> {
        let mut model = Self::to_active_model(job);
        model.created_at = NotSet;

        match Jobs::update(model).exec(&self.conn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::from_write(e)),
        }
    }

    /// Removes a job together with its attachments in one transaction.
    ///
    /// Returns the number of attachments that went with it.
    pub async fn delete(&self, id: &JobId) -> RepoResult<u64> {
        let txn = self.conn.begin().await?;

        let removed = Attachments::delete_many()
            .filter(attachments::Column::JobId.eq(id.as_str()))
            .exec(&txn)
            .await?
            .rows_affected;

        let result = Jobs::delete_by_id(id.as_str()).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await?;
        Ok(removed)
    }
}
