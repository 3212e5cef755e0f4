use crate::domain::{AttachmentId, JobId};
use crate::models::{AttachmentFile, AttachmentMeta, Job, JobFilter};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::{RepoResult, RepositoryError};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let mut max_connections = max_connections;

        if db_url.starts_with("sqlite:") {
            if db_url.contains(":memory:") {
                // Every pooled connection to an in-memory database is its own
                // database unless they share one connection.
                max_connections = 1;
            } else {
                let path_str = db_url
                    .trim_start_matches("sqlite://")
                    .trim_start_matches("sqlite:");
                let path_str = path_str.split('?').next().unwrap_or(path_str);
                if let Some(parent) = Path::new(path_str).parent() {
                    tokio::fs::create_dir_all(parent).await.ok();
                }
                if !Path::new(path_str).exists() {
                    std::fs::File::create(path_str)
                        .with_context(|| format!("Failed to create database file {path_str}"))?;
                }
            }
        }

        let min_connections = min_connections.min(max_connections);

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply database migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn job_repo(&self) -> repositories::job::JobRepository {
        repositories::job::JobRepository::new(self.conn.clone())
    }

    fn attachment_repo(&self) -> repositories::attachment::AttachmentRepository {
        repositories::attachment::AttachmentRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------------

    pub async fn create_job(&self, job: &Job) -> RepoResult<()> {
        self.job_repo().create(job).await
    }

    pub async fn create_jobs(&self, jobs: &[Job]) -> RepoResult<()> {
        self.job_repo().create_batch(jobs).await
    }

    pub async fn get_job(&self, id: &JobId) -> RepoResult<Job> {
        self.job_repo().get(id).await
    }

    pub async fn list_jobs(&self, filter: &JobFilter) -> RepoResult<Vec<Job>> {
        self.job_repo().list(filter).await
    }

    pub async fn job_exists_by_url(&self, url: &str) -> RepoResult<bool> {
        self.job_repo().exists_by_url(url).await
    }

    pub async fn update_job(&self, job: &Job) -> RepoResult<()> {
        self.job_repo().update(job).await
    }

    pub async fn delete_job(&self, id: &JobId) -> RepoResult<u64> {
        self.job_repo().delete(id).await
    }

    // ------------------------------------------------------------------------
    // Attachments
    // ------------------------------------------------------------------------

    pub async fn create_attachment(&self, file: &AttachmentFile) -> RepoResult<()> {
        self.attachment_repo().create(file).await
    }

    pub async fn get_attachment(&self, id: &AttachmentId) -> RepoResult<AttachmentMeta> {
        self.attachment_repo().get_meta(id).await
    }

    pub async fn get_attachment_file(&self, id: &AttachmentId) -> RepoResult<AttachmentFile> {
        self.attachment_repo().get_file(id).await
    }

    pub async fn list_attachments_for_job(&self, job_id: &JobId) -> RepoResult<Vec<AttachmentMeta>> {
        self.attachment_repo().list_for_job(job_id).await
    }

    pub async fn delete_attachment(&self, id: &AttachmentId) -> RepoResult<()> {
        self.attachment_repo().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobCreateInput;
    use chrono::Utc;

    fn job(url: &str) -> Job {
        JobCreateInput {
            job_title: "Engineer".to_string(),
            job_url: url.to_string(),
            ..Default::default()
        }
        .into_job(JobId::generate(), Utc::now())
    }

    #[tokio::test]
    async fn duplicate_url_insert_is_a_conflict() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.create_job(&job("https://a.example/1")).await.unwrap();

        let err = store
            .create_job(&job("https://a.example/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_rows_map_to_not_found() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let id = JobId::new("missing");

        assert!(matches!(
            store.get_job(&id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete_job(&id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.update_job(&job("https://a.example/ghost")).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete_attachment(&AttachmentId::new("missing")).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn batch_insert_and_exists() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let jobs = vec![job("https://b.example/1"), job("https://b.example/2")];
        store.create_jobs(&jobs).await.unwrap();
        store.create_jobs(&[]).await.unwrap();

        assert!(store.job_exists_by_url("https://b.example/2").await.unwrap());
        assert!(!store.job_exists_by_url("https://b.example/3").await.unwrap());
        assert_eq!(store.list_jobs(&JobFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ping_succeeds() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();
    }
}
