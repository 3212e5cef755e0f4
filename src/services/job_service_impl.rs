//! `SeaORM` implementation of the [`JobService`] trait.

use crate::constants::jobs::MAX_BATCH_SIZE;
use crate::db::{RepositoryError, Store};
use crate::domain::JobId;
use crate::models::{BatchCreateResult, Job, JobCreateInput, JobFilter, JobStatus, JobUpdate};
use crate::services::job_service::{JobError, JobService, validate_create_input, validate_job_url};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, warn};

pub struct SeaOrmJobService {
    store: Store,
}

impl SeaOrmJobService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn url_taken(&self, url: &str) -> Result<bool, JobError> {
        self.store
            .job_exists_by_url(url)
            .await
            .map_err(|e| JobError::Database(e.to_string()))
    }

    async fn load(&self, id: &JobId) -> Result<Job, JobError> {
        self.store
            .get_job(id)
            .await
            .map_err(|e| JobError::from_repo(e, id))
    }

    async fn save(&self, job: &Job) -> Result<(), JobError> {
        self.store.update_job(job).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => JobError::AlreadyExists(job.job_url.clone()),
            other => JobError::from_repo(other, &job.id),
        })
    }
}

#[async_trait::async_trait]
impl JobService for SeaOrmJobService {
    async fn create_job(&self, input: JobCreateInput) -> Result<Job, JobError> {
        validate_create_input(&input)?;

        if self.url_taken(&input.job_url).await? {
            return Err(JobError::AlreadyExists(input.job_url));
        }

        let job = input.into_job(JobId::generate(), Utc::now());

        self.store.create_job(&job).await.map_err(|e| match e {
            // Lost the race against a concurrent insert of the same URL.
            RepositoryError::Conflict(_) => JobError::AlreadyExists(job.job_url.clone()),
            other => JobError::from_repo(other, &job.id),
        })?;

        info!(job_id = %job.id, source = %job.source, "Job created");
        Ok(job)
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, JobError> {
        self.load(id).await
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, JobError> {
        self.store
            .list_jobs(filter)
            .await
            .map_err(|e| JobError::Database(e.to_string()))
    }

    async fn update_job(&self, id: &JobId, update: JobUpdate) -> Result<Job, JobError> {
        let mut job = self.load(id).await?;

        if let Some(url) = update.new_url()
            && url != job.job_url
        {
            validate_job_url(url)?;
            if self.url_taken(url).await? {
                return Err(JobError::AlreadyExists(url.to_string()));
            }
        }

        update.apply_to(&mut job);
        job.updated_at = Utc::now();

        self.save(&job).await?;
        Ok(job)
    }

    async fn update_job_status(&self, id: &JobId, status: String) -> Result<Job, JobError> {
        let mut job = self.load(id).await?;

        if !JobStatus::is_canonical(&status) {
            warn!(job_id = %id, status = %status, "Setting non-standard job status");
        }

        job.status = status;
        job.updated_at = Utc::now();

        self.save(&job).await?;
        info!(job_id = %id, status = %job.status, "Job status changed");
        Ok(job)
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), JobError> {
        let removed = self
            .store
            .delete_job(id)
            .await
            .map_err(|e| JobError::from_repo(e, id))?;

        info!(job_id = %id, attachments = removed, "Job deleted");
        Ok(())
    }

    async fn create_jobs(
        &self,
        inputs: Vec<JobCreateInput>,
    ) -> Result<BatchCreateResult, JobError> {
        if inputs.len() > MAX_BATCH_SIZE {
            return Err(JobError::InvalidInput(format!(
                "batch contains {} jobs, at most {MAX_BATCH_SIZE} are allowed",
                inputs.len()
            )));
        }
        for input in &inputs {
            validate_create_input(input)?;
        }

        let now = Utc::now();
        let mut seen = HashSet::new();
        let mut result = BatchCreateResult::default();

        for input in inputs {
            if !seen.insert(input.job_url.clone()) || self.url_taken(&input.job_url).await? {
                result.skipped.push(input.job_url);
                continue;
            }
            result.created.push(input.into_job(JobId::generate(), now));
        }

        self.store
            .create_jobs(&result.created)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => JobError::AlreadyExists(msg),
                other => JobError::Database(other.to_string()),
            })?;

        info!(
            created = result.created.len(),
            skipped = result.skipped.len(),
            "Batch job import finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn service() -> (SeaOrmJobService, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        (SeaOrmJobService::new(store.clone()), store)
    }

    fn input(title: &str, url: &str) -> JobCreateInput {
        JobCreateInput {
            job_title: title.to_string(),
            job_url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_defaults() {
        let (svc, _) = service().await;
        let job = svc
            .create_job(input("Engineer", "http://a.com/job1"))
            .await
            .unwrap();

        assert!(!job.id.as_str().is_empty());
        assert_eq!(job.status, "new");
        assert_eq!(job.source, "manual");
        assert_eq!(svc.get_job(&job.id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn duplicate_url_is_rejected() {
        let (svc, _) = service().await;
        svc.create_job(input("Engineer", "http://a.com/job1"))
            .await
            .unwrap();

        let err = svc
            .create_job(input("Other", "http://a.com/job1"))
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::AlreadyExists(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let (svc, _) = service().await;
        assert!(matches!(
            svc.create_job(input("", "http://a.com/x")).await,
            Err(JobError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.create_job(input("Engineer", "a.com/x")).await,
            Err(JobError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filterable() {
        let (svc, store) = service().await;
        let now = Utc::now();

        for (i, status) in ["new", "applied", "applied"].into_iter().enumerate() {
            let mut job = input(&format!("Job {i}"), &format!("https://x.example/{i}"))
                .into_job(JobId::generate(), now - Duration::minutes(10 - i as i64));
            job.status = status.to_string();
            store.create_job(&job).await.unwrap();
        }

        let all = svc.list_jobs(&JobFilter::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|j| j.job_title.as_str()).collect();
        assert_eq!(titles, ["Job 2", "Job 1", "Job 0"]);
        assert!(all.windows(2).all(|w| w[0].created_at > w[1].created_at));

        let applied = svc
            .list_jobs(&JobFilter {
                status: Some("applied".to_string()),
                source: None,
            })
            .await
            .unwrap();
        assert_eq!(applied.len(), 2);
        assert!(applied.iter().all(|j| j.status == "applied"));

        let none = svc
            .list_jobs(&JobFilter {
                status: None,
                source: Some("linkedin".to_string()),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn partial_update_only_touches_given_fields() {
        let (svc, _) = service().await;
        let created = svc
            .create_job(JobCreateInput {
                company_name: "Acme".to_string(),
                is_remote: true,
                ..input("Engineer", "https://acme.example/1")
            })
            .await
            .unwrap();

        let update: JobUpdate = serde_json::from_str(r#"{"notes": "x"}"#).unwrap();
        let updated = svc.update_job(&created.id, update).await.unwrap();

        assert_eq!(updated.notes, "x");
        assert_eq!(updated.job_title, created.job_title);
        assert_eq!(updated.company_name, created.company_name);
        assert!(updated.is_remote);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let stored = svc.get_job(&created.id).await.unwrap();
        assert_eq!(stored.notes, "x");
    }

    #[tokio::test]
    async fn update_to_taken_url_conflicts() {
        let (svc, _) = service().await;
        svc.create_job(input("A", "https://x.example/a"))
            .await
            .unwrap();
        let b = svc
            .create_job(input("B", "https://x.example/b"))
            .await
            .unwrap();

        let update = JobUpdate {
            job_url: Some("https://x.example/a".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_job(&b.id, update).await,
            Err(JobError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn update_missing_job_is_not_found() {
        let (svc, _) = service().await;
        let id = JobId::new("nope");
        assert!(matches!(
            svc.update_job(&id, JobUpdate::default()).await,
            Err(JobError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_job_status(&id, "applied".to_string()).await,
            Err(JobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn status_accepts_any_value() {
        let (svc, _) = service().await;
        let job = svc
            .create_job(input("Engineer", "https://s.example/1"))
            .await
            .unwrap();

        let applied = svc
            .update_job_status(&job.id, "applied".to_string())
            .await
            .unwrap();
        assert_eq!(applied.status, "applied");

        let custom = svc
            .update_job_status(&job.id, "ghosted".to_string())
            .await
            .unwrap();
        assert_eq!(custom.status, "ghosted");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (svc, _) = service().await;
        let job = svc
            .create_job(input("Engineer", "https://d.example/1"))
            .await
            .unwrap();

        svc.delete_job(&job.id).await.unwrap();
        assert!(matches!(
            svc.get_job(&job.id).await,
            Err(JobError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_job(&job.id).await,
            Err(JobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn batch_skips_known_and_repeated_urls() {
        let (svc, _) = service().await;
        svc.create_job(input("Existing", "https://b.example/1"))
            .await
            .unwrap();

        let result = svc
            .create_jobs(vec![
                input("One", "https://b.example/1"),
                input("Two", "https://b.example/2"),
                input("Two again", "https://b.example/2"),
                input("Three", "https://b.example/3"),
            ])
            .await
            .unwrap();

        assert_eq!(result.created.len(), 2);
        assert_eq!(result.skipped, ["https://b.example/1", "https://b.example/2"]);
        assert_eq!(svc.list_jobs(&JobFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn batch_rejects_invalid_members() {
        let (svc, _) = service().await;
        let err = svc
            .create_jobs(vec![input("Ok", "https://b.example/1"), input("", "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidInput(_)));
        assert!(svc.list_jobs(&JobFilter::default()).await.unwrap().is_empty());
    }
}
