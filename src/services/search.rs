use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::job_search::{GatewayJob, JobSearchClient, JobSearchError, SearchParams};
use crate::db::Store;
use crate::models::JobStatus;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Gateway(#[from] JobSearchError),
}

/// A gateway posting shaped like a job, flagged with whether it is already
/// tracked locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_url: String,
    pub description: String,
    pub salary: String,
    pub job_type: String,
    pub is_remote: bool,
    pub source: String,
    pub status: String,
    pub is_saved: bool,
}

fn first_non_empty(candidates: [&Option<String>; 3]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default()
}

fn salary_of(record: &GatewayJob) -> String {
    if let Some(salary) = record.salary.as_ref().filter(|s| !s.is_empty()) {
        return salary.clone();
    }

    let min = record.min_amount.unwrap_or(0.0);
    let max = record.max_amount.unwrap_or(0.0);
    if min > 0.0 || max > 0.0 {
        format!("{min:.0}-{max:.0}")
    } else {
        String::new()
    }
}

/// Normalizes gateway records in order.
///
/// The first record carrying a URL wins that URL, even when it is then
/// dropped for having no title. Records with no URL are never deduplicated.
#[must_use]
pub fn coalesce_postings(records: Vec<GatewayJob>) -> Vec<SearchResult> {
    let mut seen_urls = HashSet::new();
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        let job_url = first_non_empty([&record.job_url, &record.job_url_direct, &record.url]);

        // An untitled record still claims its URL.
        if !job_url.is_empty() && !seen_urls.insert(job_url.clone()) {
            continue;
        }

        let job_title = first_non_empty([&record.job_title, &record.title, &record.summary]);
        if job_title.is_empty() {
            continue;
        }

        let company_name = first_non_empty([&record.company_name, &record.company, &None]);
        let salary = salary_of(&record);

        results.push(SearchResult {
            job_title,
            company_name,
            location: record.location.unwrap_or_default(),
            job_url,
            description: record.description.unwrap_or_default(),
            salary,
            job_type: record.job_type.unwrap_or_default(),
            is_remote: record.is_remote.unwrap_or(false),
            source: record.source.unwrap_or_default(),
            status: JobStatus::New.to_string(),
            is_saved: false,
        });
    }

    results
}

pub struct SearchService {
    store: Store,
    client: JobSearchClient,
}

impl SearchService {
    #[must_use]
    pub const fn new(store: Store, client: JobSearchClient) -> Self {
        Self { store, client }
    }

    /// Queries the gateway and marks postings that are already tracked.
    /// Nothing is persisted.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<SearchResult>, SearchError> {
        let records = self.client.search(params).await?;
        let received = records.len();

        let results = self.reconcile(records).await;

        info!(
            term = %params.search_term,
            received,
            returned = results.len(),
            "Job search completed"
        );
        Ok(results)
    }

    pub async fn reconcile(&self, records: Vec<GatewayJob>) -> Vec<SearchResult> {
        let mut results = coalesce_postings(records);

        for result in &mut results {
            if result.job_url.is_empty() {
                continue;
            }
            result.is_saved = match self.store.job_exists_by_url(&result.job_url).await {
                Ok(exists) => exists,
                Err(e) => {
                    warn!(url = %result.job_url, error = %e, "Saved-status lookup failed");
                    false
                }
            };
        }

        debug!(
            saved = results.iter().filter(|r| r.is_saved).count(),
            "Reconciled search results"
        );
        results
    }
}
