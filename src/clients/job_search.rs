use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants::search::GATEWAY_METHOD;

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("failed to call search gateway: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search gateway returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode search gateway response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Parameters forwarded verbatim to the gateway's `search_jobs` method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub site_names: String,
    pub search_term: String,
    pub location: String,
    pub country_indeed: String,
    pub distance: i32,
    pub job_type: String,
    pub results_wanted: i32,
    pub hours_old: i32,
    pub is_remote: bool,
    pub format: String,
}

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    method: &'static str,
    params: &'a SearchParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GatewayResponse {
    pub count: i64,
    pub message: String,
    pub jobs: Option<Vec<GatewayJob>>,
}

/// One upstream record. Different job boards populate different keys, so
/// every field is optional and the aliases are resolved by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayJob {
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,

    #[serde(rename = "jobUrl")]
    pub job_url: Option<String>,
    #[serde(rename = "jobUrlDirect")]
    pub job_url_direct: Option<String>,
    pub url: Option<String>,

    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    pub company: Option<String>,

    pub salary: Option<String>,
    #[serde(rename = "minAmount")]
    pub min_amount: Option<f64>,
    #[serde(rename = "maxAmount")]
    pub max_amount: Option<f64>,

    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "jobType")]
    pub job_type: Option<String>,
    #[serde(rename = "isRemote")]
    pub is_remote: Option<bool>,
    pub source: Option<String>,
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    base_url: String,
}

impl JobSearchClient {
    #[must_use]
    pub fn with_shared_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api", self.base_url)
    }

    /// Runs one search against the gateway. No retries.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<GatewayJob>, JobSearchError> {
        let body = GatewayRequest {
            method: GATEWAY_METHOD,
            params,
        };

        debug!(
            term = %params.search_term,
            location = %params.location,
            "Querying search gateway"
        );

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let decoded: GatewayResponse =
            serde_json::from_slice(&bytes).map_err(JobSearchError::Decode)?;

        let jobs = decoded.jobs.unwrap_or_default();
        debug!(
            reported = decoded.count,
            received = jobs.len(),
            "Search gateway responded"
        );
        Ok(jobs)
    }
}
