use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::jobs::DEFAULT_SOURCE;
use crate::domain::JobId;

/// Canonical application states.
///
/// Status is stored as an open string so clients can move a job to any
/// value; these five are the ones the UI knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    New,
    Viewed,
    Applied,
    Rejected,
    Shortlisted,
}

impl JobStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Viewed,
        Self::Applied,
        Self::Rejected,
        Self::Shortlisted,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Viewed => "viewed",
            Self::Applied => "applied",
            Self::Rejected => "rejected",
            Self::Shortlisted => "shortlisted",
        }
    }

    #[must_use]
    pub fn is_canonical(status: &str) -> bool {
        status.parse::<Self>().is_ok()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown job status: {s}"))
    }
}

/// A tracked job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: JobId,
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
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCreateInput {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_url: String,
    pub description: String,
    pub salary: String,
    pub job_type: String,
    pub is_remote: bool,
    pub source: String,
    pub notes: String,
}

impl JobCreateInput {
    /// Builds a new job in the initial state.
    #[must_use]
    pub fn into_job(self, id: JobId, now: DateTime<Utc>) -> Job {
        let source = if self.source.is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            self.source
        };

        Job {
            id,
            job_title: self.job_title,
            company_name: self.company_name,
            location: self.location,
            job_url: self.job_url,
            description: self.description,
            salary: self.salary,
            job_type: self.job_type,
            is_remote: self.is_remote,
            source,
            status: JobStatus::New.to_string(),
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` and empty strings leave the stored value alone;
/// `is_remote` is only written when the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobUpdate {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub is_remote: Option<bool>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl JobUpdate {
    /// The new URL, if this update changes it.
    #[must_use]
    pub fn new_url(&self) -> Option<&str> {
        self.job_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn apply_to(self, job: &mut Job) {
        fn set(target: &mut String, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                *target = value;
            }
        }

        set(&mut job.job_title, self.job_title);
        set(&mut job.company_name, self.company_name);
        set(&mut job.location, self.location);
        set(&mut job.job_url, self.job_url);
        set(&mut job.description, self.description);
        set(&mut job.salary, self.salary);
        set(&mut job.job_type, self.job_type);
        set(&mut job.source, self.source);
        set(&mut job.status, self.status);
        set(&mut job.notes, self.notes);

        if let Some(is_remote) = self.is_remote {
            job.is_remote = is_remote;
        }
    }
}

/// Equality filters for listing; empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobFilter {
    pub status: Option<String>,
    pub source: Option<String>,
}

impl JobFilter {
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }
}

/// Outcome of saving several jobs at once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchCreateResult {
    pub created: Vec<Job>,
    /// URLs that were already tracked or repeated within the batch.
    pub skipped: Vec<String>,
}
