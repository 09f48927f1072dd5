//! Job records as persisted by the outcome store

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::status::ApplicationStatus;

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// One observed or attempted application.
///
/// Records are created once, appended to the store, and never mutated.
/// `link` is the natural dedup key, although nothing enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub link: String,
    pub fit_score: f64,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub status: ApplicationStatus,
}

impl JobRecord {
    /// Create a record, applying the title/company placeholders
    pub fn new(
        title: Option<&str>,
        company: Option<&str>,
        link: impl Into<String>,
        fit_score: f64,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            title: normalize(title, UNKNOWN_TITLE),
            company: normalize(company, UNKNOWN_COMPANY),
            link: link.into().trim().to_string(),
            fit_score,
            location: None,
            salary: None,
            status,
        }
    }

    /// Record for a terminal application outcome, scored from the fixed table
    pub fn outcome(
        title: Option<&str>,
        company: Option<&str>,
        link: impl Into<String>,
        status: ApplicationStatus,
    ) -> Self {
        let fit_score = status.fit_score().unwrap_or_default();
        Self::new(title, company, link, fit_score, status)
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = non_empty(location);
        self
    }

    pub fn with_salary(mut self, salary: Option<String>) -> Self {
        self.salary = non_empty(salary);
        self
    }

    pub fn is_applied(&self) -> bool {
        self.status == ApplicationStatus::Applied
    }
}

/// Listing details supplied by the agent when saving a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobPosting {
    /// Job title/position
    pub title: String,
    /// URL of the job posting
    pub link: String,
    /// Company offering the job
    pub company: String,
    /// How well the job matches the candidate's profile (0-1)
    pub fit_score: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
}

impl JobPosting {
    /// Validate the posting and turn it into a `Saved` record
    pub fn into_saved_record(self) -> Result<JobRecord, CoreError> {
        if !(0.0..=1.0).contains(&self.fit_score) {
            return Err(CoreError::InvalidFitScore(self.fit_score));
        }
        if self.link.trim().is_empty() {
            return Err(CoreError::EmptyLink);
        }
        Ok(JobRecord::new(
            Some(&self.title),
            Some(&self.company),
            self.link,
            self.fit_score,
            ApplicationStatus::Saved,
        )
        .with_location(self.location)
        .with_salary(self.salary))
    }
}

fn normalize(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
