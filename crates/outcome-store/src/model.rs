//! On-disk row layout

use jobpilot_core_types::{ApplicationStatus, JobRecord};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// The one schema this store reads and writes.
///
/// The legacy `Title, Company, Link, Salary, Location, Fit Score, Status`
/// ordering is rejected rather than guessed at.
pub const CANONICAL_HEADER: [&str; 7] = [
    "title",
    "company",
    "link",
    "fit_score",
    "location",
    "salary",
    "status",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct JobRow {
    pub title: String,
    pub company: String,
    pub link: String,
    pub fit_score: f64,
    pub location: String,
    pub salary: String,
    pub status: String,
}

impl From<&JobRecord> for JobRow {
    fn from(record: &JobRecord) -> Self {
        Self {
            title: record.title.clone(),
            company: record.company.clone(),
            link: record.link.clone(),
            fit_score: record.fit_score,
            location: record.location.clone().unwrap_or_default(),
            salary: record.salary.clone().unwrap_or_default(),
            status: record.status.to_string(),
        }
    }
}

impl JobRow {
    pub fn into_record(self, line: u64) -> Result<JobRecord, StoreError> {
        let status: ApplicationStatus =
            self.status.parse().map_err(|err| StoreError::InvalidRow {
                line,
                reason: format!("{err}"),
            })?;
        Ok(JobRecord {
            title: self.title,
            company: self.company,
            link: self.link,
            fit_score: self.fit_score,
            location: optional(self.location),
            salary: optional(self.salary),
            status,
        })
    }
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Compare job links, ignoring surrounding whitespace, fragments and trailing slashes
pub fn same_link(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

fn canonical(link: &str) -> &str {
    let link = link.trim();
    let link = link.split('#').next().unwrap_or(link);
    link.trim_end_matches('/')
}
