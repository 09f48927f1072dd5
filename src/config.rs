//! Configuration management module
//!
//! `AppConfig` is read from YAML; every field has a default so a partial
//! (or missing) file still yields a usable configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use action_flow::DriverSettings;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{JobPilotError, JobPilotResult};

pub const ENV_STORE_PATH: &str = "JOBPILOT_STORE_PATH";
pub const ENV_CV_PATH: &str = "JOBPILOT_CV_PATH";
pub const ENV_JOBS_URL: &str = "JOBPILOT_JOBS_URL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV file holding every job record
    pub store_path: PathBuf,

    /// CV document handed to the agent and uploaded to forms
    pub cv_path: PathBuf,

    /// Job board page opened by `browse_jobs`
    pub jobs_url: String,

    pub login: LoginSettings,

    pub apply: ApplySettings,

    /// Extra or overriding canned answers, keyed by lowercase substring
    pub answers: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./data/jobs.csv"),
            cv_path: PathBuf::from("./data/cv.txt"),
            jobs_url: "https://www.linkedin.com/jobs/collections/recommended/".to_string(),
            login: LoginSettings::default(),
            apply: ApplySettings::default(),
            answers: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
    pub url: String,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
    /// URL substrings that only appear once the user is signed in
    pub success_markers: Vec<String>,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            url: "https://www.linkedin.com/login".to_string(),
            poll_interval_secs: 5,
            timeout_secs: 300,
            success_markers: ["feed", "checkpoint", "dashboard", "home"]
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }
}

impl LoginSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplySettings {
    pub network_idle_timeout_ms: u64,
    pub settle_delay_ms: u64,
    /// Refuse to re-apply to a link that already has an `Applied` record
    pub skip_already_applied: bool,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            network_idle_timeout_ms: 10_000,
            settle_delay_ms: 2_000,
            skip_already_applied: true,
        }
    }
}

impl ApplySettings {
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            network_idle_timeout: Duration::from_millis(self.network_idle_timeout_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }
}

impl AppConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str, origin: &Path) -> JobPilotResult<Self> {
        let config: AppConfig = serde_yaml::from_str(content)
            .map_err(|err| JobPilotError::config(origin, err.to_string()))?;
        config.validate(origin)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> JobPilotResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| JobPilotError::config(path, err.to_string()))?;
        Self::from_yaml_str(&content, path)
    }

    /// Apply `JOBPILOT_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STORE_PATH).filter(|v| !v.trim().is_empty()) {
            info!(%path, "Store path overridden from {}", ENV_STORE_PATH);
            self.store_path = PathBuf::from(path.trim());
        }
        if let Some(path) = lookup(ENV_CV_PATH).filter(|v| !v.trim().is_empty()) {
            info!(%path, "CV path overridden from {}", ENV_CV_PATH);
            self.cv_path = PathBuf::from(path.trim());
        }
        if let Some(url) = lookup(ENV_JOBS_URL).filter(|v| !v.trim().is_empty()) {
            info!(%url, "Jobs URL overridden from {}", ENV_JOBS_URL);
            self.jobs_url = url.trim().to_string();
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env_overrides(|key| std::env::var(key).ok());
    }

    pub fn validate(&self, origin: &Path) -> JobPilotResult<()> {
        for (name, value) in [("jobs_url", &self.jobs_url), ("login.url", &self.login.url)] {
            url::Url::parse(value).map_err(|err| {
                JobPilotError::config(origin, format!("{name} '{value}' is not a URL: {err}"))
            })?;
        }
        if self.login.poll_interval_secs == 0 {
            return Err(JobPilotError::config(
                origin,
                "login.poll_interval_secs must be at least 1",
            ));
        }
        if self.login.success_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(JobPilotError::config(
                origin,
                "login.success_markers must list at least one marker",
            ));
        }
        Ok(())
    }
}
