//! Error handling module
//!
//! Aggregates the crate-level errors into one type for the action boundary
//! and the CLI.

use std::path::PathBuf;
use std::time::Duration;

use action_flow::FlowError;
use action_primitives::PageError;
use jobpilot_core_types::CoreError;
use jobpilot_outcome_store::StoreError;
use thiserror::Error;

use crate::cv::CvError;

pub type JobPilotResult<T> = Result<T, JobPilotError>;

#[derive(Debug, Error)]
pub enum JobPilotError {
    #[error("Invalid job data: {0}")]
    Core(#[from] CoreError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cv(#[from] CvError),

    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Login not confirmed within {}", human(.waited))]
    LoginTimeout { waited: Duration, last_url: String },

    #[error("{0}")]
    Action(String),
}

fn human(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

impl JobPilotError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        JobPilotError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn action(message: impl Into<String>) -> Self {
        JobPilotError::Action(message.into())
    }

    /// Failures that lose user data rather than a single page attempt
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            JobPilotError::Store(_) | JobPilotError::Flow(FlowError::Store(_))
        )
    }
}
