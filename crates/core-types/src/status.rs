//! Application status and the fixed fit-score table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Raw error text kept in a `FailedError` status, in characters.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 50;

const ERROR_PREFIX: &str = "Failed - Error: ";

/// Fit scores attached to each terminal outcome of an application attempt.
///
/// The further an attempt progressed before failing, the higher the score.
pub mod fit {
    pub const APPLIED: f64 = 1.0;
    pub const MULTI_STEP: f64 = 0.8;
    pub const SUBMISSION_ERROR: f64 = 0.7;
    pub const NO_SUBMIT_BUTTON: f64 = 0.6;
    pub const NO_EASY_APPLY: f64 = 0.5;
    pub const ERROR: f64 = 0.4;
}

/// Outcome of observing or attempting an application
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    /// Listing saved for later review, no attempt made
    Saved,
    Applied,
    FailedNoEasyApply,
    FailedSubmissionError,
    FailedMultiStep,
    FailedNoSubmitButton,
    /// Unexpected page failure; message is truncated on construction
    FailedError { message: String },
}

impl ApplicationStatus {
    /// Build a `FailedError` status, truncating the message
    pub fn failed_error(message: impl AsRef<str>) -> Self {
        ApplicationStatus::FailedError {
            message: truncate_message(message.as_ref(), MAX_ERROR_MESSAGE_CHARS),
        }
    }

    /// Fixed fit score for terminal outcomes; `Saved` scores are caller-assigned
    pub fn fit_score(&self) -> Option<f64> {
        match self {
            ApplicationStatus::Saved => None,
            ApplicationStatus::Applied => Some(fit::APPLIED),
            ApplicationStatus::FailedNoEasyApply => Some(fit::NO_EASY_APPLY),
            ApplicationStatus::FailedSubmissionError => Some(fit::SUBMISSION_ERROR),
            ApplicationStatus::FailedMultiStep => Some(fit::MULTI_STEP),
            ApplicationStatus::FailedNoSubmitButton => Some(fit::NO_SUBMIT_BUTTON),
            ApplicationStatus::FailedError { .. } => Some(fit::ERROR),
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, ApplicationStatus::Saved | ApplicationStatus::Applied)
    }

    /// Short machine-friendly tag, used for filtering on the CLI
    pub fn tag(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "saved",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::FailedNoEasyApply => "no-easy-apply",
            ApplicationStatus::FailedSubmissionError => "submission-error",
            ApplicationStatus::FailedMultiStep => "multi-step",
            ApplicationStatus::FailedNoSubmitButton => "no-submit-button",
            ApplicationStatus::FailedError { .. } => "error",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Saved => f.write_str("Saved"),
            ApplicationStatus::Applied => f.write_str("Applied"),
            ApplicationStatus::FailedNoEasyApply => f.write_str("Failed - No Easy Apply"),
            ApplicationStatus::FailedSubmissionError => f.write_str("Failed - Submission Error"),
            ApplicationStatus::FailedMultiStep => f.write_str("Failed - Multi-step Application"),
            ApplicationStatus::FailedNoSubmitButton => f.write_str("Failed - No Submit Button"),
            ApplicationStatus::FailedError { message } => write!(f, "{ERROR_PREFIX}{message}"),
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(message) = s.strip_prefix(ERROR_PREFIX) {
            return Ok(ApplicationStatus::FailedError {
                message: message.to_string(),
            });
        }
        match s {
            "Saved" => Ok(ApplicationStatus::Saved),
            "Applied" => Ok(ApplicationStatus::Applied),
            "Failed - No Easy Apply" => Ok(ApplicationStatus::FailedNoEasyApply),
            "Failed - Submission Error" => Ok(ApplicationStatus::FailedSubmissionError),
            "Failed - Multi-step Application" => Ok(ApplicationStatus::FailedMultiStep),
            "Failed - No Submit Button" => Ok(ApplicationStatus::FailedNoSubmitButton),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Truncate to at most `max_chars` characters, never splitting a code point
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => message[..idx].to_string(),
        None => message.to_string(),
    }
}
