//! Flow execution error types

use action_locator::LocatorError;
use action_primitives::PageError;
use jobpilot_outcome_store::StoreError;
use thiserror::Error;

/// Flow execution errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// Page interaction failed mid-flow
    #[error("Page interaction failed: {0}")]
    Page(#[from] PageError),

    /// Locator query failed
    #[error("Locator failed: {0}")]
    Locator(#[from] LocatorError),

    /// Outcome could not be persisted
    #[error("Outcome store failed: {0}")]
    Store(#[from] StoreError),
}

impl FlowError {
    /// Page-level failures end the attempt; store failures reach the caller
    pub fn is_transient(&self) -> bool {
        !matches!(self, FlowError::Store(_))
    }

    /// Innermost message, without wrapper prefixes
    pub fn detail(&self) -> String {
        match self {
            FlowError::Page(err) | FlowError::Locator(LocatorError::Page(err)) => err.to_string(),
            other => other.to_string(),
        }
    }
}
