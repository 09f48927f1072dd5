//! Error types for locator system

use action_primitives::PageError;
use thiserror::Error;

/// Locator error enumeration
///
/// Not finding an element is not an error; resolution returns `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocatorError {
    /// Page query failed
    #[error("Page query failed: {0}")]
    Page(#[from] PageError),

    /// Rule declared without any matcher
    #[error("Rule '{0}' has no matchers")]
    EmptyRule(&'static str),
}

impl LocatorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            LocatorError::Page(err) => err.is_retryable(),
            LocatorError::EmptyRule(_) => false,
        }
    }
}
