//! Error types for page operations

use thiserror::Error;

/// Failures surfaced by a page collaborator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PageError {
    /// Element handle no longer attached to the document
    #[error("Element detached: {0}")]
    Detached(String),

    /// Navigation failed or raced with another navigation
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Bounded wait elapsed
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Selector could not be parsed or evaluated
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// Page or browser context was closed
    #[error("Page closed")]
    Closed,

    /// File access failed (e.g. uploading a document)
    #[error("I/O error: {0}")]
    Io(String),
}

impl PageError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PageError::Timeout(_) | PageError::Navigation(_))
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            PageError::Closed => 3,
            PageError::Navigation(_) | PageError::Io(_) => 2,
            PageError::Detached(_) | PageError::Timeout(_) => 1,
            PageError::Selector(_) => 0,
        }
    }
}
