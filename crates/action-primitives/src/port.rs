//! Page collaborator trait

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::{errors::PageError, types::ElementHandle, types::LoadState};

/// Operations the application workflow needs from a live browser page.
///
/// Every call is a suspension point; implementations must not return before
/// the awaited condition (or its bound) resolves.
#[async_trait]
pub trait PagePort: Send + Sync {
    /// URL of the document currently shown
    async fn current_url(&self) -> Result<String, PageError>;

    /// Navigate to `url`
    async fn goto(&self, url: &str) -> Result<(), PageError>;

    /// Wait until `state` is reached, bounded by `timeout`
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration)
        -> Result<(), PageError>;

    /// Fixed delay, e.g. to let an animation finish
    async fn wait_for_timeout(&self, duration: Duration) -> Result<(), PageError>;

    /// First element matching `selector`, if any
    async fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, PageError>;

    /// All elements matching `selector`, in document order
    async fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError>;

    async fn fill(&self, element: &ElementHandle, text: &str) -> Result<(), PageError>;

    /// Attach a local file to a file-input element
    async fn set_input_files(&self, element: &ElementHandle, path: &Path)
        -> Result<(), PageError>;
}
