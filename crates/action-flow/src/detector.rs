//! Quick-apply detection
//!
//! The located entry control travels as an explicit value from the detector to
//! the driver. A `HandleSlot` holds it between the two calls for one session.

use std::sync::Arc;

use action_locator::{ControlKind, ElementLocator, LocatorStrategy, RuleTableLocator};
use action_primitives::{ElementHandle, PagePort};
use jobpilot_outcome_store::same_link;
use tracing::{debug, info};

use crate::errors::FlowError;

/// Easy Apply control found on a specific job page
#[derive(Debug, Clone, PartialEq)]
pub struct QuickApplyHandle {
    pub element: ElementHandle,

    /// URL of the page the control was found on
    pub page_url: String,

    pub strategy: LocatorStrategy,
}

impl QuickApplyHandle {
    pub fn belongs_to(&self, url: &str) -> bool {
        same_link(&self.page_url, url)
    }
}

/// Last detector verdict for one page
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Found(QuickApplyHandle),

    /// The detector ran on `page_url` and found no Easy Apply control
    Absent { page_url: String },
}

impl Detection {
    pub fn page_url(&self) -> &str {
        match self {
            Detection::Found(handle) => &handle.page_url,
            Detection::Absent { page_url } => page_url,
        }
    }
}

/// Per-session holder for the last detector verdict
#[derive(Debug, Default, Clone)]
pub struct HandleSlot {
    last: Option<Detection>,
}

impl HandleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, handle: QuickApplyHandle) {
        self.last = Some(Detection::Found(handle));
    }

    /// Remember that `page_url` has no Easy Apply control
    pub fn mark_absent(&mut self, page_url: impl Into<String>) {
        self.last = Some(Detection::Absent {
            page_url: page_url.into(),
        });
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Handle from the last detection, if it found one
    pub fn get(&self) -> Option<&QuickApplyHandle> {
        match &self.last {
            Some(Detection::Found(handle)) => Some(handle),
            _ => None,
        }
    }

    pub fn detection(&self) -> Option<&Detection> {
        self.last.as_ref()
    }

    /// No verdict recorded
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Take the verdict only if it was reached on `url`; a verdict for
    /// another page is discarded
    pub fn take_detection(&mut self, url: &str) -> Option<Detection> {
        match self.last.take() {
            Some(detection) if same_link(detection.page_url(), url) => Some(detection),
            Some(detection) => {
                debug!(
                    found_on = %detection.page_url(),
                    current = %url,
                    "Discarding Easy Apply detection from another page"
                );
                None
            }
            None => None,
        }
    }

    /// Take the handle only if it was found on `url`
    pub fn take_for(&mut self, url: &str) -> Option<QuickApplyHandle> {
        match self.take_detection(url) {
            Some(Detection::Found(handle)) => Some(handle),
            _ => None,
        }
    }
}

/// Detects whether the open posting offers Easy Apply
#[derive(Clone)]
pub struct QuickApplyDetector {
    locator: Arc<dyn ElementLocator>,
}

impl Default for QuickApplyDetector {
    fn default() -> Self {
        Self::new(Arc::new(RuleTableLocator))
    }
}

impl QuickApplyDetector {
    pub fn new(locator: Arc<dyn ElementLocator>) -> Self {
        Self { locator }
    }

    /// Locate the Easy Apply control on the current page
    pub async fn detect(&self, page: &dyn PagePort) -> Result<Option<QuickApplyHandle>, FlowError> {
        let page_url = page.current_url().await?;
        let located = self.locator.locate(page, ControlKind::EasyApply).await?;

        match located {
            Some(located) => {
                info!(
                    url = %page_url,
                    strategy = located.strategy.name(),
                    text = %located.text(),
                    "Easy Apply available"
                );
                Ok(Some(QuickApplyHandle {
                    element: located.element,
                    page_url,
                    strategy: located.strategy,
                }))
            }
            None => {
                info!(url = %page_url, "No Easy Apply control on this posting");
                Ok(None)
            }
        }
    }

    /// Detect into `slot`: holds the handle on success, an absent verdict
    /// for the page on a miss, and nothing after a failure
    pub async fn detect_into(
        &self,
        page: &dyn PagePort,
        slot: &mut HandleSlot,
    ) -> Result<bool, FlowError> {
        slot.clear();
        let page_url = page.current_url().await?;
        match self.detect(page).await? {
            Some(handle) => {
                slot.store(handle);
                Ok(true)
            }
            None => {
                slot.mark_absent(page_url);
                Ok(false)
            }
        }
    }
}
