//! Core types for the application flow

use action_locator::ControlKind;
use jobpilot_core_types::JobRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Driver states.
///
/// `Idle -> AwaitingDialog -> (ReviewStep)? -> SubmitStep -> Done`, with early
/// exits to `Done` from every state. `Done` is never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyState {
    Idle,
    AwaitingDialog,
    ReviewStep,
    SubmitStep,
    Done,
}

impl ApplyState {
    pub fn name(&self) -> &'static str {
        match self {
            ApplyState::Idle => "idle",
            ApplyState::AwaitingDialog => "awaiting-dialog",
            ApplyState::ReviewStep => "review-step",
            ApplyState::SubmitStep => "submit-step",
            ApplyState::Done => "done",
        }
    }
}

/// Timing knobs for dialog settling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    /// Bound on each network-idle wait
    pub network_idle_timeout: Duration,

    /// Extra fixed delay after network idle, for dialog animations
    pub settle_delay: Duration,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            network_idle_timeout: Duration::from_millis(10_000),
            settle_delay: Duration::from_millis(2_000),
        }
    }
}

/// What one application attempt did and how it ended
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationReport {
    /// Record handed to the outcome store
    pub record: JobRecord,

    /// Controls clicked, in order
    pub clicks: Vec<ControlKind>,

    /// States visited, ending with `Done`
    pub path: Vec<ApplyState>,
}

impl ApplicationReport {
    pub fn applied(&self) -> bool {
        self.record.is_applied()
    }
}
