//! Application driver state machine

use std::sync::Arc;

use action_locator::{
    ControlKind, ElementLocator, LocatedElement, LocatorRule, RuleTableLocator, COMPANY_RULE,
    CONFIRMATION_RULE, JOB_TITLE_RULE,
};
use action_primitives::{LoadState, PageError, PagePort};
use jobpilot_core_types::{ApplicationStatus, JobRecord};
use jobpilot_outcome_store::OutcomeRecorder;
use tracing::{debug, info, warn};

use crate::detector::QuickApplyHandle;
use crate::errors::FlowError;
use crate::types::{ApplicationReport, ApplyState, DriverSettings};

/// Drives one Easy Apply attempt from the job posting to a terminal status.
///
/// Every call to [`ApplicationDriver::run`] writes exactly one record. Page
/// and locator failures become `FailedError`; only store failures escape.
#[derive(Clone)]
pub struct ApplicationDriver {
    locator: Arc<dyn ElementLocator>,
    settings: DriverSettings,
}

impl Default for ApplicationDriver {
    fn default() -> Self {
        Self::new(DriverSettings::default())
    }
}

/// What is known about the attempt so far
#[derive(Debug, Default)]
struct Attempt {
    link: Option<String>,
    title: Option<String>,
    company: Option<String>,
    clicks: Vec<ControlKind>,
    path: Vec<ApplyState>,
}

impl Attempt {
    fn enter(&mut self, state: ApplyState) {
        debug!(state = state.name(), "Driver state");
        self.path.push(state);
    }
}

impl ApplicationDriver {
    pub fn new(settings: DriverSettings) -> Self {
        Self::with_locator(Arc::new(RuleTableLocator), settings)
    }

    pub fn with_locator(locator: Arc<dyn ElementLocator>, settings: DriverSettings) -> Self {
        Self { locator, settings }
    }

    pub fn settings(&self) -> DriverSettings {
        self.settings
    }

    /// Run the attempt and hand its outcome to `store`.
    ///
    /// `handle` is the Easy Apply control returned by the detector for this
    /// page. Without one the driver refuses to click anything.
    pub async fn run(
        &self,
        page: &dyn PagePort,
        handle: Option<QuickApplyHandle>,
        store: &dyn OutcomeRecorder,
    ) -> Result<ApplicationReport, FlowError> {
        let mut attempt = Attempt::default();
        let fallback_link = handle.as_ref().map(|h| h.page_url.clone());

        let status = match self.drive(page, handle, &mut attempt).await {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, clicks = attempt.clicks.len(), "Application attempt failed");
                ApplicationStatus::failed_error(err.detail())
            }
        };
        attempt.enter(ApplyState::Done);

        let link = attempt.link.or(fallback_link).unwrap_or_default();
        let record = JobRecord::outcome(
            attempt.title.as_deref(),
            attempt.company.as_deref(),
            link,
            status,
        );

        info!(
            link = %record.link,
            status = %record.status,
            fit = record.fit_score,
            "Application outcome"
        );
        store.record(record.clone()).await?;

        Ok(ApplicationReport {
            record,
            clicks: attempt.clicks,
            path: attempt.path,
        })
    }

    async fn drive(
        &self,
        page: &dyn PagePort,
        handle: Option<QuickApplyHandle>,
        attempt: &mut Attempt,
    ) -> Result<ApplicationStatus, FlowError> {
        attempt.enter(ApplyState::Idle);

        let url = page.current_url().await?;
        attempt.link = Some(url.clone());

        let handle = match handle {
            Some(handle) if handle.belongs_to(&url) => Some(handle),
            Some(handle) => {
                warn!(
                    found_on = %handle.page_url,
                    current = %url,
                    "Easy Apply handle belongs to another posting"
                );
                None
            }
            None => {
                info!(url = %url, "No Easy Apply handle, not applying");
                None
            }
        };

        attempt.title = self.read_detail(page, &JOB_TITLE_RULE).await;
        attempt.company = self.read_detail(page, &COMPANY_RULE).await;

        let Some(handle) = handle else {
            return Ok(ApplicationStatus::FailedNoEasyApply);
        };

        page.click(&handle.element).await?;
        attempt.clicks.push(ControlKind::EasyApply);
        attempt.enter(ApplyState::AwaitingDialog);
        self.settle(page).await?;

        let next = self.locator.locate(page, ControlKind::Next).await?;
        let review = self.locator.locate(page, ControlKind::Review).await?;
        let submit = self.locator.locate(page, ControlKind::Submit).await?;

        let submit = match (review, next) {
            (Some(review), _) => {
                self.click(page, ControlKind::Review, &review, attempt).await?;
                attempt.enter(ApplyState::ReviewStep);
                self.settle(page).await?;
                self.locator.locate(page, ControlKind::Submit).await?
            }
            (None, Some(_)) => {
                info!("Dialog asks for more steps, leaving it for manual follow-up");
                return Ok(ApplicationStatus::FailedMultiStep);
            }
            (None, None) => submit,
        };

        let Some(submit) = submit else {
            info!("No submit control in the dialog");
            return Ok(ApplicationStatus::FailedNoSubmitButton);
        };

        attempt.enter(ApplyState::SubmitStep);
        self.click(page, ControlKind::Submit, &submit, attempt).await?;
        self.settle(page).await?;

        match self.locator.locate_rule(page, &CONFIRMATION_RULE).await? {
            Some(marker) => {
                debug!(text = %marker.text(), "Submission confirmed");
                Ok(ApplicationStatus::Applied)
            }
            None => Ok(ApplicationStatus::FailedSubmissionError),
        }
    }

    async fn click(
        &self,
        page: &dyn PagePort,
        kind: ControlKind,
        located: &LocatedElement,
        attempt: &mut Attempt,
    ) -> Result<(), FlowError> {
        debug!(control = kind.name(), node = %located.element.node_id, "Clicking");
        page.click(&located.element).await?;
        attempt.clicks.push(kind);
        Ok(())
    }

    /// Wait for the dialog to re-render: network idle (bounded) plus the
    /// fixed animation delay. An idle timeout is not fatal.
    async fn settle(&self, page: &dyn PagePort) -> Result<(), FlowError> {
        match page
            .wait_for_load_state(LoadState::NetworkIdle, self.settings.network_idle_timeout)
            .await
        {
            Ok(()) => {}
            Err(PageError::Timeout(reason)) => {
                warn!(%reason, "Network did not go idle, continuing");
            }
            Err(err) => return Err(err.into()),
        }
        page.wait_for_timeout(self.settings.settle_delay).await?;
        Ok(())
    }

    /// Job detail text for the record; a failed lookup leaves the placeholder
    async fn read_detail(
        &self,
        page: &dyn PagePort,
        rule: &'static LocatorRule,
    ) -> Option<String> {
        match self.locator.locate_rule(page, rule).await {
            Ok(located) => located
                .map(|located| located.text().to_string())
                .filter(|text| !text.is_empty()),
            Err(err) => {
                warn!(rule = rule.name, error = %err, "Could not read job detail");
                None
            }
        }
    }
}
