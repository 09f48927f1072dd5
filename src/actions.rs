//! Agent actions
//!
//! Operations an external agent runtime may call. Every action returns an
//! [`ActionResult`]; errors are reported in it and never escape, so one bad
//! page cannot stop the agent loop.

use std::sync::Arc;

use action_flow::{ApplicationDriver, Detection, HandleSlot, QuickApplyDetector};
use action_primitives::{LoadState, PageError, PagePort};
use jobpilot_core_types::{ApplicationStatus, JobPosting, JobRecord};
use jobpilot_outcome_store::{CsvOutcomeStore, OutcomeRecorder};
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::answers::AnswerBook;
use crate::config::AppConfig;
use crate::cv::CvDocument;
use crate::login::wait_for_manual_login;

const FILE_INPUT_SELECTOR: &str = "input[type=file]";

/// Outcome of one action as seen by the agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Keep the content in the agent's long-term context
    #[serde(default)]
    pub include_in_memory: bool,
}

impl ActionResult {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            extracted_content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn memory(content: impl Into<String>) -> Self {
        Self {
            extracted_content: Some(content.into()),
            include_in_memory: true,
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn content(&self) -> &str {
        self.extracted_content.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadCvParams {
    /// Position of the file input among the page's file inputs, starting at 0
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnswerQuestionParams {
    /// Form question as displayed
    pub question: String,
}

/// Catalog entry describing one action
#[derive(Debug, Clone, Serialize)]
pub struct ActionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub requires_browser: bool,
    pub parameters: RootSchema,
}

/// Every action, with its parameter schema
pub fn catalog() -> Vec<ActionSpec> {
    vec![
        ActionSpec {
            name: "save_job",
            description: "Save a job listing with a score of how well it fits my profile",
            requires_browser: false,
            parameters: schema_for!(JobPosting),
        },
        ActionSpec {
            name: "read_jobs",
            description: "Read every saved job and application outcome",
            requires_browser: false,
            parameters: schema_for!(NoParams),
        },
        ActionSpec {
            name: "read_cv",
            description: "Read my CV for context to fill forms",
            requires_browser: false,
            parameters: schema_for!(NoParams),
        },
        ActionSpec {
            name: "upload_cv",
            description: "Upload my CV to a file input; retry with another index if it fails",
            requires_browser: true,
            parameters: schema_for!(UploadCvParams),
        },
        ActionSpec {
            name: "login",
            description: "Open the login page and wait for me to sign in; do not fill the form",
            requires_browser: true,
            parameters: schema_for!(NoParams),
        },
        ActionSpec {
            name: "browse_jobs",
            description: "Open the recommended job listings",
            requires_browser: true,
            parameters: schema_for!(NoParams),
        },
        ActionSpec {
            name: "check_easy_apply",
            description: "Check whether the open job offers Easy Apply",
            requires_browser: true,
            parameters: schema_for!(NoParams),
        },
        ActionSpec {
            name: "apply_to_job",
            description: "Apply to the open job with Easy Apply and record the outcome",
            requires_browser: true,
            parameters: schema_for!(NoParams),
        },
        ActionSpec {
            name: "answer_question",
            description: "Look up a canned answer for an application form question",
            requires_browser: false,
            parameters: schema_for!(AnswerQuestionParams),
        },
    ]
}

/// Action set for one agent session
pub struct JobActions {
    config: AppConfig,
    store: Arc<dyn OutcomeRecorder>,
    answers: AnswerBook,
    cv: CvDocument,
    detector: QuickApplyDetector,
    driver: ApplicationDriver,
    slot: Mutex<HandleSlot>,
}

impl JobActions {
    pub fn new(config: AppConfig, store: Arc<dyn OutcomeRecorder>) -> Self {
        let answers = AnswerBook::with_overrides(&config.answers);
        let cv = CvDocument::new(&config.cv_path);
        let driver = ApplicationDriver::new(config.apply.driver_settings());
        Self {
            config,
            store,
            answers,
            cv,
            detector: QuickApplyDetector::default(),
            driver,
            slot: Mutex::new(HandleSlot::new()),
        }
    }

    /// Actions backed by the CSV store at `config.store_path`
    pub fn from_config(config: AppConfig) -> Self {
        let store = Arc::new(CsvOutcomeStore::new(&config.store_path));
        Self::new(config, store)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn OutcomeRecorder> {
        &self.store
    }

    pub fn answers(&self) -> &AnswerBook {
        &self.answers
    }

    pub async fn has_cached_handle(&self) -> bool {
        self.slot.lock().await.get().is_some()
    }

    /// Call an action by catalog name with JSON parameters
    pub async fn invoke(
        &self,
        name: &str,
        params: Value,
        page: Option<&dyn PagePort>,
    ) -> ActionResult {
        if !catalog().iter().any(|spec| spec.name == name) {
            return ActionResult::error(format!("Unknown action '{name}'"));
        }

        match (name, page) {
            ("save_job", _) => match serde_json::from_value::<JobPosting>(params) {
                Ok(posting) => self.save_job(posting).await,
                Err(err) => ActionResult::error(format!("Invalid job parameters: {err}")),
            },
            ("read_jobs", _) => self.read_jobs().await,
            ("read_cv", _) => self.read_cv().await,
            ("answer_question", _) => {
                match serde_json::from_value::<AnswerQuestionParams>(params) {
                    Ok(params) => self.answer_question(&params.question),
                    Err(err) => ActionResult::error(format!("Invalid question parameters: {err}")),
                }
            }
            ("upload_cv", Some(page)) => match serde_json::from_value::<UploadCvParams>(params) {
                Ok(params) => self.upload_cv(page, params.index).await,
                Err(err) => ActionResult::error(format!("Invalid upload parameters: {err}")),
            },
            ("login", Some(page)) => self.login(page).await,
            ("browse_jobs", Some(page)) => self.browse_jobs(page).await,
            ("check_easy_apply", Some(page)) => self.check_easy_apply(page).await,
            ("apply_to_job", Some(page)) => self.apply_to_job(page).await,
            _ => ActionResult::error(format!("Action '{name}' requires a browser page")),
        }
    }

    pub async fn save_job(&self, posting: JobPosting) -> ActionResult {
        let record = match posting.into_saved_record() {
            Ok(record) => record,
            Err(err) => return ActionResult::error(format!("Invalid job: {err}")),
        };
        let summary = format!("{} at {}", record.title, record.company);
        match self.store.record(record).await {
            Ok(()) => {
                info!(job = %summary, "Saved job");
                ActionResult::ok(format!("Saved job to file: {summary}"))
            }
            Err(err) => {
                error!(error = %err, "Failed to save job");
                ActionResult::error(format!("Failed to save job: {err}"))
            }
        }
    }

    /// All records, one JSON object per line
    pub async fn read_jobs(&self) -> ActionResult {
        let records = match self.store.list_all().await {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "Failed to read jobs");
                return ActionResult::error(format!("Failed to read jobs: {err}"));
            }
        };
        if records.is_empty() {
            return ActionResult::ok("No jobs saved yet");
        }

        let mut lines = Vec::with_capacity(records.len());
        for record in &records {
            match serde_json::to_string(record) {
                Ok(line) => lines.push(line),
                Err(err) => return ActionResult::error(format!("Failed to render jobs: {err}")),
            }
        }
        ActionResult::ok(lines.join("\n"))
    }

    pub async fn read_cv(&self) -> ActionResult {
        match self.cv.extract_text().await {
            Ok(text) => ActionResult::memory(text),
            Err(err) => {
                warn!(error = %err, "Could not read CV");
                ActionResult::error(err.to_string())
            }
        }
    }

    pub async fn upload_cv(&self, page: &dyn PagePort, index: usize) -> ActionResult {
        let path = match self.cv.absolute_path() {
            Ok(path) => path,
            Err(err) => return ActionResult::error(err.to_string()),
        };
        let inputs = match page.query_selector_all(FILE_INPUT_SELECTOR).await {
            Ok(inputs) => inputs,
            Err(err) => return ActionResult::error(format!("Could not query file inputs: {err}")),
        };
        let Some(input) = inputs.get(index) else {
            info!(index, found = inputs.len(), "No file upload element at index");
            return ActionResult::error(format!("No file upload element found at index {index}"));
        };

        match page.set_input_files(input, &path).await {
            Ok(()) => {
                info!(index, path = %path.display(), "Uploaded CV");
                ActionResult::ok(format!("Successfully uploaded file to index {index}"))
            }
            Err(err) => {
                warn!(index, error = %err, "CV upload failed");
                ActionResult::error(format!("Failed to upload file to index {index}"))
            }
        }
    }

    pub async fn login(&self, page: &dyn PagePort) -> ActionResult {
        match wait_for_manual_login(page, &self.config.login).await {
            Ok(url) => ActionResult::ok(format!("Login confirmed at {url}")),
            Err(err) => {
                warn!(error = %err, "Manual login not completed");
                ActionResult::error(err.to_string())
            }
        }
    }

    pub async fn browse_jobs(&self, page: &dyn PagePort) -> ActionResult {
        let url = &self.config.jobs_url;
        if let Err(err) = page.goto(url).await {
            return ActionResult::error(format!("Could not open job listings: {err}"));
        }
        let timeout = self.config.apply.driver_settings().network_idle_timeout;
        match page.wait_for_load_state(LoadState::Load, timeout).await {
            Ok(()) => {}
            Err(PageError::Timeout(reason)) => warn!(%reason, "Job listings still loading"),
            Err(err) => return ActionResult::error(format!("Could not open job listings: {err}")),
        }
        ActionResult::ok(format!("Opened job listings at {url}"))
    }

    pub async fn check_easy_apply(&self, page: &dyn PagePort) -> ActionResult {
        let mut slot = self.slot.lock().await;
        match self.detector.detect_into(page, &mut slot).await {
            Ok(true) => ActionResult::ok("Easy Apply is available for this job"),
            Ok(false) => ActionResult::ok("Easy Apply is not available for this job"),
            Err(err) => {
                ActionResult::error(format!("Could not check for Easy Apply: {}", err.detail()))
            }
        }
    }

    /// Apply to the job open in `page` and record exactly one outcome.
    ///
    /// A link that already has an `Applied` record is skipped when
    /// `apply.skip_already_applied` is set.
    pub async fn apply_to_job(&self, page: &dyn PagePort) -> ActionResult {
        let url = match page.current_url().await {
            Ok(url) => url,
            Err(err) => return ActionResult::error(format!("Could not read the job URL: {err}")),
        };

        if self.config.apply.skip_already_applied {
            match self.store.has_applied(&url).await {
                Ok(true) => {
                    info!(%url, "Already applied, skipping");
                    return ActionResult::ok(format!("Already applied to {url}, skipping"));
                }
                Ok(false) => {}
                Err(err) => {
                    error!(error = %err, "Could not check previous applications");
                    return ActionResult::error(format!("Could not read saved jobs: {err}"));
                }
            }
        }

        let cached = self.slot.lock().await.take_detection(&url);
        let handle = match cached {
            Some(Detection::Found(handle)) => Some(handle),
            Some(Detection::Absent { .. }) => {
                info!(%url, "Easy Apply was not offered when checked, not applying");
                None
            }
            None => match self.detector.detect(page).await {
                Ok(handle) => handle,
                Err(err) => {
                    let status = ApplicationStatus::failed_error(err.detail());
                    return self
                        .record_failure(JobRecord::outcome(None, None, url, status))
                        .await;
                }
            },
        };

        match self.driver.run(page, handle, self.store.as_ref()).await {
            Ok(report) if report.applied() => ActionResult::ok(format!(
                "Applied to {} at {}",
                report.record.title, report.record.company
            )),
            Ok(report) => ActionResult::error(format!(
                "Application to {} at {} not completed: {}",
                report.record.title, report.record.company, report.record.status
            )),
            Err(err) => {
                error!(error = %err, "Application outcome was not recorded");
                ActionResult::error(format!("Failed to record application outcome: {err}"))
            }
        }
    }

    pub fn answer_question(&self, question: &str) -> ActionResult {
        match self.answers.lookup(question) {
            Some(answer) => ActionResult::ok(answer.answer),
            None => ActionResult::error("No canned answer; answer from the CV instead"),
        }
    }

    async fn record_failure(&self, record: JobRecord) -> ActionResult {
        let status = record.status.to_string();
        match self.store.record(record).await {
            Ok(()) => ActionResult::error(format!("Application not completed: {status}")),
            Err(err) => {
                error!(error = %err, "Application outcome was not recorded");
                ActionResult::error(format!("Failed to record application outcome: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_are_unique() {
        let specs = catalog();
        let mut names: Vec<_> = specs.iter().map(|spec| spec.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), specs.len());
        assert!(specs.iter().any(|s| s.name == "apply_to_job" && s.requires_browser));
    }

    #[test]
    fn test_job_schema_lists_required_fields() {
        let spec = catalog().into_iter().find(|s| s.name == "save_job").unwrap();
        let json = serde_json::to_value(&spec.parameters).unwrap();
        let required = json["required"].as_array().unwrap();
        for field in ["title", "link", "company", "fit_score"] {
            assert!(required.iter().any(|v| v == field), "missing {field}");
        }
    }

    #[test]
    fn test_result_serialization_skips_empty_fields() {
        let json = serde_json::to_value(ActionResult::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "boom", "include_in_memory": false}));
    }
}
