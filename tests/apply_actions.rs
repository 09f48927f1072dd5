use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use action_primitives::{
    ElementHandle, LoadState, PageError, PagePort, Scenario, ScriptedElement, ScriptedPage, Stage,
};
use async_trait::async_trait;
use jobpilot::{AppConfig, JobActions};
use jobpilot_core_types::{ApplicationStatus, JobPosting, JobRecord};
use jobpilot_outcome_store::{CsvOutcomeStore, OutcomeRecorder};
use serde_json::json;
use tempfile::TempDir;

const JOB: &str = "https://www.linkedin.com/jobs/view/3958120456/";

fn setup() -> (TempDir, AppConfig, Arc<CsvOutcomeStore>) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.store_path = dir.path().join("jobs.csv");
    config.cv_path = dir.path().join("cv.txt");
    std::fs::write(&config.cv_path, "Jane Doe\nRust, Tokio, Postgres\n").unwrap();
    let store = Arc::new(CsvOutcomeStore::new(&config.store_path));
    (dir, config, store)
}

fn easy_apply_page(url: &str) -> ScriptedPage {
    let scenario = Scenario::new(url)
        .stage(
            Stage::new("posting")
                .element(ScriptedElement::new("title", "h1").text("Backend Engineer"))
                .element(
                    ScriptedElement::new("company", "a")
                        .text("Ferrous Systems")
                        .attr("class", "job-details-jobs-unified-top-card__company-name"),
                )
                .element(
                    ScriptedElement::button("apply", "Easy Apply")
                        .attr("class", "jobs-apply-button")
                        .goes_to("dialog"),
                ),
        )
        .stage(
            Stage::new("dialog")
                .element(ScriptedElement::new("resume", "input").attr("type", "file"))
                .element(
                    ScriptedElement::button("review", "Review")
                        .attr("data-easy-apply-review-button", "")
                        .goes_to("review"),
                ),
        )
        .stage(
            Stage::new("review").element(
                ScriptedElement::button("submit", "Submit application").goes_to("sent"),
            ),
        )
        .stage(
            Stage::new("sent").element(
                ScriptedElement::new("done", "h3").text("Your application was sent!"),
            ),
        );
    ScriptedPage::new(scenario).unwrap()
}

fn external_page(url: &str) -> ScriptedPage {
    let scenario = Scenario::new(url).stage(
        Stage::new("posting")
            .element(ScriptedElement::new("title", "h1").text("Data Engineer"))
            .element(ScriptedElement::button("external", "Apply on company website")),
    );
    ScriptedPage::new(scenario).unwrap()
}

#[tokio::test]
async fn applies_once_and_skips_the_second_time() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());
    let page = easy_apply_page(JOB);

    let detection = actions.check_easy_apply(&page).await;
    assert!(!detection.is_error());
    assert!(detection.content().contains("available"));
    assert!(actions.has_cached_handle().await);

    let result = actions.apply_to_job(&page).await;
    assert!(!result.is_error(), "{result:?}");
    assert_eq!(result.content(), "Applied to Backend Engineer at Ferrous Systems");
    assert_eq!(page.clicks(), vec!["apply", "review", "submit"]);
    assert!(!actions.has_cached_handle().await);

    let expected = JobRecord::outcome(
        Some("Backend Engineer"),
        Some("Ferrous Systems"),
        JOB,
        ApplicationStatus::Applied,
    );
    assert_eq!(store.list_all().await.unwrap(), vec![expected]);

    let again = actions.apply_to_job(&page).await;
    assert!(again.content().starts_with("Already applied"));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_easy_apply_is_recorded_as_soft_failure() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());
    let page = external_page(JOB);

    let detection = actions.check_easy_apply(&page).await;
    assert!(!detection.is_error());
    assert!(!actions.has_cached_handle().await);

    let result = actions.apply_to_job(&page).await;
    assert!(result.is_error());
    assert!(result.error.unwrap().contains("Failed - No Easy Apply"));
    assert!(page.clicks().is_empty());

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ApplicationStatus::FailedNoEasyApply);
    assert_eq!(records[0].fit_score, 0.5);
    assert_eq!(records[0].title, "Data Engineer");
    assert_eq!(records[0].company, "Unknown Company");
}

#[tokio::test]
async fn handle_is_not_reused_on_another_job() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());
    let first = easy_apply_page(JOB);
    let second = external_page("https://www.linkedin.com/jobs/view/1111/");

    actions.check_easy_apply(&first).await;
    assert!(actions.has_cached_handle().await);

    let result = actions.apply_to_job(&second).await;
    assert!(result.is_error());
    assert!(first.clicks().is_empty());
    assert!(second.clicks().is_empty());
    assert_eq!(
        store.list_all().await.unwrap()[0].status,
        ApplicationStatus::FailedNoEasyApply
    );
}

#[tokio::test]
async fn apply_without_prior_check_detects_afresh() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());
    let page = easy_apply_page(JOB);

    let result = actions.apply_to_job(&page).await;
    assert!(!result.is_error(), "{result:?}");
    assert!(store.has_applied(JOB).await.unwrap());
}

#[tokio::test]
async fn save_and_read_jobs() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());

    let invalid = actions
        .save_job(JobPosting {
            title: "Engineer".into(),
            link: "https://jobs.example/1".into(),
            company: "Acme".into(),
            fit_score: 1.5,
            location: None,
            salary: None,
        })
        .await;
    assert!(invalid.is_error());
    assert_eq!(actions.read_jobs().await.content(), "No jobs saved yet");

    let saved = actions
        .invoke(
            "save_job",
            json!({
                "title": "Engineer",
                "link": "https://jobs.example/1",
                "company": "Acme, Inc.",
                "fit_score": 0.9,
                "location": "Remote"
            }),
            None,
        )
        .await;
    assert_eq!(saved.content(), "Saved job to file: Engineer at Acme, Inc.");

    let listing = actions.read_jobs().await;
    let rows: Vec<serde_json::Value> = listing
        .content()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["company"], "Acme, Inc.");
    assert_eq!(rows[0]["status"], "Saved");
    assert_eq!(rows[0]["location"], "Remote");
}

#[tokio::test]
async fn cv_actions() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store);
    let page = easy_apply_page(JOB);

    let cv = actions.read_cv().await;
    assert!(cv.include_in_memory);
    assert!(cv.content().contains("Rust, Tokio"));

    // the file input only exists once the dialog is open
    assert!(actions.upload_cv(&page, 0).await.is_error());

    let scenario = Scenario::new(JOB).stage(
        Stage::new("form")
            .element(ScriptedElement::new("resume", "input").attr("type", "file"))
            .element(ScriptedElement::new("cover", "input").attr("type", "file")),
    );
    let form = ScriptedPage::new(scenario).unwrap();
    let uploaded = actions
        .invoke("upload_cv", json!({ "index": 1 }), Some(&form))
        .await;
    assert_eq!(uploaded.content(), "Successfully uploaded file to index 1");
    assert_eq!(form.uploads().len(), 1);
    assert_eq!(form.uploads()[0].0, "cover");
    assert!(form.uploads()[0].1.is_absolute());

    let missing = actions.upload_cv(&form, 5).await;
    assert_eq!(
        missing.error.as_deref(),
        Some("No file upload element found at index 5")
    );
}

#[tokio::test]
async fn invoke_guards() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store);

    assert!(actions
        .invoke("hack_the_planet", json!({}), None)
        .await
        .error
        .unwrap()
        .contains("Unknown action"));
    assert!(actions
        .invoke("apply_to_job", json!({}), None)
        .await
        .error
        .unwrap()
        .contains("requires a browser page"));

    let answer = actions
        .invoke(
            "answer_question",
            json!({ "question": "Do you require sponsorship?" }),
            None,
        )
        .await;
    assert_eq!(answer.content(), "No");
}

#[tokio::test]
async fn browse_jobs_opens_the_configured_listing() {
    let (_dir, mut config, store) = setup();
    config.jobs_url = "https://www.linkedin.com/jobs/search/?keywords=rust".into();
    let actions = JobActions::new(config, store);
    let page = external_page(JOB);

    let result = actions.browse_jobs(&page).await;
    assert!(!result.is_error());
    assert_eq!(
        page.navigations(),
        vec!["https://www.linkedin.com/jobs/search/?keywords=rust".to_string()]
    );
}

#[tokio::test]
async fn storage_failure_is_reported_not_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    // a directory cannot be appended to
    config.store_path = dir.path().to_path_buf();
    config.apply.skip_already_applied = false;
    let actions = JobActions::from_config(config);
    let page = external_page(JOB);

    let result = actions.apply_to_job(&page).await;
    assert!(result.is_error());
    assert!(result
        .error
        .unwrap()
        .starts_with("Failed to record application outcome"));
}

/// Posting that renders its Easy Apply button only after `render` is called
struct LateRenderPage {
    before: ScriptedPage,
    after: ScriptedPage,
    rendered: AtomicBool,
}

impl LateRenderPage {
    fn new(url: &str) -> Self {
        Self {
            before: external_page(url),
            after: easy_apply_page(url),
            rendered: AtomicBool::new(false),
        }
    }

    fn render(&self) {
        self.rendered.store(true, Ordering::SeqCst);
    }

    fn current(&self) -> &ScriptedPage {
        if self.rendered.load(Ordering::SeqCst) {
            &self.after
        } else {
            &self.before
        }
    }
}

#[async_trait]
impl PagePort for LateRenderPage {
    async fn current_url(&self) -> Result<String, PageError> {
        self.current().current_url().await
    }

    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.current().goto(url).await
    }

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: Duration,
    ) -> Result<(), PageError> {
        self.current().wait_for_load_state(state, timeout).await
    }

    async fn wait_for_timeout(&self, duration: Duration) -> Result<(), PageError> {
        self.current().wait_for_timeout(duration).await
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        self.current().query_selector(selector).await
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.current().query_selector_all(selector).await
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        self.current().click(element).await
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        self.current().fill(element, text).await
    }

    async fn set_input_files(&self, element: &ElementHandle, path: &Path) -> Result<(), PageError> {
        self.current().set_input_files(element, path).await
    }
}

#[tokio::test]
async fn negative_check_is_not_overridden_by_a_rerender() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());
    let page = LateRenderPage::new(JOB);

    let detection = actions.check_easy_apply(&page).await;
    assert_eq!(detection.content(), "Easy Apply is not available for this job");

    page.render();
    let result = actions.apply_to_job(&page).await;

    assert!(result.error.unwrap().contains("Failed - No Easy Apply"));
    assert!(page.after.clicks().is_empty());
    assert!(page.before.clicks().is_empty());
    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ApplicationStatus::FailedNoEasyApply);
    assert_eq!(records[0].fit_score, 0.5);
}

#[tokio::test]
async fn verdict_for_another_job_triggers_fresh_detection() {
    let (_dir, config, store) = setup();
    let actions = JobActions::new(config, store.clone());
    let listing = external_page("https://www.linkedin.com/jobs/view/1111/");
    let page = easy_apply_page(JOB);

    actions.check_easy_apply(&listing).await;
    let result = actions.apply_to_job(&page).await;

    assert!(!result.is_error(), "{result:?}");
    assert_eq!(page.clicks(), vec!["apply", "review", "submit"]);
}
