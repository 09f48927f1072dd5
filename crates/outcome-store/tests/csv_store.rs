use std::fs;
use std::sync::Arc;

use jobpilot_core_types::{ApplicationStatus, JobRecord};
use jobpilot_outcome_store::{CsvOutcomeStore, OutcomeRecorder, StoreError, CANONICAL_HEADER};
use tempfile::tempdir;

fn record(n: usize, status: ApplicationStatus) -> JobRecord {
    JobRecord::outcome(
        Some(&format!("Engineer {n}")),
        Some("Acme"),
        format!("https://www.linkedin.com/jobs/view/{n}"),
        status,
    )
}

#[tokio::test]
async fn appends_write_one_header_and_one_row_each() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("jobs.csv");
    let store = CsvOutcomeStore::new(&path);

    for n in 0..5 {
        store.record(record(n, ApplicationStatus::Applied)).await.unwrap();
    }

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], CANONICAL_HEADER.join(","));
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("title,")).count(),
        1
    );
    assert_eq!(store.list_all().await.unwrap().len(), 5);
}

#[tokio::test]
async fn fields_with_separators_round_trip() {
    let dir = tempdir().unwrap();
    let store = CsvOutcomeStore::new(dir.path().join("jobs.csv"));

    let original = JobRecord::new(
        Some("Engineer, \"Platform\""),
        Some("Acme, Inc."),
        "https://www.linkedin.com/jobs/view/7?refId=a,b",
        0.85,
        ApplicationStatus::Saved,
    )
    .with_location(Some("Berlin, DE".into()))
    .with_salary(Some("€70k–€90k".into()));

    store.record(original.clone()).await.unwrap();
    store
        .record(record(8, ApplicationStatus::failed_error("line one\nline two, detached")))
        .await
        .unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], original);
    assert_eq!(all[0].company, "Acme, Inc.");
    assert_eq!(
        all[1].status,
        ApplicationStatus::FailedError {
            message: "line one\nline two, detached".into()
        }
    );
    assert_eq!(all[1].fit_score, 0.4);
}

#[tokio::test]
async fn missing_file_lists_empty() {
    let dir = tempdir().unwrap();
    let store = CsvOutcomeStore::new(dir.path().join("absent.csv"));
    assert!(store.list_all().await.unwrap().is_empty());
    assert!(!store.has_applied("https://x").await.unwrap());
}

#[tokio::test]
async fn legacy_schema_is_rejected_on_read_and_append() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jobs.csv");
    fs::write(
        &path,
        "Title,Company,Link,Salary,Location,Fit Score,Status\nA,B,https://x,,,0.5,Applied\n",
    )
    .unwrap();
    let store = CsvOutcomeStore::new(&path);

    assert!(matches!(
        store.list_all().await,
        Err(StoreError::SchemaMismatch { .. })
    ));
    assert!(matches!(
        store.record(record(1, ApplicationStatus::Applied)).await,
        Err(StoreError::SchemaMismatch { .. })
    ));
    // nothing was appended
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn unterminated_last_row_is_closed_before_appending() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jobs.csv");
    fs::write(
        &path,
        format!(
            "{}\nEngineer 1,Acme,https://www.linkedin.com/jobs/view/1,1.0,,,Applied",
            CANONICAL_HEADER.join(",")
        ),
    )
    .unwrap();
    let store = CsvOutcomeStore::new(&path);

    store
        .record(record(2, ApplicationStatus::FailedMultiStep))
        .await
        .unwrap();

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].link, "https://www.linkedin.com/jobs/view/1");
    assert_eq!(records[0].status, ApplicationStatus::Applied);
    assert_eq!(records[1], record(2, ApplicationStatus::FailedMultiStep));
    assert!(fs::read_to_string(&path).unwrap().ends_with('\n'));
}

#[tokio::test]
async fn concurrent_appends_keep_rows_intact() {
    let dir = tempdir().unwrap();
    let store = Arc::new(CsvOutcomeStore::new(dir.path().join("jobs.csv")));
    // seed the header so racing writers only append rows
    store.record(record(0, ApplicationStatus::Saved)).await.unwrap();

    let mut handles = Vec::new();
    for n in 1..=16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.record(record(n, ApplicationStatus::Applied)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 17);
    assert!(all.iter().all(|r| r.company == "Acme"));
}
