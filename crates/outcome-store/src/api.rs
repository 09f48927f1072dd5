use async_trait::async_trait;
use jobpilot_core_types::{ApplicationStatus, JobRecord};
use parking_lot::RwLock;

use crate::errors::StoreError;
use crate::model::same_link;

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable sink for job outcomes.
///
/// No index is kept between calls: `list_all` re-reads the backing store.
#[async_trait]
pub trait OutcomeRecorder: Send + Sync {
    async fn record(&self, record: JobRecord) -> StoreResult<()>;

    async fn list_all(&self) -> StoreResult<Vec<JobRecord>>;

    /// Every record previously written for `link`
    async fn find_by_link(&self, link: &str) -> StoreResult<Vec<JobRecord>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|record| same_link(&record.link, link))
            .collect())
    }

    /// Whether an application to `link` already went through
    async fn has_applied(&self, link: &str) -> StoreResult<bool> {
        Ok(self
            .find_by_link(link)
            .await?
            .iter()
            .any(|record| record.status == ApplicationStatus::Applied))
    }
}

/// Volatile store used for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryOutcomeStore {
    records: RwLock<Vec<JobRecord>>,
}

impl InMemoryOutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl OutcomeRecorder for InMemoryOutcomeStore {
    async fn record(&self, record: JobRecord) -> StoreResult<()> {
        self.records.write().push(record);
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<JobRecord>> {
        Ok(self.records.read().clone())
    }
}
