use std::path::{Path, PathBuf};
use std::sync::Arc;

use jobpilot::{AppConfig, JobActions};
use jobpilot_outcome_store::{CsvOutcomeStore, OutcomeRecorder};

use super::output::OutputFormat;

pub struct CliContext {
    config: Arc<AppConfig>,
    config_path: PathBuf,
    config_found: bool,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(
        config: AppConfig,
        config_path: PathBuf,
        config_found: bool,
        output: OutputFormat,
    ) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            config_found,
            output,
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether `config_path` existed when the configuration was loaded
    pub fn config_found(&self) -> bool {
        self.config_found
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn store(&self) -> Arc<dyn OutcomeRecorder> {
        Arc::new(CsvOutcomeStore::new(&self.config.store_path))
    }

    pub fn actions(&self) -> JobActions {
        JobActions::new(self.config().clone(), self.store())
    }

    pub fn actions_with(&self, store: Arc<dyn OutcomeRecorder>) -> JobActions {
        JobActions::new(self.config().clone(), store)
    }
}
