//! Append-only CSV backing store
//!
//! Rows are never rewritten. The header is written by whichever append finds
//! the file empty; two processes creating the file at the same instant may both
//! write it (known limitation, no cross-process locking).

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jobpilot_core_types::JobRecord;
use tokio::task;
use tracing::{debug, error, info, warn};

use crate::api::{OutcomeRecorder, StoreResult};
use crate::errors::StoreError;
use crate::model::{JobRow, CANONICAL_HEADER};

#[derive(Debug, Clone)]
pub struct CsvOutcomeStore {
    path: PathBuf,
}

impl CsvOutcomeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file with a header if it is empty
    pub fn append_blocking(&self, record: &JobRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| StoreError::io(&self.path, err))?;
        let len = file
            .metadata()
            .map_err(|err| StoreError::io(&self.path, err))?
            .len();
        let needs_header = len == 0;
        if !needs_header {
            self.verify_header()?;
        }

        let mut buffer = Vec::new();
        if !needs_header && !self.ends_with_newline()? {
            warn!(path = %self.path.display(), "Last row is unterminated, closing it");
            buffer.push(b'\n');
        }
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut buffer);
            if needs_header {
                writer.write_record(CANONICAL_HEADER)?;
            }
            writer.serialize(JobRow::from(record))?;
            writer
                .flush()
                .map_err(|err| StoreError::io(&self.path, err))?;
        }

        // One write per append so concurrent appenders never interleave a row.
        file.write_all(&buffer)
            .and_then(|_| file.flush())
            .map_err(|err| StoreError::io(&self.path, err))?;

        if needs_header {
            info!(path = %self.path.display(), "Created outcome store");
        }
        debug!(link = %record.link, status = %record.status, "Appended job record");
        Ok(())
    }

    fn ends_with_newline(&self) -> StoreResult<bool> {
        let mut file = File::open(&self.path).map_err(|err| StoreError::io(&self.path, err))?;
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|err| StoreError::io(&self.path, err))?;
        Ok(last[0] == b'\n')
    }

    /// Re-parse the whole file; a missing file reads as empty
    pub fn read_all_blocking(&self) -> StoreResult<Vec<JobRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        check_header(&self.path, headers.iter())?;

        let mut records = Vec::new();
        for row in reader.deserialize::<JobRow>() {
            let row = row?;
            // header occupies line 1
            let line = records.len() as u64 + 2;
            records.push(row.into_record(line)?);
        }
        Ok(records)
    }

    fn verify_header(&self) -> StoreResult<()> {
        let file = File::open(&self.path).map_err(|err| StoreError::io(&self.path, err))?;
        let mut first = String::new();
        BufReader::new(file)
            .read_line(&mut first)
            .map_err(|err| StoreError::io(&self.path, err))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(first.as_bytes());
        let header = match reader.records().next() {
            Some(record) => record?,
            None => return Ok(()),
        };
        check_header(&self.path, header.iter())
    }
}

fn check_header<'a>(path: &Path, found: impl Iterator<Item = &'a str>) -> StoreResult<()> {
    let found: Vec<&str> = found.map(str::trim).collect();
    if found != CANONICAL_HEADER {
        let err = StoreError::SchemaMismatch {
            path: path.to_path_buf(),
            found: found.join(","),
            expected: CANONICAL_HEADER.join(","),
        };
        error!("{}", err);
        return Err(err);
    }
    Ok(())
}

#[async_trait]
impl OutcomeRecorder for CsvOutcomeStore {
    async fn record(&self, record: JobRecord) -> StoreResult<()> {
        let store = self.clone();
        task::spawn_blocking(move || store.append_blocking(&record))
            .await
            .map_err(|err| StoreError::Internal(format!("append task failed: {err}")))?
    }

    async fn list_all(&self) -> StoreResult<Vec<JobRecord>> {
        let store = self.clone();
        task::spawn_blocking(move || store.read_all_blocking())
            .await
            .map_err(|err| StoreError::Internal(format!("read task failed: {err}")))?
    }
}
