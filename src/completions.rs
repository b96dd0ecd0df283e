//! Completion log — the flat-file record of finished attempts.
//!
//! One CSV file, append-only, one row per finished attempt:
//!
//! ```text
//! timestamp_utc,name,email,score
//! 2026-08-23 14:02:11,Ada,a@x.com,5
//! ```
//!
//! Timestamps are UTC, formatted `YYYY-MM-DD HH:MM:SS`. The `csv` crate
//! handles quoting, so names and emails containing commas survive intact.
//!
//! ## Degradation
//!
//! The log is best-effort history, never a gate on the learner's flow. If
//! the existing file is unreadable or its header does not match, the next
//! append starts a fresh log instead of failing the attempt — the same
//! treat-corrupt-as-absent policy as a broken cache sidecar. Reading a
//! corrupt log yields the rows that still parse.
//!
//! There is no file locking; simultaneous writers could interleave rows.
//! Classroom-scale usage makes that acceptable.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column header of the completion log.
pub const LOG_HEADER: [&str; 4] = ["timestamp_utc", "name", "email", "score"];

/// Timestamp format used in the log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub timestamp_utc: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub score: u32,
}

impl CompletionRecord {
    /// Build a record stamped with the current time.
    pub fn now(name: &str, email: &str, score: u32) -> Self {
        Self {
            timestamp_utc: Utc::now(),
            name: name.to_string(),
            email: email.to_string(),
            score,
        }
    }

    fn to_row(&self) -> [String; 4] {
        [
            self.timestamp_utc.format(TIMESTAMP_FORMAT).to_string(),
            self.name.clone(),
            self.email.clone(),
            self.score.to_string(),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Option<Self> {
        if row.len() != 4 {
            return None;
        }
        let timestamp = NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT)
            .ok()?
            .and_utc();
        Some(Self {
            timestamp_utc: timestamp,
            name: row[1].to_string(),
            email: row[2].to_string(),
            score: row[3].parse().ok()?,
        })
    }
}

/// Handle to the append-only completion log file.
#[derive(Debug, Clone)]
pub struct CompletionLog {
    path: PathBuf,
}

impl CompletionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file (with header) on first use.
    ///
    /// An unreadable file or a wrong header means the log is not ours to
    /// extend: it is rewritten from scratch with the header and this record.
    pub fn append(&self, record: &CompletionRecord) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if self.has_valid_header() {
            let file = OpenOptions::new().append(true).open(&self.path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(record.to_row())?;
            writer.flush()?;
        } else {
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(LOG_HEADER)?;
            writer.write_record(record.to_row())?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Read all records that still parse. A missing or unreadable file is an
    /// empty log; malformed rows are skipped.
    pub fn read_all(&self) -> Vec<CompletionRecord> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        reader
            .records()
            .filter_map(|row| row.ok())
            .filter_map(|row| CompletionRecord::from_row(&row))
            .collect()
    }

    /// The raw CSV content, regenerated from the parsed records — this is
    /// what the `log` command emits for download/export.
    pub fn to_csv_string(&self) -> Result<String, LogError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(LOG_HEADER)?;
        for record in self.read_all() {
            writer.write_record(record.to_row())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| LogError::Io(std::io::Error::other(e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// First line matches the expected header exactly.
    fn has_valid_header(&self) -> bool {
        let Ok(file) = fs::File::open(&self.path) else {
            return false;
        };
        let mut first_line = String::new();
        if BufReader::new(file).read_line(&mut first_line).is_err() {
            return false;
        }
        first_line.trim_end() == LOG_HEADER.join(",")
    }
}
