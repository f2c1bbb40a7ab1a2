//! Append-only audit log
//!
//! One JSON object per line, each line independently parseable. Entries are
//! never rewritten or compacted.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use jkq_common::{time, Report, Result};
use serde::{Deserialize, Serialize};

/// Immutable record of one applied change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// ISO 8601 UTC timestamp of the change.
    pub at: String,
    /// The full report that caused the change.
    pub report: Report,
    #[serde(rename = "changedCount")]
    pub changed_count: usize,
}

impl AuditEntry {
    pub fn new(report: Report, changed_count: usize) -> Self {
        Self {
            at: time::iso_timestamp(time::now()),
            report,
            changed_count,
        }
    }
}

/// JSONL appender for audit entries.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(entry)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
