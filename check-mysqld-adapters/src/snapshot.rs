//! File-based metric source.
//!
//! Reads a captured status report from a JSON file instead of a live server:
//!
//! ```json
//! {
//!   "timestamp": 1700000000,
//!   "rows": [
//!     { "name": "Innodb_rows_read", "value": "2031268891" },
//!     { "Variable_name": "Questions", "Value": 4211 }
//!   ]
//! }
//! ```
//!
//! `timestamp` is optional and defaults to the time the file is read. Values
//! may be JSON strings or numbers.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{unix_now, AdapterError, MetricSource, StatusReport, StatusRow};

/// A metric source that reads a status report from a JSON file.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    /// Create a new snapshot source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    fn read_report(&self) -> Result<StatusReport, AdapterError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            AdapterError::Connection(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        parse_report(&content)
    }
}

#[async_trait]
impl MetricSource for SnapshotSource {
    async fn status_report(&self) -> Result<StatusReport, AdapterError> {
        self.read_report()
    }

    fn description(&self) -> String {
        format!("snapshot: {}", self.path.display())
    }
}

/// Parse a captured report.
pub fn parse_report(content: &str) -> Result<StatusReport, AdapterError> {
    let file: SnapshotFile =
        serde_json::from_str(content).map_err(|e| AdapterError::Parse(e.to_string()))?;

    let rows = file
        .rows
        .into_iter()
        .map(|row| {
            let value = match row.value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            StatusRow::new(row.name, value)
        })
        .collect();

    Ok(StatusReport::new(file.timestamp.unwrap_or_else(unix_now), rows))
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    timestamp: Option<i64>,
    rows: Vec<SnapshotRow>,
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(alias = "Variable_name")]
    name: String,
    #[serde(alias = "Value")]
    value: serde_json::Value,
}
