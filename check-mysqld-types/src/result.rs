//! CheckResult - the terminal output of one invocation.

use std::fmt;

use crate::{Status, SERVICE_NAME};

/// Performance data attached to a result, rendered as `label=value`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfData {
    /// Label, normally the status variable name.
    pub label: String,

    /// Per-second rate.
    pub value: f64,
}

impl PerfData {
    /// Create perf data for a label and value.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:.3}", self.label, self.value)
    }
}

/// Result of a single check run.
///
/// Displays as the one line the monitoring supervisor reads:
///
/// ```text
/// MYSQL OK - status variable: Innodb_rows_read 12.500 per second | Innodb_rows_read=12.500
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckResult {
    /// Status category, mapped to the exit code.
    pub status: Status,

    /// Monitored status variable.
    pub variable: String,

    /// Human-readable message.
    pub message: String,

    /// Optional perf data suffix.
    pub perf_data: Option<PerfData>,
}

impl CheckResult {
    /// Create a result without perf data.
    pub fn new(status: Status, variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            variable: variable.into(),
            message: message.into(),
            perf_data: None,
        }
    }

    /// Attach perf data.
    pub fn with_perf_data(mut self, perf_data: PerfData) -> Self {
        self.perf_data = Some(perf_data);
        self
    }

    /// Raise the status to at least `status` and append a note to the message.
    pub fn escalate(mut self, status: Status, note: impl AsRef<str>) -> Self {
        self.status = self.status.worst(status);
        self.message = format!("{} ({})", self.message, note.as_ref());
        self
    }

    /// Process exit code for this result.
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A status line is a single line no matter what the message contains
        let message = self.message.replace(['\n', '\r'], " ").replace('|', "/");
        write!(f, "{} {} - status variable: ", SERVICE_NAME, self.status)?;
        if self.variable.is_empty() {
            write!(f, "{}", message)?;
        } else {
            write!(f, "{} {}", self.variable, message)?;
        }
        if let Some(perf) = &self.perf_data {
            write!(f, " | {}", perf)?;
        }
        Ok(())
    }
}
