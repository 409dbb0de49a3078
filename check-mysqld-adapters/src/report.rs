//! Status reports and counter lookup.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use check_mysqld_types::Sample;

use crate::AdapterError;

/// One row of the server's status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    #[serde(alias = "Variable_name")]
    pub name: String,
    #[serde(alias = "Value")]
    pub value: String,
}

impl StatusRow {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// All rows of a status report and when they were observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Unix timestamp in seconds taken when the report was received.
    pub observed_at: i64,
    pub rows: Vec<StatusRow>,
}

impl StatusReport {
    /// Create a report observed at a specific timestamp.
    pub fn new(observed_at: i64, rows: Vec<StatusRow>) -> Self {
        Self { observed_at, rows }
    }

    /// Create a report observed now.
    pub fn observed_now(rows: Vec<StatusRow>) -> Self {
        Self::new(unix_now(), rows)
    }

    /// Find the row named exactly `variable`.
    ///
    /// Matching is case-sensitive and never matches on a prefix.
    pub fn find(&self, variable: &str) -> Option<&StatusRow> {
        self.rows.iter().find(|row| row.name == variable)
    }

    /// Build a sample of `variable` from this report.
    pub fn sample(&self, variable: &str) -> Result<Sample, AdapterError> {
        let row = self
            .find(variable)
            .ok_or_else(|| AdapterError::VariableNotFound(variable.to_string()))?;

        let value = row
            .value
            .trim()
            .parse::<u64>()
            .map_err(|_| AdapterError::InvalidValue {
                variable: variable.to_string(),
                value: row.value.clone(),
            })?;

        Ok(Sample::new(self.observed_at, value))
    }
}

/// Current time as whole seconds since the Unix epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> StatusReport {
        StatusReport::new(
            1_700_000_000,
            vec![
                StatusRow::new("Innodb_rows_deleted", "196558"),
                StatusRow::new("Innodb_rows_read", "2031268891"),
                StatusRow::new("Innodb_rows_read_ahead", "7"),
                StatusRow::new("Slave_running", "OFF"),
            ],
        )
    }

    #[test]
    fn test_sample_exact_match() {
        let sample = report().sample("Innodb_rows_read").unwrap();
        assert_eq!(sample, Sample::new(1_700_000_000, 2_031_268_891));
    }

    #[test]
    fn test_no_prefix_match() {
        let err = report().sample("Innodb_rows").unwrap_err();
        assert!(matches!(err, AdapterError::VariableNotFound(ref v) if v == "Innodb_rows"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let err = report().sample("innodb_rows_read").unwrap_err();
        assert!(matches!(err, AdapterError::VariableNotFound(_)));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = report().sample("Slave_running").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidValue { ref value, .. } if value == "OFF"));
    }

    #[test]
    fn test_row_accepts_server_column_names() {
        let row: StatusRow =
            serde_json::from_str(r#"{"Variable_name": "Questions", "Value": "42"}"#).unwrap();
        assert_eq!(row, StatusRow::new("Questions", "42"));
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2023-11-14, well before any machine running these tests
        assert!(unix_now() > 1_700_000_000);
    }
}
