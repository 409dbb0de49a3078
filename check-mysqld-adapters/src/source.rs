//! The metric source abstraction.

use std::fmt::Debug;

use async_trait::async_trait;

use check_mysqld_types::Sample;

use crate::{AdapterError, StatusReport};

/// Trait for reading status counters from a live (or captured) system.
///
/// Implementations only need to produce the full status report; picking a
/// single counter out of it is shared.
///
/// # Example
///
/// ```
/// use check_mysqld_adapters::{MetricSource, SnapshotSource};
///
/// let source = SnapshotSource::new("status.json");
/// assert_eq!(source.description(), "snapshot: status.json");
/// ```
#[async_trait]
pub trait MetricSource: Send + Sync + Debug {
    /// Fetch the complete status report.
    ///
    /// Any connection opened for this call is released before it returns.
    async fn status_report(&self) -> Result<StatusReport, AdapterError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> String;

    /// Fetch the current sample of a single status variable.
    async fn fetch_sample(&self, variable: &str) -> Result<Sample, AdapterError> {
        let report = self.status_report().await?;
        tracing::debug!(
            rows = report.rows.len(),
            observed_at = report.observed_at,
            "received status report"
        );
        report.sample(variable)
    }
}
