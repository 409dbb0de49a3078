//! # check-mysqld-adapters
//!
//! Metric sources for the `check_mysqld` probe.
//!
//! A [`MetricSource`] produces a [`StatusReport`]: the `(name, value)` rows of
//! the server's status report together with the moment they were observed.
//! Looking up a single counter in a report is an exact, case-sensitive match.
//!
//! ## Supported Sources
//!
//! - **MySQL** (`mysql` feature, default) - Runs `SHOW STATUS` over the native
//!   protocol via sqlx, with connect and query bounded by a timeout
//! - **Snapshot** - Reads a captured report from a JSON file, for dry runs and
//!   fixtures
//!
//! ## Quick Start (MySQL)
//!
//! ```rust,no_run
//! use check_mysqld_adapters::{mysql::MySqlSource, MetricSource};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = MySqlSource::builder()
//!         .host("localhost")
//!         .credentials("monitor", "secret")
//!         .timeout(Duration::from_secs(5))
//!         .build();
//!
//!     let sample = source.fetch_sample("Innodb_rows_read").await?;
//!     println!("{} at {}", sample.value, sample.timestamp);
//!     Ok(())
//! }
//! ```

pub mod error;
mod report;
pub mod snapshot;
mod source;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use error::AdapterError;
pub use report::{unix_now, StatusReport, StatusRow};
pub use snapshot::SnapshotSource;
pub use source::MetricSource;

// Re-export types for convenience
pub use check_mysqld_types::Sample;
