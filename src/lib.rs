//! # check_mysqld
//!
//! A monitoring probe reporting the per-second rate of one MySQL status
//! counter.
//!
//! Status counters such as `Innodb_rows_read` only ever grow, so their raw
//! value says little. Each invocation of the probe reads the counter, compares
//! it with the sample saved by the previous invocation, saves the new sample,
//! and prints the rate in the one-line format monitoring supervisors (Nagios,
//! Icinga, Naemon, ...) expect, with the matching exit code.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        check_mysqld                          │
//! │  ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌────────┐  │
//! │  │ settings │───▶│  check   │───▶│   data   │───▶│ stdout │  │
//! │  │ (layers) │    │ (runner) │    │  (rate)  │    │ + exit │  │
//! │  └──────────┘    └────┬─────┘    └──────────┘    └────────┘  │
//! │                       │                                      │
//! │            ┌──────────┴──────────┐                           │
//! │            ▼                     ▼                           │
//! │     ┌─────────────┐       ┌─────────────┐                    │
//! │     │    state    │       │   adapters  │◀── MySQL | snapshot│
//! │     │ (prev file) │       │  (counter)  │                    │
//! │     └─────────────┘       └─────────────┘                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`settings`]**: Defaults, config file, environment and flags merged into a [`CheckConfig`]
//! - **[`state`]**: The single-record store of the previous sample ([`StateStore`] trait)
//! - **[`data`]**: Rate computation and the counter-decrease policy
//! - **[`check`]**: The runner that sequences everything into one [`CheckResult`]
//!
//! ## Usage
//!
//! ### As a monitoring plugin
//!
//! ```bash
//! check_mysqld --host db1 --user monitor --status-variable Innodb_rows_read
//! # MYSQL OK - status variable: Innodb_rows_read 1834.250 per second | Innodb_rows_read=1834.250
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use check_mysqld::{Check, StateFile};
//! use check_mysqld_adapters::SnapshotSource;
//! use check_mysqld_types::CheckIdentity;
//!
//! # tokio_test::block_on(async {
//! let identity = CheckIdentity::new("Questions", "localhost");
//! let source = SnapshotSource::new("status.json");
//! let store = StateFile::for_identity(&identity);
//!
//! let result = Check::new(identity, &source, &store).run().await;
//! println!("{}", result);
//! std::process::exit(result.exit_code());
//! # });
//! ```

pub mod check;
pub mod data;
pub mod error;
pub mod settings;
pub mod state;

// Re-export main types for convenience
pub use check::{run_configured, Check};
pub use check_mysqld_types::{CheckIdentity, CheckResult, PerfData, Sample, Status};
pub use data::{compute_rate, Rate, RateError, RolloverPolicy};
pub use error::CheckError;
pub use settings::{CheckConfig, Overrides, Settings};
pub use state::{StateFile, StateStore, StoreError};
