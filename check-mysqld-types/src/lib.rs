//! # check-mysqld-types
//!
//! Core types shared by the `check_mysqld` probe and its metric adapters.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to (de)serialize samples and results
//! - **Supervisor contract in the types**: [`Status`] owns the exit code and the
//!   status token, [`CheckResult`] owns the one-line output format
//!
//! ## Example
//!
//! ```rust
//! use check_mysqld_types::{CheckResult, PerfData, Status};
//!
//! let result = CheckResult::new(Status::Ok, "Innodb_rows_read", "12.500 per second")
//!     .with_perf_data(PerfData::new("Innodb_rows_read", 12.5));
//!
//! assert_eq!(result.status.exit_code(), 0);
//! assert_eq!(
//!     result.to_string(),
//!     "MYSQL OK - status variable: Innodb_rows_read 12.500 per second | Innodb_rows_read=12.500"
//! );
//! ```

mod identity;
mod result;
mod sample;
mod status;

pub use identity::*;
pub use result::*;
pub use sample::*;
pub use status::*;

/// Service prefix printed at the start of every status line.
pub const SERVICE_NAME: &str = "MYSQL";
