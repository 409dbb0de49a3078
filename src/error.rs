//! Check failures and their mapping onto supervisor statuses.

use std::time::Duration;

use thiserror::Error;

use check_mysqld_adapters::AdapterError;
use check_mysqld_types::{CheckResult, Status};

use crate::data::duration::format_duration;
use crate::data::RateError;
use crate::state::StoreError;

/// Everything that can stop a check from reporting a plain rate.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A required option was not given on the command line, in the
    /// environment, or in the config file.
    #[error("missing required argument --{0}")]
    MissingArgument(&'static str),

    /// An option was given but could not be used.
    #[error("invalid argument --{name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The settings could not be assembled.
    #[error("invalid configuration: {0}")]
    Settings(#[from] config::ConfigError),

    /// The metric source failed.
    #[error(transparent)]
    Source(#[from] AdapterError),

    /// No rate could be computed from the samples.
    #[error(transparent)]
    Rate(#[from] RateError),

    /// The current sample could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The whole invocation ran past its deadline.
    #[error("check timed out after {}", format_duration(*.0))]
    Timeout(Duration),
}

impl CheckError {
    /// Status reported to the monitoring supervisor for this error.
    pub fn status(&self) -> Status {
        match self {
            CheckError::MissingArgument(_)
            | CheckError::InvalidArgument { .. }
            | CheckError::Settings(_) => Status::Unknown,
            CheckError::Source(e) if e.is_connection_failure() => Status::Critical,
            CheckError::Source(_) => Status::Unknown,
            CheckError::Rate(_) => Status::Unknown,
            CheckError::Store(_) => Status::Warning,
            CheckError::Timeout(_) => Status::Unknown,
        }
    }

    /// Turn the error into the result line for `variable`.
    pub fn into_result(&self, variable: &str) -> CheckResult {
        CheckResult::new(self.status(), variable, self.to_string())
    }
}
