//! The check runner.
//!
//! One invocation walks a fixed sequence and produces exactly one result:
//!
//! ```text
//! ReadPrevious ──▶ FetchCurrent ──▶ WriteCurrent ──▶ ComputeRate ──▶ Emit
//!                       │                │                │
//!                       └── fails: Emit  │                └── no rate: Emit (unknown)
//!                                        └── fails: Emit at least warning
//! ```
//!
//! A failed fetch skips the write so the previous baseline survives for the
//! next run. A failed write does not hide the rate of this run but is always
//! reported, since it breaks the baseline of the next one.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use check_mysqld_adapters::{MetricSource, SnapshotSource};
use check_mysqld_types::{CheckIdentity, CheckResult, PerfData, Sample, Status};

use crate::data::{Rate, RateError, RolloverPolicy};
use crate::error::CheckError;
use crate::settings::CheckConfig;
use crate::state::{StateFile, StateStore};

/// Default upper bound for a run when none is configured.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(25);

/// A single rate check against one metric source and one state store.
#[derive(Debug)]
pub struct Check<'a> {
    identity: CheckIdentity,
    source: &'a dyn MetricSource,
    store: &'a dyn StateStore,
    rollover: RolloverPolicy,
    deadline: Duration,
}

impl<'a> Check<'a> {
    /// Create a check with the default rollover policy and deadline.
    pub fn new(
        identity: CheckIdentity,
        source: &'a dyn MetricSource,
        store: &'a dyn StateStore,
    ) -> Self {
        Self {
            identity,
            source,
            store,
            rollover: RolloverPolicy::default(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Set what happens when the counter decreased.
    pub fn rollover(mut self, rollover: RolloverPolicy) -> Self {
        self.rollover = rollover;
        self
    }

    /// Set the upper bound for the whole run.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run the check to completion.
    pub async fn run(&self) -> CheckResult {
        match timeout(self.deadline, self.execute()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(deadline = ?self.deadline, "check exceeded its deadline");
                CheckError::Timeout(self.deadline).into_result(self.variable())
            }
        }
    }

    fn variable(&self) -> &str {
        &self.identity.status_variable
    }

    async fn execute(&self) -> CheckResult {
        debug!(
            variable = self.variable(),
            source = %self.source.description(),
            store = %self.store.description(),
            "starting check"
        );

        let previous = self.store.read_previous().await;

        let current = match self.source.fetch_sample(self.variable()).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "failed to fetch current sample");
                return CheckError::from(e).into_result(self.variable());
            }
        };
        info!(timestamp = current.timestamp, value = current.value, "fetched current sample");

        let saved = self.store.write_current(&current).await;

        let result = match self.compute(previous, &current) {
            Ok(rate) => self.rate_result(&rate),
            Err(e) => {
                info!(reason = %e, "no rate this run");
                CheckError::from(e).into_result(self.variable())
            }
        };

        match saved {
            Ok(()) => result,
            Err(e) => {
                warn!(error = %e, "failed to save current sample");
                let err = CheckError::from(e);
                result.escalate(err.status(), err.to_string())
            }
        }
    }

    fn compute(&self, previous: Option<Sample>, current: &Sample) -> Result<Rate, RateError> {
        let previous = previous.ok_or(RateError::InsufficientData)?;
        self.rollover.rate(&previous, current)
    }

    fn rate_result(&self, rate: &Rate) -> CheckResult {
        let mut message = format!("{} per second", rate);
        if rate.is_decrease() {
            message.push_str(" (counter decreased since previous sample)");
        }
        CheckResult::new(Status::Ok, self.variable(), message)
            .with_perf_data(PerfData::new(self.variable(), rate.per_second))
    }
}

/// Build the source and store described by `config` and run the check.
pub async fn run_configured(config: &CheckConfig) -> CheckResult {
    let store = StateFile::new(&config.state_path);

    if let Some(path) = &config.snapshot {
        let source = SnapshotSource::new(path);
        return run_with(config, &source, &store).await;
    }

    #[cfg(feature = "mysql")]
    {
        let source = check_mysqld_adapters::mysql::MySqlSource::builder()
            .host(&config.identity.host)
            .port(config.port)
            .credentials(&config.user, &config.password)
            .timeout(config.timeout)
            .build();
        run_with(config, &source, &store).await
    }

    #[cfg(not(feature = "mysql"))]
    {
        CheckResult::new(
            Status::Unknown,
            &config.identity.status_variable,
            "built without MySQL support; use --snapshot",
        )
    }
}

async fn run_with(
    config: &CheckConfig,
    source: &dyn MetricSource,
    store: &dyn StateStore,
) -> CheckResult {
    Check::new(config.identity.clone(), source, store)
        .rollover(config.rollover)
        .deadline(config.deadline())
        .run()
        .await
}
