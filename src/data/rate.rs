//! Per-second rate between two samples of a counter.

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use check_mysqld_types::Sample;

/// A computed per-second rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    /// Counter change per second.
    pub per_second: f64,
    /// Raw counter change between the samples.
    pub delta: i128,
    /// Seconds between the samples (always positive).
    pub elapsed: i64,
}

impl Rate {
    /// Whether the counter went down between the samples.
    pub fn is_decrease(&self) -> bool {
        self.delta < 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.per_second)
    }
}

/// Reasons no rate can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// There is no previous sample to compare against.
    #[error("no previous sample yet, rate available from the next run")]
    InsufficientData,

    /// The samples are not separated by at least one second.
    #[error("insufficient elapsed time since previous sample ({elapsed}s)")]
    InsufficientElapsedTime { elapsed: i64 },

    /// The counter went down and the policy is to start over.
    #[error("counter reset from {previous} to {current}, rate available from the next run")]
    CounterReset { previous: u64, current: u64 },
}

/// Compute `(current.value - previous.value) / (current.timestamp - previous.timestamp)`.
///
/// The counter delta is taken exactly before converting to floating point, so
/// large counters do not lose their low digits.
pub fn compute_rate(previous: &Sample, current: &Sample) -> Result<Rate, RateError> {
    let elapsed = current.seconds_since(previous);
    if elapsed <= 0 {
        return Err(RateError::InsufficientElapsedTime { elapsed });
    }

    let delta = current.delta_since(previous);
    Ok(Rate {
        per_second: delta as f64 / elapsed as f64,
        delta,
        elapsed,
    })
}

/// What to do when the counter is lower than in the previous sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloverPolicy {
    /// Report the negative rate as computed.
    #[default]
    Passthrough,
    /// Report a rate of zero.
    Clamp,
    /// Report no rate; the current sample becomes the new baseline.
    Rebaseline,
}

impl RolloverPolicy {
    /// Name as accepted on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            RolloverPolicy::Passthrough => "passthrough",
            RolloverPolicy::Clamp => "clamp",
            RolloverPolicy::Rebaseline => "rebaseline",
        }
    }

    /// Compute the rate between two samples under this policy.
    pub fn rate(&self, previous: &Sample, current: &Sample) -> Result<Rate, RateError> {
        let rate = compute_rate(previous, current)?;
        if !rate.is_decrease() {
            return Ok(rate);
        }

        match self {
            RolloverPolicy::Passthrough => Ok(rate),
            RolloverPolicy::Clamp => Ok(Rate {
                per_second: 0.0,
                ..rate
            }),
            RolloverPolicy::Rebaseline => Err(RateError::CounterReset {
                previous: previous.value,
                current: current.value,
            }),
        }
    }
}
