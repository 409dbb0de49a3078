//! Rate computation and value parsing.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "10s", "500ms")
//! - [`rate`]: Per-second rate between two samples and the counter-decrease policy
//!
//! ## Data Flow
//!
//! ```text
//! previous Sample (state file) ──┐
//!                                ├──▶ RolloverPolicy::rate() ──▶ Rate | RateError
//! current Sample (status query) ─┘
//! ```

pub mod duration;
pub mod rate;

pub use rate::{compute_rate, Rate, RateError, RolloverPolicy};
