//! Sample - one observation of a status counter.

/// A single `(timestamp, value)` observation of a status variable.
///
/// Timestamps are whole seconds since the Unix epoch (UTC). Values are
/// cumulative counters as reported by the server; they are usually
/// non-decreasing but a server restart resets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Unix timestamp in seconds when the value was observed.
    pub timestamp: i64,

    /// Counter value at that moment.
    pub value: u64,
}

impl Sample {
    /// Create a new sample.
    pub const fn new(timestamp: i64, value: u64) -> Self {
        Self { timestamp, value }
    }

    /// Seconds elapsed between `earlier` and this sample.
    ///
    /// Negative when the clock moved backwards between the two observations.
    pub fn seconds_since(&self, earlier: &Sample) -> i64 {
        self.timestamp.saturating_sub(earlier.timestamp)
    }

    /// Signed counter change since `earlier`.
    pub fn delta_since(&self, earlier: &Sample) -> i128 {
        i128::from(self.value) - i128::from(earlier.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas() {
        let earlier = Sample::new(1_700_000_000, 1_000);
        let later = Sample::new(1_700_000_060, 1_600);

        assert_eq!(later.seconds_since(&earlier), 60);
        assert_eq!(later.delta_since(&earlier), 600);
    }

    #[test]
    fn test_delta_handles_counter_reset() {
        let earlier = Sample::new(100, u64::MAX);
        let later = Sample::new(160, 0);

        assert_eq!(later.delta_since(&earlier), -i128::from(u64::MAX));
    }

    #[test]
    fn test_clock_going_backwards() {
        let earlier = Sample::new(200, 1);
        let later = Sample::new(150, 2);

        assert_eq!(later.seconds_since(&earlier), -50);
    }
}
