//! Status kinds and the monitoring exit-code contract.

use std::fmt;

/// Outcome category understood by the monitoring supervisor.
///
/// Variants are ordered by severity for the purpose of [`Status::worst`]:
/// `Ok < Warning < Critical < Unknown`. `Dependent` is only ever set
/// explicitly and never wins a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
    Dependent,
}

impl Status {
    /// Process exit code for this status.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
            Status::Dependent => 4,
        }
    }

    /// Token printed in the status line.
    pub const fn token(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
            Status::Dependent => "DEPENDENT",
        }
    }

    fn severity(&self) -> u8 {
        match self {
            Status::Dependent => 0,
            Status::Ok => 1,
            Status::Warning => 2,
            Status::Critical => 3,
            Status::Unknown => 4,
        }
    }

    /// The more severe of two statuses.
    pub fn worst(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Warning.exit_code(), 1);
        assert_eq!(Status::Critical.exit_code(), 2);
        assert_eq!(Status::Unknown.exit_code(), 3);
        assert_eq!(Status::Dependent.exit_code(), 4);
    }

    #[test]
    fn test_worst() {
        assert_eq!(Status::Ok.worst(Status::Warning), Status::Warning);
        assert_eq!(Status::Warning.worst(Status::Ok), Status::Warning);
        assert_eq!(Status::Warning.worst(Status::Unknown), Status::Unknown);
        assert_eq!(Status::Critical.worst(Status::Warning), Status::Critical);
    }

    #[test]
    fn test_display_uses_token() {
        assert_eq!(Status::Critical.to_string(), "CRITICAL");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Status::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
