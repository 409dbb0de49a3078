//! Error types for metric sources.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when reading a status counter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The server could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connecting or querying took longer than allowed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The status query itself failed.
    #[error("status query failed: {0}")]
    Query(String),

    /// The status report has no row with this name.
    #[error("status variable '{0}' not found")]
    VariableNotFound(String),

    /// The row exists but its value is not a counter.
    #[error("status variable '{variable}' has non-numeric value '{value}'")]
    InvalidValue { variable: String, value: String },

    /// A captured report could not be parsed.
    #[error("failed to parse status report: {0}")]
    Parse(String),
}

impl AdapterError {
    /// Whether the error means the server could not be talked to at all.
    ///
    /// These are the failures that leave no current sample and say nothing
    /// about the counter itself.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            AdapterError::Connection(_)
                | AdapterError::Auth(_)
                | AdapterError::Timeout(_)
                | AdapterError::Query(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failures() {
        assert!(AdapterError::Connection("refused".into()).is_connection_failure());
        assert!(AdapterError::Auth("denied".into()).is_connection_failure());
        assert!(AdapterError::Timeout(Duration::from_secs(1)).is_connection_failure());
        assert!(AdapterError::Query("no privilege".into()).is_connection_failure());
        assert!(!AdapterError::VariableNotFound("x".into()).is_connection_failure());
        assert!(!AdapterError::Parse("eof".into()).is_connection_failure());
    }

    #[test]
    fn test_messages_name_the_variable() {
        let err = AdapterError::VariableNotFound("Nonexistent_Var".into());
        assert_eq!(err.to_string(), "status variable 'Nonexistent_Var' not found");

        let err = AdapterError::InvalidValue {
            variable: "Slave_running".into(),
            value: "OFF".into(),
        };
        assert_eq!(err.to_string(), "status variable 'Slave_running' has non-numeric value 'OFF'");
    }
}
