//! Check identity - which counter on which server.

use std::path::{Path, PathBuf};

/// Identifies one rate check: a status variable on a host.
///
/// The identity is the key of the persisted previous sample. Two invocations
/// with the same identity and no explicit state location always address the
/// same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckIdentity {
    /// Name of the status variable, e.g. `Innodb_rows_read`.
    pub status_variable: String,

    /// Host the variable is read from.
    pub host: String,
}

impl CheckIdentity {
    /// Create a new identity.
    pub fn new(status_variable: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            status_variable: status_variable.into(),
            host: host.into(),
        }
    }

    /// File name of the state record for this identity.
    ///
    /// Path separators in either part (a socket path used as the host, for
    /// example) are replaced so the name stays a single path component.
    pub fn state_file_name(&self) -> String {
        format!(
            "check_mysqld_{}_{}.log",
            sanitize(&self.status_variable),
            sanitize(&self.host)
        )
    }

    /// Default location of the state record inside `dir`.
    pub fn state_path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.state_file_name())
    }

    /// Default location of the state record in the system temp directory.
    pub fn default_state_path(&self) -> PathBuf {
        self.state_path_in(&std::env::temp_dir())
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_file_name() {
        let identity = CheckIdentity::new("Innodb_rows_read", "localhost");
        assert_eq!(identity.state_file_name(), "check_mysqld_Innodb_rows_read_localhost.log");
    }

    #[test]
    fn test_socket_host_is_flattened() {
        let identity = CheckIdentity::new("Questions", "/var/run/mysqld/mysqld.sock");
        assert_eq!(
            identity.state_file_name(),
            "check_mysqld_Questions__var_run_mysqld_mysqld.sock.log"
        );
    }

    #[test]
    fn test_state_path_is_deterministic() {
        let a = CheckIdentity::new("Questions", "db1");
        let b = CheckIdentity::new("Questions", "db1");
        assert_eq!(a.default_state_path(), b.default_state_path());
        assert_eq!(
            a.state_path_in(Path::new("/tmp")),
            PathBuf::from("/tmp/check_mysqld_Questions_db1.log")
        );
    }
}
