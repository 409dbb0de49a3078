//! Layered settings for a check invocation.
//!
//! Values are resolved in this order, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional config file (`--config`, format picked by extension)
//! 3. environment variables prefixed `CHECK_MYSQLD_`
//! 4. command-line flags
//!
//! ```toml
//! # /etc/nagios/check_mysqld.toml
//! host = "db1.internal"
//! user = "monitor"
//! password = "secret"
//! timeout = "5s"
//! ```
//!
//! Keeping the password in the file or in `CHECK_MYSQLD_PASSWORD` keeps it off
//! the process list.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use check_mysqld_types::CheckIdentity;

use crate::data::duration::parse_duration;
use crate::data::RolloverPolicy;
use crate::error::CheckError;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CHECK_MYSQLD";

/// Extra time allowed on top of the connect and query budgets before the
/// whole invocation is abandoned.
pub const DEADLINE_GRACE: Duration = Duration::from_secs(5);

/// Raw settings after layering, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub status_variable: Option<String>,
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    pub timeout: String,
    pub rollover: RolloverPolicy,
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub status_variable: Option<String>,
    pub state_file: Option<PathBuf>,
    pub timeout: Option<String>,
    pub rollover: Option<RolloverPolicy>,
    pub snapshot: Option<PathBuf>,
}

/// Validated configuration handed to the check runner.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub identity: CheckIdentity,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub state_path: PathBuf,
    pub timeout: Duration,
    pub rollover: RolloverPolicy,
    pub snapshot: Option<PathBuf>,
}

impl CheckConfig {
    /// Upper bound for the whole invocation: connect and query may each use
    /// the full timeout.
    pub fn deadline(&self) -> Duration {
        self.timeout * 2 + DEADLINE_GRACE
    }
}

impl Settings {
    /// Assemble settings from all layers.
    pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Self, CheckError> {
        Self::load_from(config_file, Environment::with_prefix(ENV_PREFIX), overrides)
    }

    fn load_from(
        config_file: Option<&Path>,
        environment: Environment,
        overrides: &Overrides,
    ) -> Result<Self, CheckError> {
        let mut builder = Config::builder()
            .set_default("host", "localhost")?
            .set_default("port", 3306_i64)?
            .set_default("password", "")?
            .set_default("timeout", "10s")?
            .set_default("rollover", RolloverPolicy::default().as_str())?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(environment)
            .set_override_option("host", overrides.host.clone())?
            .set_override_option("port", overrides.port.map(i64::from))?
            .set_override_option("user", overrides.user.clone())?
            .set_override_option("password", overrides.password.clone())?
            .set_override_option("status_variable", overrides.status_variable.clone())?
            .set_override_option("state_file", path_value(&overrides.state_file))?
            .set_override_option("timeout", overrides.timeout.clone())?
            .set_override_option("rollover", overrides.rollover.map(|r| r.as_str()))?
            .set_override_option("snapshot", path_value(&overrides.snapshot))?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check required values and derive the state location.
    pub fn validate(self) -> Result<CheckConfig, CheckError> {
        let status_variable =
            non_empty(self.status_variable).ok_or(CheckError::MissingArgument("status-variable"))?;
        let host = non_empty(Some(self.host)).ok_or(CheckError::MissingArgument("host"))?;

        // A snapshot replaces the server, so no login is needed for it
        let user = match (non_empty(self.user), &self.snapshot) {
            (Some(user), _) => user,
            (None, Some(_)) => String::new(),
            (None, None) => return Err(CheckError::MissingArgument("user")),
        };

        let timeout = parse_duration(&self.timeout).map_err(|e| CheckError::InvalidArgument {
            name: "timeout",
            reason: e.to_string(),
        })?;

        let identity = CheckIdentity::new(status_variable, host);
        let state_path = self
            .state_file
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| identity.default_state_path());

        Ok(CheckConfig {
            identity,
            port: self.port,
            user,
            password: self.password,
            state_path,
            timeout,
            rollover: self.rollover,
            snapshot: self.snapshot,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn path_value(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::Builder;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn required() -> Overrides {
        Overrides {
            user: Some("monitor".into()),
            status_variable: Some("Innodb_rows_read".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Settings::load_from(None, no_env(), &required())
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(config.identity, CheckIdentity::new("Innodb_rows_read", "localhost"));
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "monitor");
        assert_eq!(config.password, "");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.rollover, RolloverPolicy::Passthrough);
        assert_eq!(
            config.state_path,
            std::env::temp_dir().join("check_mysqld_Innodb_rows_read_localhost.log")
        );
        assert_eq!(config.deadline(), Duration::from_secs(25));
    }

    #[test]
    fn test_missing_user() {
        let overrides = Overrides {
            status_variable: Some("Questions".into()),
            ..Default::default()
        };
        let err = Settings::load_from(None, no_env(), &overrides)
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(matches!(err, CheckError::MissingArgument("user")));
    }

    #[test]
    fn test_missing_status_variable() {
        let overrides = Overrides {
            user: Some("monitor".into()),
            status_variable: Some("  ".into()),
            ..Default::default()
        };
        let err = Settings::load_from(None, no_env(), &overrides)
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(matches!(err, CheckError::MissingArgument("status-variable")));
    }

    #[test]
    fn test_snapshot_needs_no_user() {
        let overrides = Overrides {
            status_variable: Some("Questions".into()),
            snapshot: Some(PathBuf::from("status.json")),
            ..Default::default()
        };
        let config = Settings::load_from(None, no_env(), &overrides)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("status.json")));
    }

    #[test]
    fn test_environment_layer() {
        let settings = Settings::load_from(
            None,
            env(&[("CHECK_MYSQLD_PASSWORD", "from-env"), ("CHECK_MYSQLD_HOST", "db2")]),
            &required(),
        )
        .unwrap();
        assert_eq!(settings.password, "from-env");
        assert_eq!(settings.host, "db2");
    }

    #[test]
    fn test_file_then_env_then_flags() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
host = "db-file"
port = 3307
password = "from-file"
timeout = "3s"
rollover = "clamp"
"#
        )
        .unwrap();

        let overrides = Overrides {
            host: Some("db-flag".into()),
            ..required()
        };
        let config = Settings::load_from(
            Some(file.path()),
            env(&[("CHECK_MYSQLD_PASSWORD", "from-env")]),
            &overrides,
        )
        .unwrap()
        .validate()
        .unwrap();

        assert_eq!(config.identity.host, "db-flag");
        assert_eq!(config.port, 3307);
        assert_eq!(config.password, "from-env");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.rollover, RolloverPolicy::Clamp);
    }

    #[test]
    fn test_explicit_state_file() {
        let overrides = Overrides {
            state_file: Some(PathBuf::from("/var/lib/nagios/rows_read.state")),
            ..required()
        };
        let config = Settings::load_from(None, no_env(), &overrides)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.state_path, PathBuf::from("/var/lib/nagios/rows_read.state"));
    }

    #[test]
    fn test_invalid_timeout() {
        let overrides = Overrides {
            timeout: Some("soon".into()),
            ..required()
        };
        let err = Settings::load_from(None, no_env(), &overrides)
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(matches!(err, CheckError::InvalidArgument { name: "timeout", .. }));
    }
}
