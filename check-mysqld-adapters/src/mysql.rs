//! MySQL source using `SHOW STATUS`.
//!
//! Opens one connection per report, runs the status query, and closes the
//! connection again before returning, whether the query succeeded or not.
//!
//! ## Example
//!
//! ```rust,no_run
//! use check_mysqld_adapters::{mysql::MySqlSource, MetricSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = MySqlSource::builder()
//!         .host("/var/run/mysqld/mysqld.sock")
//!         .credentials("monitor", "secret")
//!         .build();
//!
//!     let report = source.status_report().await?;
//!     for row in &report.rows {
//!         println!("{} = {}", row.name, row.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlRow};
use sqlx::{ConnectOptions, Connection, Executor, Row};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{AdapterError, MetricSource, StatusReport, StatusRow};

/// Query whose rows are `(Variable_name, Value)`.
const STATUS_QUERY: &str = "SHOW STATUS";

/// Upper bound for closing the connection once the rows are in.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// SQLSTATE reported for rejected credentials.
const ACCESS_DENIED: &str = "28000";

/// MySQL source for reading status counters.
#[derive(Debug, Clone)]
pub struct MySqlSource {
    host: String,
    port: u16,
    username: String,
    password: String,
    timeout: Duration,
}

impl MySqlSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> MySqlSourceBuilder {
        MySqlSourceBuilder::default()
    }

    /// Host (or socket path) this source connects to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Timeout applied to connecting and to the query.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Timeout applied to closing the connection, at most two seconds.
    pub fn close_timeout(&self) -> Duration {
        self.timeout.min(CLOSE_TIMEOUT)
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .username(&self.username)
            .password(&self.password);

        if is_socket_path(&self.host) {
            options.socket(&self.host)
        } else {
            options.host(&self.host).port(self.port)
        }
    }
}

#[async_trait]
impl MetricSource for MySqlSource {
    async fn status_report(&self) -> Result<StatusReport, AdapterError> {
        debug!(host = %self.host, port = self.port, "connecting");

        let mut conn = match timeout(self.timeout, self.connect_options().connect()).await {
            Err(_) => return Err(AdapterError::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(connect_error(e)),
            Ok(Ok(conn)) => conn,
        };

        // Text protocol: status statements are not reliably preparable
        let fetched = timeout(
            self.timeout,
            Executor::fetch_all(&mut conn, sqlx::raw_sql(STATUS_QUERY)),
        )
        .await;

        // Release the connection before looking at what the query returned
        match timeout(self.close_timeout(), conn.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "failed to close connection cleanly"),
            Err(_) => warn!("timed out closing connection"),
        }

        let rows = match fetched {
            Err(_) => return Err(AdapterError::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(AdapterError::Query(e.to_string())),
            Ok(Ok(rows)) => rows,
        };

        let rows = rows
            .iter()
            .map(row_to_status)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdapterError::Query(e.to_string()))?;

        Ok(StatusReport::observed_now(rows))
    }

    fn description(&self) -> String {
        if is_socket_path(&self.host) {
            format!("mysql: {}", self.host)
        } else {
            format!("mysql: {}:{}", self.host, self.port)
        }
    }
}

/// Builder for MySqlSource.
#[derive(Debug, Default)]
pub struct MySqlSourceBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
}

impl MySqlSourceBuilder {
    /// Set the host name, or an absolute Unix socket path (default: "localhost").
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the TCP port (default: 3306). Ignored for socket paths.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the username and password for authentication.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the connect and query timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> MySqlSource {
        MySqlSource {
            host: self.host.unwrap_or_else(|| "localhost".to_string()),
            port: self.port.unwrap_or(3306),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(Duration::from_secs(10)),
        }
    }
}

fn is_socket_path(host: &str) -> bool {
    host.starts_with('/')
}

fn connect_error(err: sqlx::Error) -> AdapterError {
    if let Some(db) = err.as_database_error() {
        if db.code().as_deref() == Some(ACCESS_DENIED) {
            return AdapterError::Auth(db.message().to_string());
        }
    }
    AdapterError::Connection(err.to_string())
}

fn row_to_status(row: &MySqlRow) -> Result<StatusRow, sqlx::Error> {
    Ok(StatusRow::new(column_text(row, 0)?, column_text(row, 1)?))
}

// Status columns are VARCHAR on most servers but binary on some builds
fn column_text(row: &MySqlRow, index: usize) -> Result<String, sqlx::Error> {
    match row.try_get::<Option<String>, _>(index) {
        Ok(text) => Ok(text.unwrap_or_default()),
        Err(_) => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map(|bytes| String::from_utf8_lossy(&bytes.unwrap_or_default()).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let source = MySqlSource::builder().build();
        assert_eq!(source.host, "localhost");
        assert_eq!(source.port, 3306);
        assert_eq!(source.username, "");
        assert_eq!(source.password, "");
        assert_eq!(source.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_custom() {
        let source = MySqlSource::builder()
            .host("db.local")
            .port(3307)
            .credentials("monitor", "secret")
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(source.host(), "db.local");
        assert_eq!(source.port, 3307);
        assert_eq!(source.username, "monitor");
        assert_eq!(source.password, "secret");
        assert_eq!(source.timeout(), Duration::from_secs(3));
        assert_eq!(source.description(), "mysql: db.local:3307");
    }

    #[test]
    fn test_socket_host() {
        let source = MySqlSource::builder().host("/var/run/mysqld/mysqld.sock").build();
        assert!(is_socket_path(source.host()));
        assert_eq!(source.description(), "mysql: /var/run/mysqld/mysqld.sock");
    }

    #[test]
    fn test_close_timeout_is_bounded() {
        let slow = MySqlSource::builder().timeout(Duration::from_secs(30)).build();
        assert_eq!(slow.close_timeout(), CLOSE_TIMEOUT);

        let quick = MySqlSource::builder().timeout(Duration::from_millis(500)).build();
        assert_eq!(quick.close_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_status_report_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let source = MySqlSource::builder().build();
        let report = source.status_report();
        assert_send(&report);

        let sample = source.fetch_sample("Questions");
        assert_send(&sample);
    }

    #[test]
    fn test_io_error_is_connection_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = connect_error(sqlx::Error::Io(io));
        assert!(matches!(err, AdapterError::Connection(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_fast() {
        // Port 1 on loopback is closed on any sane test machine
        let source = MySqlSource::builder()
            .host("127.0.0.1")
            .port(1)
            .credentials("monitor", "")
            .timeout(Duration::from_secs(2))
            .build();

        let err = source.status_report().await.unwrap_err();
        assert!(err.is_connection_failure());
    }
}
