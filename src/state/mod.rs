//! Persistence of the previous sample between invocations.
//!
//! Each check identity owns exactly one record holding its latest sample.
//! The record is read at the start of a run and replaced once a new sample
//! has been fetched; nothing older is kept.

mod file;

pub use file::{format_record, parse_record, StateFile};

use std::fmt::Debug;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use check_mysqld_types::Sample;

/// Failure to persist the current sample.
#[derive(Debug, Error)]
#[error("cannot write state file {}: {source}", .path.display())]
pub struct StoreError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Trait for the single-record store of the previous sample.
///
/// Implementations backed by blocking I/O must move that work off the async
/// runtime (e.g. `spawn_blocking`), so that a run deadline can still fire
/// while the filesystem hangs.
///
/// # Example
///
/// ```
/// use check_mysqld::state::{StateFile, StateStore};
/// use check_mysqld_types::Sample;
///
/// # tokio_test::block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let store = StateFile::new(dir.path().join("state.log"));
///
/// assert!(store.read_previous().await.is_none());
/// store.write_current(&Sample::new(1_700_000_000, 42)).await.unwrap();
/// assert_eq!(store.read_previous().await, Some(Sample::new(1_700_000_000, 42)));
/// # });
/// ```
#[async_trait]
pub trait StateStore: Send + Sync + Debug {
    /// Read the previously persisted sample.
    ///
    /// Returns `None` when there is no usable record: on the first run, and
    /// also when the record is unreadable or malformed, so that a damaged
    /// record is replaced by the next successful run instead of blocking
    /// every check after it.
    async fn read_previous(&self) -> Option<Sample>;

    /// Replace the persisted record with `sample`.
    ///
    /// Readers see either the old record or the new one, never a mix.
    async fn write_current(&self, sample: &Sample) -> Result<(), StoreError>;

    /// Returns a human-readable description of where the record lives.
    fn description(&self) -> String;
}
