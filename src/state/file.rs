//! File-based state store.
//!
//! The record is one line, `<timestamp>\t<value>\n`, replaced atomically by
//! writing a sibling temporary file and renaming it over the record. File
//! access runs on the blocking pool.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::task;
use tracing::{debug, warn};

use check_mysqld_types::{CheckIdentity, Sample};

use super::{StateStore, StoreError};

/// A state store keeping the previous sample in a single file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Create a store at an explicit path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store at the default location for `identity`.
    pub fn for_identity(identity: &CheckIdentity) -> Self {
        Self::new(identity.default_state_path())
    }

    /// Returns the path of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for StateFile {
    async fn read_previous(&self) -> Option<Sample> {
        let path = self.path.clone();
        match task::spawn_blocking(move || read_record(&path)).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state read task failed, starting over");
                None
            }
        }
    }

    async fn write_current(&self, sample: &Sample) -> Result<(), StoreError> {
        let path = self.path.clone();
        let record = format_record(sample);
        let written = task::spawn_blocking(move || write_atomically(&path, &record))
            .await
            .unwrap_or_else(|e| Err(io::Error::other(e)));

        written.map_err(|source| StoreError {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), ?sample, "saved sample");
        Ok(())
    }

    fn description(&self) -> String {
        format!("file: {}", self.path.display())
    }
}

fn read_record(path: &Path) -> Option<Sample> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no previous sample");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read state file, starting over");
            return None;
        }
    };

    let sample = parse_record(&content);
    if sample.is_none() {
        debug!(path = %path.display(), "ignoring malformed state record");
    }
    sample
}

fn write_atomically(path: &Path, record: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(record.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Encode a sample as a state record.
pub fn format_record(sample: &Sample) -> String {
    format!("{}\t{}\n", sample.timestamp, sample.value)
}

/// Decode a state record.
///
/// Accepts exactly one line of two tab-separated integer fields, with or
/// without a trailing newline. Anything else yields `None`.
pub fn parse_record(content: &str) -> Option<Sample> {
    let line = content
        .strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(content);

    if line.contains('\n') {
        return None;
    }

    let mut fields = line.split('\t');
    let timestamp = fields.next()?.trim().parse::<i64>().ok()?;
    let value = fields.next()?.trim().parse::<u64>().ok()?;
    if fields.next().is_some() {
        return None;
    }

    Some(Sample::new(timestamp, value))
}
