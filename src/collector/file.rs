//! Replays a process listing captured to disk.
//!
//! Useful for regression tests with real `ps auxww` output and for running
//! the monitor against a listing taken on another host.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::traits::{AcquireError, Snapshot, SnapshotSource};

/// Snapshot source backed by a text file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for SnapshotFile {
    fn fetch(&self) -> Result<Snapshot, AcquireError> {
        let content = std::fs::read_to_string(&self.path)?;
        let snapshot = Snapshot::from_output(&content);
        debug!(path = %self.path.display(), rows = snapshot.len(), "loaded captured listing");
        Ok(snapshot)
    }
}
