//! Which input records have already been processed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::snapshot::{read_snapshot, write_snapshot};
use crate::StoreError;

/// Persisted as `{"processed": [int...], "last_index": int}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub processed: BTreeSet<usize>,
    #[serde(default)]
    pub last_index: usize,
}

/// Write-through progress record keyed by input index.
///
/// Every [`ProgressStore::record_processed`] rewrites the whole file before
/// returning, so an interrupt loses at most the record in flight.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    state: ProgressState,
}

impl ProgressStore {
    /// Load progress from `path`. Missing or corrupt files yield empty state.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let state = read_snapshot::<ProgressState>(path, "progress").unwrap_or_default();
        if !state.processed.is_empty() {
            tracing::info!(
                processed = state.processed.len(),
                last_index = state.last_index,
                "resuming from saved progress"
            );
        }
        Self {
            path: path.to_path_buf(),
            state,
        }
    }

    /// Delete the progress file at `path`. Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub fn reset(path: &Path) -> Result<bool, StoreError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    #[must_use]
    pub fn is_processed(&self, index: usize) -> bool {
        self.state.processed.contains(&index)
    }

    /// Mark `index` processed, make it the last index, and persist immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be written. The in-memory
    /// state is updated regardless so a later [`ProgressStore::save`] can retry.
    pub fn record_processed(&mut self, index: usize) -> Result<(), StoreError> {
        self.state.processed.insert(index);
        self.state.last_index = index;
        self.save()
    }

    /// Persist the current state as a full snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        write_snapshot(&self.path, &self.state)
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }
}
