//! The accumulated output array of per-business results.

use std::path::{Path, PathBuf};

use revscan_core::BusinessResult;

use crate::snapshot::{read_snapshot, write_snapshot};
use crate::StoreError;

/// In-memory copy of the results file, saved as a full snapshot.
#[derive(Debug)]
pub struct ResultsStore {
    path: PathBuf,
    results: Vec<BusinessResult>,
}

impl ResultsStore {
    /// Load existing results from `path`. Missing or corrupt files start empty.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let results = read_snapshot::<Vec<BusinessResult>>(path, "results").unwrap_or_default();
        if !results.is_empty() {
            tracing::info!(count = results.len(), "loaded existing results");
        }
        Self {
            path: path.to_path_buf(),
            results,
        }
    }

    /// The stored result whose name matches case-insensitively, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BusinessResult> {
        self.results.iter().find(|r| r.matches_name(name))
    }

    /// Whether a result for `name` exists and was found on the directory.
    #[must_use]
    pub fn is_found(&self, name: &str) -> bool {
        self.get(name).is_some_and(|r| r.found)
    }

    /// Replace the result with the same name, or append when none exists.
    pub fn merge(&mut self, result: BusinessResult) {
        if let Some(existing) = self.results.iter_mut().find(|r| r.matches_name(&result.name)) {
            *existing = result;
        } else {
            self.results.push(result);
        }
    }

    /// Persist the full results array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        write_snapshot(&self.path, &self.results)
    }

    #[must_use]
    pub fn results(&self) -> &[BusinessResult] {
        &self.results
    }

    #[must_use]
    pub fn found_count(&self) -> usize {
        self.results.iter().filter(|r| r.found).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
