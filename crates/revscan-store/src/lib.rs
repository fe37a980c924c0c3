//! Durable run state: the progress file and the results file.
//!
//! Both are plain JSON documents rewritten as complete snapshots through a
//! temp-file-and-rename, so a process killed mid-write leaves either the old
//! or the new file. Reads are tolerant: a missing or corrupt file loads as
//! fresh state with a warning and never aborts a run.

mod snapshot;

pub mod progress;
pub mod results;

use thiserror::Error;

pub use progress::{ProgressState, ProgressStore};
pub use results::ResultsStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state for {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
