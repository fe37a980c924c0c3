//! Full-snapshot JSON persistence shared by the progress and results stores.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::StoreError;

/// Sibling temp path used while writing `path`: `<file name>.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("snapshot"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// Writes a temp file in the same directory, fsyncs it, then renames it over
/// the target. Rename within one directory is atomic on the filesystems we
/// run on, so readers never observe a torn file.
pub(crate) fn write_snapshot<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let temp_path = temp_path_for(path);
    {
        let mut file = std::fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(content.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }
    std::fs::rename(&temp_path, path).map_err(io_err)?;
    Ok(())
}

/// Read a snapshot written by [`write_snapshot`].
///
/// Returns `None` when the file is absent, unreadable or does not parse;
/// the latter two are logged as warnings. `what` names the file in logs.
pub(crate) fn read_snapshot<T>(path: &Path, what: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no {what} file found, starting fresh");
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "could not read {what} file, starting fresh"
            );
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "{what} file is corrupt, starting fresh"
            );
            None
        }
    }
}
