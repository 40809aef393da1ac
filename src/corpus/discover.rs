//! Test file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::CorpusError;

/// Default extension of test files.
pub const DEFAULT_EXTENSION: &str = "zig";

/// Collect the test files under `path`.
///
/// A file path is returned as-is regardless of its extension. A directory is walked recursively and every regular file
/// ending in `.{extension}` is returned, sorted.
///
/// ## Errors
/// - [`CorpusError::NotFound`] if `path` is neither a file nor a directory.
pub fn discover_test_files(path: &Path, extension: &str) -> Result<Vec<PathBuf>, CorpusError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(CorpusError::NotFound(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == extension) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
