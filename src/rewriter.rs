//! Persisting rewritten files and handing them to the formatter.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::corpus::{CorpusError, SourceFile};

/// Post-write formatting hook. Failures are logged, never returned.
pub trait SourceFormatter {
    fn format(&self, path: &Path);
}

/// Runs `<compiler> fmt <path>`, discarding its output.
#[derive(Debug, Clone)]
pub struct CompilerFormatter {
    compiler: PathBuf,
}

impl CompilerFormatter {
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
        }
    }
}

impl SourceFormatter for CompilerFormatter {
    fn format(&self, path: &Path) {
        let result = Command::new(&self.compiler)
            .arg("fmt")
            .arg(path)
            .stdin(Stdio::null())
            .output();

        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => tracing::warn!(
                file = %path.display(),
                status = %output.status,
                "formatter failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => tracing::warn!(file = %path.display(), "failed to run formatter: {e}"),
        }
    }
}

/// Formatter that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFormatter;

impl SourceFormatter for NoFormatter {
    fn format(&self, _path: &Path) {}
}

/// Writes a file's final text back to disk, then formats it.
pub struct FileRewriter<F> {
    formatter: F,
}

impl<F: SourceFormatter> FileRewriter<F> {
    pub fn new(formatter: F) -> Self {
        Self { formatter }
    }

    /// Overwrite `file` on disk. The formatter only runs after a successful write.
    pub fn rewrite(&self, file: &SourceFile) -> Result<(), CorpusError> {
        file.persist()?;
        tracing::info!(file = %file.path.display(), "rewrote");
        self.formatter.format(&file.path);
        Ok(())
    }
}
