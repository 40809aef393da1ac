//! The test corpus: source files, their test units, and persistence.
//!
//! A [`SourceFile`] is loaded from disk, normalized and split into [`TestUnit`]s once per run, mutated in memory as
//! results come in, and written back once at the end. Nothing survives between runs except the file itself.
//!
//! ## Selection
//!
//! A unit whose skip line was already present is *outstanding* and always runs. A unit whose skip line was inserted by
//! the normalizer was already passing; it only runs on a re-check, otherwise its provisional marker is simply dropped
//! again on rewrite.

pub mod discover;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use unskip_syntax::{StructuralError, TestUnit, extract_units, normalize, rewrite, split_lines};

use crate::harness::{TestJob, UnitKey};

pub use discover::{DEFAULT_EXTENSION, discover_test_files};

/// Errors for loading and persisting corpus files.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed test file {}: {source}", .path.display())]
    Structural {
        path: PathBuf,
        #[source]
        source: StructuralError,
    },
}

impl CorpusError {
    /// The file system refused the operation, as opposed to the file's contents being unusable.
    pub fn is_io(&self) -> bool {
        matches!(self, CorpusError::Read { .. } | CorpusError::Write { .. })
    }
}

/// A test file and the units derived from it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Normalized lines, each with its terminator
    pub lines: Vec<String>,
    /// Units in declaration order
    pub units: Vec<TestUnit>,
}

impl SourceFile {
    /// Read, normalize and extract `path`.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let text = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(path, &text)
    }

    /// Normalize and extract already-loaded text.
    pub fn from_text(path: &Path, text: &str) -> Result<Self, CorpusError> {
        let lines = normalize(split_lines(text));
        let units = extract_units(&lines).map_err(|source| CorpusError::Structural {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            lines,
            units,
        })
    }

    /// Select every unit, including the ones that already pass.
    pub fn select_all(&mut self) {
        for unit in &mut self.units {
            unit.selected = true;
        }
    }

    /// Number of units that will run.
    pub fn selected_count(&self) -> usize {
        self.units.iter().filter(|u| u.selected).count()
    }

    /// One job per selected unit, all sharing a single snapshot of the file's lines.
    pub fn jobs(&self) -> Vec<TestJob> {
        let snapshot: Arc<[String]> = self.lines.iter().cloned().collect();
        self.units
            .iter()
            .filter(|u| u.selected)
            .map(|unit| TestJob {
                key: UnitKey {
                    path: self.path.clone(),
                    decl_index: unit.decl_index,
                },
                name: unit.name.clone(),
                lines: Arc::clone(&snapshot),
                skip_index: unit.skip_index,
            })
            .collect()
    }

    /// Text to persist given the units' current classifications.
    pub fn rewritten(&self) -> String {
        rewrite(&self.lines, &self.units).concat()
    }

    /// Overwrite the file on disk with [`SourceFile::rewritten`].
    pub fn persist(&self) -> Result<(), CorpusError> {
        fs::write(&self.path, self.rewritten()).map_err(|source| CorpusError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Every loaded file, in discovery order.
#[derive(Debug, Default)]
pub struct Corpus {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, usize>,
}

impl Corpus {
    /// Load `paths`. Files that cannot be read or are malformed are returned separately and left out of the corpus.
    pub fn load(paths: &[PathBuf], recheck: bool) -> (Self, Vec<CorpusError>) {
        let mut corpus = Corpus::default();
        let mut skipped = Vec::new();

        for path in paths {
            match SourceFile::load(path) {
                Ok(mut file) => {
                    if recheck {
                        file.select_all();
                    }
                    corpus.push(file);
                }
                Err(e) => {
                    if e.is_io() {
                        tracing::error!("skipping file: {e}");
                    } else {
                        tracing::warn!("skipping file: {e}");
                    }
                    skipped.push(e);
                }
            }
        }

        (corpus, skipped)
    }

    /// Add a file; a file already present under the same path is replaced.
    pub fn push(&mut self, file: SourceFile) {
        match self.by_path.get(&file.path) {
            Some(&i) => self.files[i] = file,
            None => {
                self.by_path.insert(file.path.clone(), self.files.len());
                self.files.push(file);
            }
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.by_path.get(path).map(|&i| &self.files[i])
    }

    pub fn file_mut(&mut self, path: &Path) -> Option<&mut SourceFile> {
        self.by_path.get(path).map(|&i| &mut self.files[i])
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Jobs for every selected unit, file by file.
    pub fn jobs(&self) -> Vec<TestJob> {
        self.files.iter().flat_map(SourceFile::jobs).collect()
    }

    /// Total number of selected units.
    pub fn selected_count(&self) -> usize {
        self.files.iter().map(SourceFile::selected_count).sum()
    }

    /// Files with at least one selected unit, as `(path, count)`, sorted by count then path.
    pub fn outstanding(&self) -> Vec<(PathBuf, usize)> {
        let mut counts: Vec<(PathBuf, usize)> = self
            .files
            .iter()
            .map(|f| (f.path.clone(), f.selected_count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}
