//! Execution harness: run each test unit in isolation against the compiler.
//!
//! ## Modules
//!
//! - `config` - [`HarnessConfig`], the explicit compiler invocation profile
//! - `executor` - the [`TestExecutor`] boundary and the subprocess-backed [`CompilerExecutor`]
//! - `pool` - [`WorkerPool`], a bounded pool delivering outcomes in completion order
//!
//! ## Design
//!
//! Workers never see the corpus. Each receives a [`TestJob`]: an immutable snapshot of the owning file's lines plus the
//! index of the skip line to omit, and answers with a [`UnitOutcome`] keyed by [`UnitKey`]. Putting results back into
//! file order is the aggregator's job, on the coordinating thread.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod config;
pub mod executor;
pub mod pool;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use unskip_core::Classification;

pub use config::HarnessConfig;
pub use executor::{CompilerExecutor, TestExecutor};
pub use pool::WorkerPool;

/// Errors raised while materialising or launching a single test.
///
/// These never abort a run; the affected unit is recorded as [`Classification::HarnessError`].
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to write scratch file: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("failed to spawn `{}`: {source}", .compiler.display())]
    Spawn {
        compiler: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for compiler: {0}")]
    Wait(#[source] std::io::Error),

    #[error("failed to start worker runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Identity of a test unit: owning file plus declaration line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    pub path: PathBuf,
    pub decl_index: usize,
}

/// Work item handed to a worker.
#[derive(Debug, Clone)]
pub struct TestJob {
    pub key: UnitKey,
    /// Display name of the test
    pub name: String,
    /// Snapshot of the owning file's normalized lines, shared read-only between jobs of the same file
    pub lines: Arc<[String]>,
    /// Line omitted when materialising the isolated variant
    pub skip_index: usize,
}

impl TestJob {
    /// File contents with this unit's skip line removed.
    pub fn isolated_source(&self) -> String {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.skip_index)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    /// Original file name, used as the scratch file suffix.
    pub fn file_name(&self) -> String {
        self.key
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Exit status 0
    Passed,
    /// Non-zero exit, classified from the diagnostic text
    Failed {
        exit_code: i32,
        stderr: String,
        classification: Classification,
    },
    /// The time budget ran out; the compiler was abandoned
    TimedOut,
    /// The harness could not run the test at all
    HarnessFailed(String),
}

impl ExecutionOutcome {
    /// The unit's error classification; `None` when the test passed.
    pub fn classification(&self) -> Option<Classification> {
        match self {
            ExecutionOutcome::Passed => None,
            ExecutionOutcome::Failed { classification, .. } => Some(*classification),
            ExecutionOutcome::TimedOut => Some(Classification::TimedOut),
            ExecutionOutcome::HarnessFailed(_) => Some(Classification::HarnessError),
        }
    }
}

/// Outcome delivered by the pool, tagged with the identity of the unit it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    pub key: UnitKey,
    pub name: String,
    pub outcome: ExecutionOutcome,
}
