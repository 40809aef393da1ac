#![forbid(unsafe_code)]
//! unskip: keep a compiler conformance corpus's backend skip markers honest.
//!
//! For a given compiler binary, every test block that carries a skip marker for the tracked backend is re-run in
//! isolation with the marker removed. Tests that now pass lose their marker; tests that fail or time out keep (or gain)
//! one. The pipeline is:
//!
//! ```text
//! files ─ normalize ─ extract ─┬─ harness (worker pool) ─┬─ aggregate ─ rewrite ─ persist + fmt
//!                              └─ … one job per unit … ──┘
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli`, `harness`, `aggregate`
//!   and `rewriter` modules enforce `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod aggregate;
pub mod cli;
pub mod corpus;
pub mod harness;
pub mod rewriter;
pub mod version;

pub use aggregate::{Aggregator, ReconcileError, RunSummary};
pub use corpus::{Corpus, CorpusError, SourceFile};
pub use harness::{
    CompilerExecutor, ExecutionOutcome, HarnessConfig, HarnessError, TestExecutor, TestJob, UnitKey, UnitOutcome,
    WorkerPool,
};
pub use rewriter::{CompilerFormatter, FileRewriter, NoFormatter, SourceFormatter};

pub use unskip_core::Classification;
pub use unskip_syntax::TestUnit;
