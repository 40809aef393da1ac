//! Provide the canonical marker vocabulary and failure taxonomy shared by the unskip tool.
//!
//! This crate is intentionally small and dependency-free. It contains the fixed text patterns used to re-derive test
//! structure from a source file on every run, and the ordered table used to turn unstructured compiler diagnostics into
//! a closed set of failure labels.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state. Line-level state machines live in `unskip_syntax`;
//!   subprocesses and the filesystem live in the `unskip` binary crate.
//! - Nothing here is persisted across runs except the literal patterns themselves, which is why they are centralised:
//!   the normalizer, extractor and rewriter must agree on them byte-for-byte.

pub mod classify;
pub mod markers;

pub use classify::{Classification, DIAGNOSTIC_SIGNATURES, DiagnosticSignature, classify_failure};
