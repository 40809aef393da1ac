//! Text-level state machines over skip-annotated test files: normalize, extract, rewrite.
//!
//! Files are handled as line sequences (each line keeps its terminator) and never parsed beyond the fixed structural
//! markers in `unskip_core::markers`. Every pass is a single forward scan and touches only the lines it has to.
//!
//! ## Notes
//! - This crate does no IO. Loading, persisting and running the compiler live in the `unskip` crate.
//! - Normalizer and extractor share the same marker predicates; if they ever disagree on block boundaries the
//!   extractor reports a [`StructuralError`] rather than guessing.
//!
//! ## Examples
//! ```rust
//! use unskip_syntax::{extract_units, normalize, rewrite, split_lines};
//!
//! let lines = normalize(split_lines("test \"adds numbers\" {\n    try expect(1 + 1 == 2);\n}\n"));
//! let units = extract_units(&lines).unwrap();
//! assert_eq!(units[0].name, "adds numbers");
//!
//! // Nothing failed: the inserted skip line is dropped again and the file round-trips.
//! let out = rewrite(&lines, &units).concat();
//! assert_eq!(out, "test \"adds numbers\" {\n    try expect(1 + 1 == 2);\n}\n");
//! ```

pub mod extract;
pub mod normalize;
pub mod rewrite;

pub use extract::{StructuralError, TestUnit, extract_units};
pub use normalize::normalize;
pub use rewrite::rewrite;

/// Split file text into lines, keeping each line's terminator.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}
