//! Failure taxonomy for compiler test runs.
//!
//! Compiler diagnostics are unstructured text. Rather than branching on substrings inline, the recognised signatures
//! live in [`DIAGNOSTIC_SIGNATURES`], an ordered table scanned first-match-wins, with the numeric exit status as the
//! fallback bucket. Extending the taxonomy means adding a row, not touching control flow.
//!
//! ## Notes
//! - Order matters: the generic trap marker (`panic: `) sits below the specific traps it would otherwise shadow.
//! - The classifier is total: every input yields exactly one [`Classification`].

use std::fmt;

/// Closed set of labels attached to a failing or timed-out test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The compiled test reached an `unreachable` trap.
    Unreachable,
    /// The compiled test trapped on an out-of-bounds index.
    IndexOutOfBounds,
    /// Any other trap.
    Panic,
    /// The compiler (or the test) was killed by a memory-access violation.
    Segfault,
    /// The test framework reported a failing test.
    TestFailure,
    /// The test relies on a structural equality assertion the backend cannot lower.
    IncompatibleEquality,
    /// Non-zero exit matching no known signature.
    ReturnCode(i32),
    /// The compiler did not finish within the time budget.
    TimedOut,
    /// The harness itself could not materialise or launch the test.
    HarnessError,
}

impl Classification {
    /// Human-readable label used in reports.
    pub fn label(&self) -> String {
        match self {
            Classification::Unreachable => "unreachable".to_string(),
            Classification::IndexOutOfBounds => "index out of bounds".to_string(),
            Classification::Panic => "panic".to_string(),
            Classification::Segfault => "segfault".to_string(),
            Classification::TestFailure => "test failure".to_string(),
            Classification::IncompatibleEquality => "uses incompatible equality assertion".to_string(),
            Classification::ReturnCode(code) => format!("return code {code}"),
            Classification::TimedOut => "timed out".to_string(),
            Classification::HarnessError => "harness error".to_string(),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One row of the signature table: if `marker` occurs in the diagnostic text, the outcome is `classification`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticSignature {
    pub marker: &'static str,
    pub classification: Classification,
}

const fn signature(marker: &'static str, classification: Classification) -> DiagnosticSignature {
    DiagnosticSignature { marker, classification }
}

/// Recognised diagnostic signatures, in priority order.
pub const DIAGNOSTIC_SIGNATURES: &[DiagnosticSignature] = &[
    signature("panic: reached unreachable code", Classification::Unreachable),
    signature("panic: index out of bounds", Classification::IndexOutOfBounds),
    signature("panic: ", Classification::Panic),
    signature("Segmentation fault", Classification::Segfault),
    signature("... FAIL (", Classification::TestFailure),
    // Only reachable when the compiler reports it without the generic trap prefix.
    signature("classifySystem Struct", Classification::IncompatibleEquality),
];

/// Classify a non-zero exit from the compiler.
///
/// ## Parameters
/// - `stderr`: diagnostic text captured from the compiler.
/// - `exit_code`: numeric exit status, used verbatim when no signature matches.
///
/// ## Returns
/// - (`Classification`): the first matching signature's label, otherwise [`Classification::ReturnCode`].
///
/// ## Examples
/// ```rust
/// use unskip_core::{Classification, classify_failure};
///
/// assert_eq!(classify_failure("Segmentation fault at 0x0", 1), Classification::Segfault);
/// assert_eq!(classify_failure("error: oops", 1), Classification::ReturnCode(1));
/// ```
pub fn classify_failure(stderr: &str, exit_code: i32) -> Classification {
    DIAGNOSTIC_SIGNATURES
        .iter()
        .find(|sig| stderr.contains(sig.marker))
        .map(|sig| sig.classification)
        .unwrap_or(Classification::ReturnCode(exit_code))
}
