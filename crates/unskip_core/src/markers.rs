//! Structural markers recognised inside test source files.
//!
//! A test file is treated as a flat sequence of lines. Only three shapes carry meaning:
//!
//! - a **declaration** line (`test "name" {`, or `test {`) that opens a block,
//! - the backend **skip line**, a single-line conditional that makes the test skip on the tracked backend,
//! - a **candidate** skip check for some other backend, used as an anchor when inserting a new skip line.
//!
//! Lines are passed around *with* their terminator (as produced by `str::split_inclusive('\n')`) so a file can be
//! written back byte-for-byte. Every predicate here ignores the trailing `\n` / `\r\n`.

use std::borrow::Cow;

/// Prefix that opens a test block. Must start the line.
pub const DECLARATION_PREFIX: &str = "test ";

/// Backend tracked by the skip line.
pub const BACKEND: &str = "stage2_riscv64";

/// The recognised skip statement (matched as a substring, so indentation and trailing comments are allowed).
pub const SKIP_STATEMENT: &str = "if (builtin.zig_backend == .stage2_riscv64) return error.SkipZigTest;";

/// Indentation used for inserted skip lines.
pub const SKIP_INDENT: &str = "    ";

/// Transient trailing tag marking a skip line inserted during this run.
///
/// Stripped from every line before the file is persisted.
pub const PROVISIONAL_TAG: &str = " // inserted by unskip";

/// Leading text of a skip check for an arbitrary backend.
pub const CANDIDATE_PREFIX: &str = "    if (builtin.zig_backend ==";

/// Statement a candidate check must end in.
pub const CANDIDATE_RETURN: &str = "return error.SkipZigTest";

/// Display name used when the declaration has no quoted name in the expected position.
pub const UNKNOWN_NAME: &str = "(unknown)";

/// Strip the line terminator, if any.
pub fn line_body(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Whether `line` ends in a line terminator.
pub fn is_terminated(line: &str) -> bool {
    line.ends_with('\n')
}

/// Whether `line` opens a test block.
pub fn is_declaration(line: &str) -> bool {
    line.starts_with(DECLARATION_PREFIX)
}

/// Whether `line` is the backend skip line (provisional or not).
pub fn is_skip_line(line: &str) -> bool {
    line.contains(SKIP_STATEMENT)
}

/// Whether `line` carries the provisional tag.
pub fn is_provisional(line: &str) -> bool {
    line.contains(PROVISIONAL_TAG)
}

/// Whether `line` is a skip check for some *other* backend.
///
/// ## Notes
/// - The tracked backend's own skip line is not a candidate; check [`is_skip_line`] first.
pub fn is_skip_candidate(line: &str) -> bool {
    line.starts_with(CANDIDATE_PREFIX) && line.contains(CANDIDATE_RETURN)
}

/// Whether `line` holds only whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Line terminator used by `line`: `\r\n` or `\n`. Unterminated lines count as `\n`.
pub fn line_terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") { "\r\n" } else { "\n" }
}

/// A freshly inserted skip line, tagged as provisional and ending in `terminator`.
pub fn provisional_skip_line(terminator: &str) -> String {
    format!("{SKIP_INDENT}{SKIP_STATEMENT}{PROVISIONAL_TAG}{terminator}")
}

/// Remove the provisional tag from `line`, borrowing when there is nothing to strip.
pub fn strip_provisional_tag(line: &str) -> Cow<'_, str> {
    if is_provisional(line) {
        Cow::Owned(line.replace(PROVISIONAL_TAG, ""))
    } else {
        Cow::Borrowed(line)
    }
}

/// Extract the quoted test name from a declaration line.
///
/// ## Returns
/// - `Some(name)` for `test "name" {`, with `name` taken verbatim (escapes are not interpreted).
/// - `None` for anonymous tests or any other shape.
pub fn declaration_name(line: &str) -> Option<&str> {
    line_body(line)
        .strip_prefix("test \"")
        .and_then(|rest| rest.strip_suffix("\" {"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_detection() {
        assert!(is_declaration("test \"adds numbers\" {\n"));
        assert!(is_declaration("test {\n"));
        assert!(!is_declaration("testing {\n"));
        assert!(!is_declaration("    test \"nested\" {\n"));
    }

    #[test]
    fn test_skip_line_matches_with_and_without_tag() {
        assert!(is_skip_line(&provisional_skip_line("\n")));
        assert!(is_skip_line(&format!("    {SKIP_STATEMENT}\n")));
        assert!(is_skip_line(&format!("\t{SKIP_STATEMENT} // flaky\n")));
        assert!(!is_skip_line(
            "    if (builtin.zig_backend == .stage2_x86_64) return error.SkipZigTest;\n"
        ));
    }

    #[test]
    fn test_candidate_requires_prefix_and_return() {
        assert!(is_skip_candidate(
            "    if (builtin.zig_backend == .stage2_arm) return error.SkipZigTest;\n"
        ));
        assert!(!is_skip_candidate("    if (builtin.zig_backend == .stage2_arm) return;\n"));
        assert!(!is_skip_candidate(
            "if (builtin.zig_backend == .stage2_arm) return error.SkipZigTest;\n"
        ));
    }

    #[test]
    fn test_strip_tag() {
        let tagged = provisional_skip_line("\n");
        assert!(is_provisional(&tagged));
        let stripped = strip_provisional_tag(&tagged);
        assert_eq!(stripped, format!("{SKIP_INDENT}{SKIP_STATEMENT}\n"));
        assert!(matches!(strip_provisional_tag("const x = 1;\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_declaration_name() {
        assert_eq!(declaration_name("test \"adds numbers\" {\n"), Some("adds numbers"));
        assert_eq!(declaration_name("test \"crlf\" {\r\n"), Some("crlf"));
        assert_eq!(declaration_name("test {\n"), None);
        assert_eq!(declaration_name("test \"no brace\"\n"), None);
        assert_eq!(declaration_name("test \"a \\\"quoted\\\" name\" {"), Some("a \\\"quoted\\\" name"));
    }

    #[test]
    fn test_line_body() {
        assert_eq!(line_body("abc\r\n"), "abc");
        assert_eq!(line_body("abc\n"), "abc");
        assert_eq!(line_body("abc"), "abc");
        assert!(is_terminated("abc\n"));
        assert!(!is_terminated("abc"));
        assert_eq!(line_terminator("abc\r\n"), "\r\n");
        assert_eq!(line_terminator("abc\n"), "\n");
        assert_eq!(line_terminator("abc"), "\n");
    }
}
