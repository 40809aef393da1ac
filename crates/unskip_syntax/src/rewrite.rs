//! Rewrite policy: turn normalized lines plus final unit results into the text to persist.
//!
//! - A skip line is dropped when its block's unit is cleared (passed, or never run because it already passed).
//! - When the dropped skip line sat directly under its declaration, one blank line right after it goes too; this
//!   undoes the separator the normalizer inserts.
//! - The provisional tag is stripped from every skip line that survives.
//!
//! Everything else is copied verbatim.

use unskip_core::markers::{is_blank, is_declaration, is_skip_line, strip_provisional_tag};

use crate::extract::TestUnit;

/// Produce the persisted line sequence.
///
/// `units` must be the units extracted from `lines`, in declaration order. A declaration without a matching unit keeps
/// its skip lines.
pub fn rewrite(lines: &[String], units: &[TestUnit]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut current: Option<&TestUnit> = None;
    // Output index of the current declaration line.
    let mut decl_at: Option<usize> = None;
    let mut drop_next_blank = false;

    for (i, line) in lines.iter().enumerate() {
        if is_declaration(line) {
            current = units
                .binary_search_by_key(&i, |unit| unit.decl_index)
                .ok()
                .map(|k| &units[k]);
            decl_at = Some(out.len());
            drop_next_blank = false;
            out.push(line.clone());
            continue;
        }

        if is_skip_line(line) {
            if current.is_some_and(TestUnit::is_cleared) {
                drop_next_blank = decl_at.is_some_and(|at| at + 1 == out.len());
                continue;
            }
            drop_next_blank = false;
            out.push(strip_provisional_tag(line).into_owned());
            continue;
        }

        if drop_next_blank && is_blank(line) {
            drop_next_blank = false;
            continue;
        }
        drop_next_blank = false;

        out.push(line.clone());
    }

    out
}
