//! Annotation normalizer.
//!
//! Rewrites a file so that every test block carries exactly one backend skip line. Blocks that already have one are
//! left alone; blocks without one get a provisional line (tagged with `PROVISIONAL_TAG`) so a later rewrite can tell
//! which markers were invented by this run.
//!
//! Placement of an inserted line:
//! - directly after the last skip check for another backend, if such checks open the block, otherwise
//! - directly after the declaration, followed by a blank separator line.
//!
//! Running the normalizer on its own output is a no-op.

use unskip_core::markers::{
    is_blank, is_declaration, is_skip_candidate, is_skip_line, is_terminated, line_terminator, provisional_skip_line,
};

/// Scan state for the block currently being read.
struct OpenBlock {
    /// Index of the declaration line in the output.
    decl: usize,
    skip_seen: bool,
    /// Output index directly after the most recent leading candidate check.
    candidate: Option<usize>,
    /// A non-blank, non-skip statement has appeared; later candidates no longer count.
    seen_other: bool,
}

impl OpenBlock {
    fn new(decl: usize) -> Self {
        Self {
            decl,
            skip_seen: false,
            candidate: None,
            seen_other: false,
        }
    }
}

/// Normalize `lines` so every block holds exactly one skip line.
///
/// ## Notes
/// - Lines before the first declaration are copied through untouched.
/// - If a block already contains several skip lines, only the first is kept.
pub fn normalize(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 8);
    let mut block: Option<OpenBlock> = None;

    for line in lines {
        if is_declaration(&line) {
            if let Some(closed) = block.take() {
                close_block(&mut out, closed);
            }
            out.push(line);
            block = Some(OpenBlock::new(out.len() - 1));
            continue;
        }

        let Some(open) = block.as_mut() else {
            out.push(line);
            continue;
        };

        if is_skip_line(&line) {
            if open.skip_seen {
                tracing::debug!(decl = open.decl, "dropping duplicate skip line");
                continue;
            }
            open.skip_seen = true;
        } else if is_skip_candidate(&line) && !open.seen_other {
            open.candidate = Some(out.len() + 1);
        } else if !is_blank(&line) {
            open.seen_other = true;
        }
        out.push(line);
    }

    if let Some(closed) = block {
        close_block(&mut out, closed);
    }

    out
}

fn close_block(out: &mut Vec<String>, block: OpenBlock) {
    if block.skip_seen {
        return;
    }

    // Inserted lines follow the declaration's line ending.
    let terminator = line_terminator(&out[block.decl]);
    match block.candidate {
        Some(at) => insert_terminated(out, at, provisional_skip_line(terminator), terminator),
        None => {
            insert_terminated(out, block.decl + 1, provisional_skip_line(terminator), terminator);
            out.insert(block.decl + 2, terminator.to_string());
        }
    }
}

/// Insert `line` at `at`, terminating the preceding line first if it was the unterminated last line of the file.
fn insert_terminated(out: &mut Vec<String>, at: usize, line: String, terminator: &str) {
    if let Some(prev) = at.checked_sub(1).and_then(|i| out.get_mut(i)) {
        if !is_terminated(prev) {
            prev.push_str(terminator);
        }
    }
    out.insert(at, line);
}
