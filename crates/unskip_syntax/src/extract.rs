//! Test-unit extraction from normalized lines.

use thiserror::Error;
use unskip_core::Classification;
use unskip_core::markers::{UNKNOWN_NAME, declaration_name, is_declaration, is_provisional, is_skip_line};

/// Errors raised when a file does not have the block shape the normalizer guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("test declared on line {} has no skip line before the next test", .decl_index + 1)]
    MissingSkipLine { decl_index: usize },
}

/// One test block of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUnit {
    /// Line index of the `test` declaration.
    pub decl_index: usize,
    /// Line index of the block's skip line; always inside the block.
    pub skip_index: usize,
    /// Quoted test name, or [`UNKNOWN_NAME`].
    pub name: String,
    /// The skip line was inserted by the normalizer during this run.
    pub provisional: bool,
    /// Whether the harness should run this unit.
    pub selected: bool,
    /// `None` once the test is known to pass (or was never run).
    pub error: Option<Classification>,
}

impl TestUnit {
    /// Whether the skip line of this unit may be dropped.
    pub fn is_cleared(&self) -> bool {
        self.error.is_none()
    }
}

/// Produce one [`TestUnit`] per declaration line.
///
/// Units come out in declaration order. Pre-existing skip lines mark a unit as outstanding and selected; provisional
/// ones mark it as already passing and unselected (callers re-select for a full re-check).
///
/// ## Errors
/// - [`StructuralError::MissingSkipLine`] if any block lacks a skip line.
pub fn extract_units(lines: &[String]) -> Result<Vec<TestUnit>, StructuralError> {
    let mut units = Vec::new();
    let mut open: Option<(usize, Option<usize>)> = None;

    for (i, line) in lines.iter().enumerate() {
        if is_declaration(line) {
            if let Some((decl, skip)) = open.take() {
                units.push(build_unit(lines, decl, skip)?);
            }
            open = Some((i, None));
        } else if is_skip_line(line) {
            if let Some((_, skip)) = open.as_mut() {
                *skip = Some(i);
            }
        }
    }

    if let Some((decl, skip)) = open {
        units.push(build_unit(lines, decl, skip)?);
    }

    Ok(units)
}

fn build_unit(lines: &[String], decl_index: usize, skip: Option<usize>) -> Result<TestUnit, StructuralError> {
    let skip_index = skip.ok_or(StructuralError::MissingSkipLine { decl_index })?;
    let name = declaration_name(&lines[decl_index]).unwrap_or(UNKNOWN_NAME).to_string();
    let provisional = is_provisional(&lines[skip_index]);

    Ok(TestUnit {
        decl_index,
        skip_index,
        name,
        provisional,
        selected: !provisional,
        error: None,
    })
}
