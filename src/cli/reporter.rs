//! Console reporting.
//!
//! [`RunReporter`] separates what the coordinator knows (progress, per-test results, the final summary) from how it is
//! shown. [`ConsoleReporter`] prints coloured lines to stdout; the formatting itself lives in plain functions so it
//! can be checked without capturing output.

use std::io::{self, Write};
use std::path::PathBuf;

use unskip_core::Classification;

use crate::aggregate::RunSummary;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Receives run progress from the coordinator.
pub trait RunReporter {
    /// Called once before any result arrives
    fn on_run_start(&mut self, _total: usize) {}

    /// Called for every reconciled test, in completion order. `index` starts at 1.
    fn on_test_complete(&mut self, index: usize, total: usize, name: &str, result: Option<Classification>);

    /// Called once after the last result
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Reporter writing to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl RunReporter for ConsoleReporter {
    fn on_test_complete(&mut self, index: usize, total: usize, name: &str, result: Option<Classification>) {
        println!("{}", format_test_line(index, total, name, result));
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        println!("{}", format_summary(summary));
        let _ = io::stdout().flush();
    }
}

/// `[i/N] PASS name` or `[i/N] FAIL name (label)`.
pub fn format_test_line(index: usize, total: usize, name: &str, result: Option<Classification>) -> String {
    match result {
        None => format!("[{index}/{total}] {GREEN}PASS{RESET} {name}"),
        Some(classification) => format!("[{index}/{total}] {RED}FAIL{RESET} {name} ({classification})"),
    }
}

pub fn format_summary(summary: &RunSummary) -> String {
    match summary.pass_rate() {
        None => "no tests to execute".to_string(),
        Some(rate) => format!("{} passed, {} failed - {rate:.2}% passing", summary.passed, summary.failed),
    }
}

/// `<count> <path>` per file, then `total: <N>`.
pub fn format_outstanding(counts: &[(PathBuf, usize)]) -> String {
    let mut out = String::new();
    for (path, count) in counts {
        out.push_str(&format!("{count} {}\n", path.display()));
    }
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    out.push_str(&format!("total: {total}"));
    out
}
