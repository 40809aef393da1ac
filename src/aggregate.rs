//! Result aggregation.
//!
//! The pool delivers [`UnitOutcome`]s in completion order. [`Aggregator`] puts each one back into its slot in the
//! file-ordered corpus by `(path, decl_index)`, overwriting the unit's classification. It runs on the coordinating
//! thread only, one outcome at a time, so the corpus needs no locking.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;
use unskip_core::Classification;

use crate::corpus::Corpus;
use crate::harness::{UnitKey, UnitOutcome};

/// An outcome that cannot be matched to an outstanding unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("result for file not in corpus: {}", .0.display())]
    UnknownFile(PathBuf),

    #[error("no test declared on line {} of {}", .0.decl_index + 1, .0.path.display())]
    UnknownUnit(UnitKey),

    #[error("unexpected result for line {} of {}", .0.decl_index + 1, .0.path.display())]
    Unexpected(UnitKey),
}

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Percentage of passing tests, `None` when nothing ran.
    pub fn pass_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.passed as f64 * 100.0 / self.total as f64)
        }
    }
}

/// Reconciles pool outcomes into a [`Corpus`].
pub struct Aggregator<'a> {
    corpus: &'a mut Corpus,
    pending: BTreeSet<UnitKey>,
    expected: usize,
    passed: usize,
    failed: usize,
}

impl<'a> Aggregator<'a> {
    /// Expect one outcome for every selected unit of `corpus`.
    pub fn new(corpus: &'a mut Corpus) -> Self {
        let pending: BTreeSet<UnitKey> = corpus
            .files()
            .iter()
            .flat_map(|file| {
                file.units.iter().filter(|unit| unit.selected).map(|unit| UnitKey {
                    path: file.path.clone(),
                    decl_index: unit.decl_index,
                })
            })
            .collect();
        let expected = pending.len();
        Self {
            corpus,
            pending,
            expected,
            passed: 0,
            failed: 0,
        }
    }

    /// Number of outcomes expected in total.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of outcomes reconciled so far.
    pub fn completed(&self) -> usize {
        self.passed + self.failed
    }

    /// Record `outcome` in its unit, returning the unit's new classification.
    ///
    /// ## Errors
    /// - [`ReconcileError::UnknownFile`] / [`ReconcileError::UnknownUnit`] if the key does not address a unit.
    /// - [`ReconcileError::Unexpected`] if the unit was not selected or has already been reconciled.
    pub fn reconcile(&mut self, outcome: &UnitOutcome) -> Result<Option<Classification>, ReconcileError> {
        let key = &outcome.key;
        let file = self
            .corpus
            .file_mut(&key.path)
            .ok_or_else(|| ReconcileError::UnknownFile(key.path.clone()))?;
        let slot = file
            .units
            .binary_search_by_key(&key.decl_index, |unit| unit.decl_index)
            .map_err(|_| ReconcileError::UnknownUnit(key.clone()))?;

        if !self.pending.remove(key) {
            return Err(ReconcileError::Unexpected(key.clone()));
        }

        let classification = outcome.outcome.classification();
        file.units[slot].error = classification;
        match classification {
            None => self.passed += 1,
            Some(_) => self.failed += 1,
        }

        tracing::debug!(
            test = %outcome.name,
            file = %key.path.display(),
            result = %classification.map_or_else(|| "pass".to_string(), |c| c.label()),
            "reconciled"
        );
        Ok(classification)
    }

    /// Close the run. A unit that never reported back is recorded as a harness error so its skip line is kept.
    pub fn finish(self) -> RunSummary {
        let mut failed = self.failed;

        for key in self.pending {
            tracing::warn!(file = %key.path.display(), line = key.decl_index + 1, "no result received for test");
            if let Some(unit) = self.corpus.file_mut(&key.path).and_then(|file| {
                file.units
                    .iter_mut()
                    .find(|unit| unit.decl_index == key.decl_index)
            }) {
                unit.error = Some(Classification::HarnessError);
            }
            failed += 1;
        }

        RunSummary {
            total: self.passed + failed,
            passed: self.passed,
            failed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::corpus::SourceFile;
    use crate::harness::ExecutionOutcome;
    use std::path::Path;
    use unskip_core::markers::SKIP_STATEMENT;

    fn corpus() -> Corpus {
        let text: String = ["a", "b", "c"]
            .iter()
            .map(|n| format!("test \"{n}\" {{\n    {SKIP_STATEMENT}\n}}\n"))
            .collect();
        let mut corpus = Corpus::default();
        corpus.push(SourceFile::from_text(Path::new("x.zig"), &text).unwrap());
        corpus
    }

    fn outcome(decl_index: usize, outcome: ExecutionOutcome) -> UnitOutcome {
        UnitOutcome {
            key: UnitKey {
                path: PathBuf::from("x.zig"),
                decl_index,
            },
            name: format!("line {decl_index}"),
            outcome,
        }
    }

    #[test]
    fn test_outcomes_land_in_their_own_slots() {
        let mut corpus = corpus();
        let mut aggregator = Aggregator::new(&mut corpus);
        assert_eq!(aggregator.expected(), 3);

        aggregator.reconcile(&outcome(6, ExecutionOutcome::TimedOut)).unwrap();
        aggregator.reconcile(&outcome(0, ExecutionOutcome::Passed)).unwrap();
        aggregator
            .reconcile(&outcome(
                3,
                ExecutionOutcome::Failed {
                    exit_code: 1,
                    stderr: String::new(),
                    classification: Classification::ReturnCode(1),
                },
            ))
            .unwrap();
        assert_eq!(aggregator.completed(), 3);

        let summary = aggregator.finish();
        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                passed: 1,
                failed: 2
            }
        );

        let units = &corpus.file(Path::new("x.zig")).unwrap().units;
        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(units[0].error, None);
        assert_eq!(units[1].error, Some(Classification::ReturnCode(1)));
        assert_eq!(units[2].error, Some(Classification::TimedOut));
    }

    #[test]
    fn test_rejects_unknown_and_repeated_outcomes() {
        let mut corpus = corpus();
        let mut aggregator = Aggregator::new(&mut corpus);

        let mut stray = outcome(0, ExecutionOutcome::Passed);
        stray.key.path = PathBuf::from("other.zig");
        assert!(matches!(aggregator.reconcile(&stray), Err(ReconcileError::UnknownFile(_))));
        assert!(matches!(
            aggregator.reconcile(&outcome(1, ExecutionOutcome::Passed)),
            Err(ReconcileError::UnknownUnit(_))
        ));

        aggregator.reconcile(&outcome(0, ExecutionOutcome::Passed)).unwrap();
        assert!(matches!(
            aggregator.reconcile(&outcome(0, ExecutionOutcome::TimedOut)),
            Err(ReconcileError::Unexpected(_))
        ));
        assert_eq!(aggregator.completed(), 1);
    }

    #[test]
    fn test_missing_outcomes_become_harness_errors() {
        let mut corpus = corpus();
        let mut aggregator = Aggregator::new(&mut corpus);
        aggregator.reconcile(&outcome(3, ExecutionOutcome::Passed)).unwrap();
        let summary = aggregator.finish();

        assert_eq!(summary.failed, 2);
        let units = &corpus.file(Path::new("x.zig")).unwrap().units;
        assert_eq!(units[0].error, Some(Classification::HarnessError));
        assert_eq!(units[1].error, None);
        assert_eq!(units[2].error, Some(Classification::HarnessError));
    }

    #[test]
    fn test_only_selected_units_are_expected() {
        let text = format!("test \"a\" {{\n    {SKIP_STATEMENT}\n}}\ntest \"b\" {{\n}}\n");
        let mut corpus = Corpus::default();
        corpus.push(SourceFile::from_text(Path::new("x.zig"), &text).unwrap());
        let passing = corpus.file(Path::new("x.zig")).unwrap().units[1].clone();
        assert!(passing.provisional && !passing.selected);

        let mut aggregator = Aggregator::new(&mut corpus);
        assert_eq!(aggregator.expected(), 1);
        assert!(matches!(
            aggregator.reconcile(&outcome(passing.decl_index, ExecutionOutcome::TimedOut)),
            Err(ReconcileError::Unexpected(_))
        ));

        let summary = aggregator.finish();
        assert_eq!(summary.total, 1);
        let units = &corpus.file(Path::new("x.zig")).unwrap().units;
        assert_eq!(units[0].error, Some(Classification::HarnessError));
        assert_eq!(units[1], passing);
    }

    #[test]
    fn test_pass_rate() {
        assert_eq!(RunSummary::default().pass_rate(), None);
        let summary = RunSummary {
            total: 3,
            passed: 2,
            failed: 1,
        };
        assert!((summary.pass_rate().unwrap() - 66.666).abs() < 0.01);
    }
}
