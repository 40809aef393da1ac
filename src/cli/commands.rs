//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use crate::aggregate::{Aggregator, RunSummary};
use crate::corpus::{Corpus, CorpusError, discover_test_files};
use crate::harness::{CompilerExecutor, HarnessConfig, TestExecutor, WorkerPool};
use crate::rewriter::{CompilerFormatter, FileRewriter, SourceFormatter};

use super::reporter::{ConsoleReporter, RunReporter, format_outstanding};
use super::{CliError, CliResult, ExitCode};

/// Discover and load every test file under `path`.
///
/// Unreadable or malformed files are left out and returned alongside the corpus.
pub fn load_corpus(path: &Path, extension: &str, recheck: bool) -> CliResult<(Corpus, Vec<CorpusError>)> {
    let files = discover_test_files(path, extension).map_err(|e| CliError::failure(format!("Error: {e}")))?;
    tracing::debug!(count = files.len(), "discovered test files");
    Ok(Corpus::load(&files, recheck))
}

/// `--todo`: print outstanding counts per file without running anything.
pub fn report_outstanding(path: &Path, extension: &str, recheck: bool) -> CliResult<ExitCode> {
    let (corpus, skipped) = load_corpus(path, extension, recheck)?;
    println!("{}", format_outstanding(&corpus.outstanding()));
    Ok(exit_code_for(skipped.len()))
}

/// Run every selected test through the compiler and rewrite the corpus.
pub fn update_tests(config: HarnessConfig, path: &Path, extension: &str, recheck: bool) -> CliResult<ExitCode> {
    let (mut corpus, skipped) = load_corpus(path, extension, recheck)?;

    let pool = WorkerPool::new(CompilerExecutor::new(config.clone()), config.jobs);
    let rewriter = FileRewriter::new(CompilerFormatter::new(&config.compiler));
    let mut reporter = ConsoleReporter;

    let (_, write_failures) = update_corpus(&mut corpus, &pool, &rewriter, &mut reporter)?;
    Ok(exit_code_for(skipped.len() + write_failures))
}

/// Execute, reconcile and rewrite an already-loaded corpus.
///
/// Returns the run summary and the number of files that could not be written back.
pub fn update_corpus<E, F, R>(
    corpus: &mut Corpus,
    pool: &WorkerPool<E>,
    rewriter: &FileRewriter<F>,
    reporter: &mut R,
) -> CliResult<(RunSummary, usize)>
where
    E: TestExecutor,
    F: SourceFormatter,
    R: RunReporter,
{
    let jobs = corpus.jobs();
    tracing::debug!(jobs = jobs.len(), workers = pool.size(), "starting run");

    let summary = {
        let mut aggregator = Aggregator::new(corpus);
        let total = aggregator.expected();
        reporter.on_run_start(total);

        pool.run(jobs, |outcome| match aggregator.reconcile(&outcome) {
            Ok(result) => {
                reporter.on_test_complete(aggregator.completed(), total, &outcome.name, result);
            }
            Err(e) => tracing::warn!("discarding result: {e}"),
        })
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

        aggregator.finish()
    };
    reporter.on_run_complete(&summary);

    let mut write_failures = 0;
    for file in corpus.files() {
        if let Err(e) = rewriter.rewrite(file) {
            tracing::error!("{e}");
            write_failures += 1;
        }
    }

    Ok((summary, write_failures))
}

fn exit_code_for(file_errors: usize) -> ExitCode {
    if file_errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::corpus::SourceFile;
    use crate::harness::{ExecutionOutcome, TestJob};
    use crate::rewriter::NoFormatter;
    use std::fs;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;
    use unskip_core::Classification;
    use unskip_core::markers::SKIP_STATEMENT;

    /// Passes tests whose name starts with "ok", times out the rest.
    struct ByName;

    impl TestExecutor for ByName {
        async fn execute(&self, job: &TestJob) -> ExecutionOutcome {
            if job.name.starts_with("ok") {
                ExecutionOutcome::Passed
            } else {
                ExecutionOutcome::TimedOut
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(usize, usize, String, Option<Classification>)>,
        summary: Option<RunSummary>,
    }

    impl RunReporter for Recorder {
        fn on_test_complete(&mut self, index: usize, total: usize, name: &str, result: Option<Classification>) {
            self.lines.push((index, total, name.to_string(), result));
        }

        fn on_run_complete(&mut self, summary: &RunSummary) {
            self.summary = Some(*summary);
        }
    }

    #[test]
    fn test_update_corpus_rewrites_by_result() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.zig");
        fs::write(
            &path,
            format!(
                "test \"ok one\" {{\n    {SKIP_STATEMENT}\n    try a();\n}}\n\ntest \"slow\" {{\n    {SKIP_STATEMENT}\n    try b();\n}}\n"
            ),
        )
        .unwrap();

        let mut corpus = Corpus::default();
        corpus.push(SourceFile::load(&path).unwrap());
        let pool = WorkerPool::new(ByName, NonZeroUsize::new(2).unwrap());
        let mut reporter = Recorder::default();

        let (summary, write_failures) =
            update_corpus(&mut corpus, &pool, &FileRewriter::new(NoFormatter), &mut reporter).unwrap();

        assert_eq!(write_failures, 0);
        assert_eq!((summary.passed, summary.failed), (1, 1));
        assert_eq!(reporter.summary, Some(summary));
        assert_eq!(reporter.lines.len(), 2);
        let mut indices: Vec<usize> = reporter.lines.iter().map(|l| l.0).collect();
        indices.sort_unstable();
        assert_eq!(indices, [1, 2]);
        assert!(reporter.lines.iter().all(|l| l.1 == 2));

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("test \"ok one\" {{\n    try a();\n}}\n\ntest \"slow\" {{\n    {SKIP_STATEMENT}\n    try b();\n}}\n")
        );
    }

    #[test]
    fn test_load_corpus_reports_malformed_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.zig"), "test \"a\" {\n}\n").unwrap();
        fs::write(dir.path().join("bad.zig"), [0xff, 0xfe, 0x00]).unwrap();

        let (corpus, skipped) = load_corpus(dir.path(), "zig", false).unwrap();
        assert_eq!(corpus.files().len(), 1);
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn test_load_corpus_missing_path() {
        let dir = tempdir().unwrap();
        let err = load_corpus(&dir.path().join("nope"), "zig", false).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("no such file or directory"));
    }
}
