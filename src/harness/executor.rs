//! Test execution boundary.
//!
//! [`TestExecutor`] separates "run one isolated test" from pool scheduling, so the pool and aggregator can be exercised
//! without a compiler. [`CompilerExecutor`] is the real implementation:
//!
//! 1. write the job's isolated source to a private scratch file,
//! 2. run the compiler on it with the configured argument profile,
//! 3. wait up to the time budget, killing the process if it runs over,
//! 4. classify a non-zero exit from its stderr.
//!
//! The scratch file is removed when the job finishes, whatever the outcome.

use std::future::Future;
use std::io::Write;
use std::process::{ExitStatus, Stdio};

use tempfile::NamedTempFile;
use tokio::process::Command;
use unskip_core::classify_failure;

use super::{ExecutionOutcome, HarnessConfig, HarnessError, TestJob};

/// Execute a single test job and report its outcome.
pub trait TestExecutor: Send + Sync + 'static {
    /// Run `job` in isolation. Infallible: harness failures are folded into the outcome.
    fn execute(&self, job: &TestJob) -> impl Future<Output = ExecutionOutcome> + Send;
}

/// Runs jobs through the external compiler.
#[derive(Debug, Clone)]
pub struct CompilerExecutor {
    config: HarnessConfig,
}

impl CompilerExecutor {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    async fn run(&self, job: &TestJob) -> Result<ExecutionOutcome, HarnessError> {
        let scratch = materialize(job)?;

        let mut command = Command::new(&self.config.compiler);
        command
            .args(self.config.test_args(scratch.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(test = %job.name, file = %job.key.path.display(), scratch = %scratch.path().display(), "spawning compiler");

        let child = command.spawn().map_err(|source| HarnessError::Spawn {
            compiler: self.config.compiler.clone(),
            source,
        })?;

        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(HarnessError::Wait)?,
            Err(_) => {
                tracing::debug!(test = %job.name, timeout = ?self.config.timeout, "compiler timed out");
                return Ok(ExecutionOutcome::TimedOut);
            }
        };

        if output.status.success() {
            return Ok(ExecutionOutcome::Passed);
        }

        let exit_code = exit_code(&output.status);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let classification = classify_failure(&stderr, exit_code);
        Ok(ExecutionOutcome::Failed {
            exit_code,
            stderr,
            classification,
        })
    }
}

impl TestExecutor for CompilerExecutor {
    async fn execute(&self, job: &TestJob) -> ExecutionOutcome {
        match self.run(job).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(test = %job.name, file = %job.key.path.display(), "{e}");
                ExecutionOutcome::HarnessFailed(e.to_string())
            }
        }
    }
}

/// Write the isolated variant of `job` to a fresh scratch file named after the original.
fn materialize(job: &TestJob) -> Result<NamedTempFile, HarnessError> {
    let mut scratch = tempfile::Builder::new()
        .prefix("unskip-")
        .suffix(&job.file_name())
        .tempfile()
        .map_err(HarnessError::Scratch)?;

    scratch
        .write_all(job.isolated_source().as_bytes())
        .and_then(|()| scratch.flush())
        .map_err(HarnessError::Scratch)?;

    Ok(scratch)
}

/// Numeric exit status; a signal-terminated process reports the negated signal number.
fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
