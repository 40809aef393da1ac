//! CLI module for unskip
//!
//! ## Usage
//!
//! - `unskip <COMPILER> <PATH>` - run outstanding tests and rewrite their skip lines
//! - `unskip <COMPILER> <PATH> --todo` - count outstanding tests per file, run nothing
//! - `unskip <COMPILER> <PATH> --recheck` - also re-run tests that already pass
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `reporter` - Console output
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod reporter;

use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use crate::corpus::DEFAULT_EXTENSION;
use crate::harness::config::{DEFAULT_INCLUDE_DIR, DEFAULT_LIB_DIR, DEFAULT_TARGET, DEFAULT_TIMEOUT_SECS};
use crate::harness::HarnessConfig;
use crate::version::UNSKIP_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run skipped compiler behavior tests and remove the skip lines of those that now pass
#[derive(Parser, Debug)]
#[command(name = "unskip")]
#[command(version = UNSKIP_VERSION)]
#[command(about = "Remove backend skip lines from behavior tests that now pass", long_about = None)]
pub struct Cli {
    /// Compiler binary used to run and format tests
    #[arg(value_name = "COMPILER")]
    pub compiler: PathBuf,

    /// Test file, or directory searched recursively for test files
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Print the number of outstanding tests per file and exit
    #[arg(long)]
    pub todo: bool,

    /// Also re-run tests that currently pass
    #[arg(long)]
    pub recheck: bool,

    /// Maximum number of concurrent compiler processes (default: available parallelism)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Per-test time budget in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Target triple passed to the compiler
    #[arg(long, value_name = "TRIPLE", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Include directory passed to the compiler
    #[arg(long, value_name = "DIR", default_value = DEFAULT_INCLUDE_DIR)]
    pub include_dir: PathBuf,

    /// Library directory passed to the compiler
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LIB_DIR)]
    pub lib_dir: PathBuf,

    /// Extension of test files when PATH is a directory
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

impl Cli {
    /// Harness configuration described by these arguments.
    pub fn harness_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new(&self.compiler)
            .with_target(&self.target)
            .with_include_dir(&self.include_dir)
            .with_lib_dir(&self.lib_dir)
            .with_timeout(Duration::from_secs(self.timeout));
        if let Some(jobs) = self.jobs {
            config = config.with_jobs(jobs);
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if !cli.path.exists() {
        return Err(CliError::failure(format!(
            "Error: no such file or directory: {}",
            cli.path.display()
        )));
    }

    if cli.todo {
        return commands::report_outstanding(&cli.path, &cli.extension, cli.recheck);
    }

    if !compiler_exists(&cli.compiler) {
        return Err(CliError::failure(format!(
            "Error: compiler not found: {}",
            cli.compiler.display()
        )));
    }

    let config = cli.harness_config();
    commands::update_tests(config, &cli.path, &cli.extension, cli.recheck)
}

/// Whether `compiler` names an existing file, looking it up on `PATH` when it is a bare name.
fn compiler_exists(compiler: &Path) -> bool {
    if compiler.components().count() > 1 || compiler.is_absolute() {
        return compiler.is_file();
    }
    env::var_os("PATH").is_some_and(|paths| env::split_paths(&paths).any(|dir| dir.join(compiler).is_file()))
        || compiler.is_file()
}

// ============================================================================
// Tests
// ============================================================================
