//! Harness configuration.
//!
//! Everything the execution step needs from the command line is gathered here and handed to the executor explicitly.

use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default `-target` triple passed to the compiler.
pub const DEFAULT_TARGET: &str = "riscv64-linux";
/// Default include directory (`-I`), relative to the working directory.
pub const DEFAULT_INCLUDE_DIR: &str = "../test";
/// Default library directory (`--lib-dir`), relative to the working directory.
pub const DEFAULT_LIB_DIR: &str = "../../lib";
/// Default per-test time budget, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for compiler invocations
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Compiler binary
    pub compiler: PathBuf,
    /// Target triple
    pub target: String,
    /// Include directory
    pub include_dir: PathBuf,
    /// Library directory
    pub lib_dir: PathBuf,
    /// Per-test time budget
    pub timeout: Duration,
    /// Maximum number of compiler processes alive at once
    pub jobs: NonZeroUsize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from("zig"),
            target: DEFAULT_TARGET.to_string(),
            include_dir: PathBuf::from(DEFAULT_INCLUDE_DIR),
            lib_dir: PathBuf::from(DEFAULT_LIB_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            jobs: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl HarnessConfig {
    /// Create a config for `compiler` with default settings
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
            ..Self::default()
        }
    }

    /// Set the target triple
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the include directory
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = dir.into();
        self
    }

    /// Set the library directory
    pub fn with_lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dir = dir.into();
        self
    }

    /// Set the per-test time budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pool size
    pub fn with_jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Arguments for running the tests in `file`.
    ///
    /// `test <file> -target <target> -fno-llvm -fno-lld -I<include> --lib-dir <lib>`
    pub fn test_args(&self, file: &Path) -> Vec<OsString> {
        let mut include = OsString::from("-I");
        include.push(&self.include_dir);

        vec![
            OsString::from("test"),
            file.as_os_str().to_os_string(),
            OsString::from("-target"),
            OsString::from(&self.target),
            OsString::from("-fno-llvm"),
            OsString::from("-fno-lld"),
            include,
            OsString::from("--lib-dir"),
            self.lib_dir.as_os_str().to_os_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let config = HarnessConfig::new("/opt/zig/zig");
        let args = config.test_args(Path::new("/tmp/unskip-abc-basic.zig"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "test",
                "/tmp/unskip-abc-basic.zig",
                "-target",
                "riscv64-linux",
                "-fno-llvm",
                "-fno-lld",
                "-I../test",
                "--lib-dir",
                "../../lib",
            ]
        );
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.compiler, PathBuf::from("/opt/zig/zig"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = HarnessConfig::new("zig")
            .with_target("riscv64-freestanding")
            .with_include_dir("inc")
            .with_lib_dir("lib")
            .with_timeout(Duration::from_millis(250))
            .with_jobs(NonZeroUsize::new(3).unwrap());
        let args = config.test_args(Path::new("t.zig"));
        assert_eq!(args[3], "riscv64-freestanding");
        assert_eq!(args[6], "-Iinc");
        assert_eq!(args[8], "lib");
        assert_eq!(config.jobs.get(), 3);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
