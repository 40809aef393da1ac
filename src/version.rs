//! Tool version information.
//!
//! Exposed as a single constant so the CLI `--version` output and any logged run headers agree on the same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The unskip version string (for example, `0.1.0-alpha.1`).
pub const UNSKIP_VERSION: &str = env!("CARGO_PKG_VERSION");
