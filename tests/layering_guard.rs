//! Layering guardrails to keep the helper crates free of IO.
//!
//! `unskip_core` is a vocabulary crate and takes no dependencies at all. `unskip_syntax` may use `unskip_core`,
//! `thiserror` and `tracing`, but nothing that spawns processes or touches the filesystem.
//! These tests scan the crates' `Cargo.toml` files and fail if that changes.

/// Dependency names declared in the `[dependencies]` table of `manifest`.
fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut deps = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            deps.push(name.trim().to_string());
        }
    }

    deps
}

#[test]
fn core_crate_has_no_dependencies() {
    let deps = main_dependencies(include_str!("../crates/unskip_core/Cargo.toml"));
    assert!(deps.is_empty(), "`unskip_core` must stay dependency-free, found {deps:?}");
}

#[test]
fn syntax_crate_does_no_io() {
    const ALLOWED: &[&str] = &["unskip_core", "thiserror", "tracing"];
    for dep in main_dependencies(include_str!("../crates/unskip_syntax/Cargo.toml")) {
        assert!(
            ALLOWED.contains(&dep.as_str()),
            "`{dep}` must not appear in unskip_syntax [dependencies]; IO belongs in the unskip crate"
        );
    }
}

#[test]
fn dependency_scan_reads_only_the_dependencies_table() {
    let manifest = "[package]\nname = \"x\"\n\n[dependencies]\na = \"1\" # note\nb = { path = \"../b\" }\n\n[dev-dependencies]\nc = \"1\"\n";
    assert_eq!(main_dependencies(manifest), ["a", "b"]);
}
