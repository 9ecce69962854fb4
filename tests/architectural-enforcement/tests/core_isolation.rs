//! Integration Test: Headless Core
//!
//! The engine core must run identically under a terminal, a desktop window
//! or a test harness. It may not reach for a surface, a runtime or the
//! wall clock; hosts hand it everything through `Host` and `tick(dt)`.

use std::fs;

use architectural_enforcement::{find_violations, rust_files, workspace_root};

#[test]
fn test_core_sources_exist() {
    assert!(
        !rust_files("companion/core/src").is_empty(),
        "no core sources found under {}",
        workspace_root().display()
    );
}

#[test]
fn test_core_has_no_surface_or_runtime_imports() {
    let violations = find_violations(
        &rust_files("companion/core/src"),
        &["ratatui", "crossterm", "tokio", "futures::"],
    );
    assert!(
        violations.is_empty(),
        "core must stay headless:\n  {}",
        violations.join("\n  ")
    );
}

#[test]
fn test_core_manifest_has_no_surface_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("companion/core/Cargo.toml"))
        .expect("core manifest");
    for forbidden in ["ratatui", "crossterm", "tokio"] {
        assert!(
            !manifest.contains(forbidden),
            "companion-core must not depend on {forbidden}"
        );
    }
}

#[test]
fn test_core_never_reads_the_clock() {
    let violations = find_violations(
        &rust_files("companion/core/src"),
        &["Instant::now", "SystemTime::now", "::sleep("],
    );
    assert!(
        violations.is_empty(),
        "time must come from tick(dt):\n  {}",
        violations.join("\n  ")
    );
}

#[test]
fn test_tui_only_sleeps_to_time_playback() {
    let files: Vec<_> = rust_files("tui/src")
        .into_iter()
        .filter(|p| !p.ends_with("host.rs"))
        .collect();
    let violations = find_violations(&files, &["thread::sleep", "time::sleep("]);
    assert!(
        violations.is_empty(),
        "frame pacing uses tokio::time::interval:\n  {}",
        violations.join("\n  ")
    );
}
