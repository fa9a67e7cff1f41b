//! Integration Test: Core Boundaries
//!
//! **Policy**: `brief-core` is headless and time-injected. It must not depend
//! on terminal libraries, sleep, or read a clock; production code in both
//! crates propagates errors instead of unwrapping.

use std::fs;

use architectural_enforcement::{assert_clean, find_violations, rust_sources, workspace_root};

#[test]
fn test_core_sources_exist() {
    let core = workspace_root().join("brief/core/src");
    assert!(!rust_sources(&core).is_empty(), "no sources under {}", core.display());
}

#[test]
fn test_core_has_no_terminal_dependencies() {
    let root = workspace_root();

    let violations = find_violations(&root.join("brief/core/src"), &["ratatui", "crossterm"]);
    assert_clean("Terminal library used in brief-core", &violations);

    let manifest = fs::read_to_string(root.join("brief/core/Cargo.toml")).unwrap();
    assert!(!manifest.contains("ratatui"));
    assert!(!manifest.contains("crossterm"));
}

#[test]
fn test_no_sleep_in_core() {
    let violations = find_violations(
        &workspace_root().join("brief/core/src"),
        &["::sleep(", ".sleep("],
    );
    assert_clean("Sleep call in brief-core", &violations);
}

#[test]
fn test_core_reads_no_clock() {
    let violations = find_violations(
        &workspace_root().join("brief/core/src"),
        &["Instant::now", "SystemTime::now"],
    );
    assert_clean("Clock read in brief-core", &violations);
}

#[test]
fn test_no_unwrap_in_production_code() {
    let root = workspace_root();
    for dir in ["brief/core/src", "tui/src"] {
        let violations = find_violations(&root.join(dir), &[".unwrap()", ".expect("]);
        assert_clean("Unwrap in production code", &violations);
    }
}
