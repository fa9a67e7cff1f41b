//! Architectural Enforcement Helpers
//!
//! Source scanning used by the integration tests in `tests/` to enforce
//! the workspace boundaries:
//! - The core crate never touches a terminal library
//! - The core crate never sleeps or reads a clock
//! - Production code propagates errors instead of unwrapping
//!
//! Scans are line-based. Comments are ignored, and everything from a
//! file's `#[cfg(test)]` marker onwards counts as test code, matching the
//! convention of keeping unit tests at the bottom of each module.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the match
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text)
    }
}

/// Root of the workspace this crate lives in
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("../.."))
}

/// Every `.rs` file under `dir`, sorted
#[must_use]
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Code lines before the test module, with comments removed
///
/// Returns `(line_number, code)` pairs; blank results are skipped.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }
        let code = line.split("//").next().unwrap_or(line).trim();
        if !code.is_empty() {
            lines.push((idx + 1, code));
        }
    }
    lines
}

/// Production lines under `dir` containing any of `patterns`
#[must_use]
pub fn find_violations(dir: &Path, patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_sources(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, code) in production_lines(&content) {
            if patterns.iter().any(|p| code.contains(p)) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.to_string(),
                });
            }
        }
    }
    violations
}

/// Panic with a readable report when `violations` is not empty
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    let report: Vec<String> = violations.iter().map(|v| format!("  {v}")).collect();
    panic!(
        "{rule}: {} violation(s)\n{}",
        violations.len(),
        report.join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let source = "fn a() {}\n// note .unwrap()\nlet x = y; // trailing\n\n#[cfg(test)]\nmod tests { x.unwrap(); }\n";
        assert_eq!(
            production_lines(source),
            vec![(1, "fn a() {}"), (3, "let x = y;")]
        );
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_violation_display() {
        let v = Violation {
            path: PathBuf::from("src/lib.rs"),
            line: 7,
            text: "x.unwrap();".to_string(),
        };
        assert_eq!(v.to_string(), "src/lib.rs:7: x.unwrap();");
    }
}
