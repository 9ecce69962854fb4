//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The engine core stays headless (no terminal, window or async runtime)
//! - Time only enters the core through `tick(dt)`
//! - No sleeping in production code outside timed playback
//!
//! The helpers here walk the workspace sources; the rules live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Every `.rs` file under a workspace-relative directory
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Production code lines of a file: `(line number, code)`
///
/// Comments are stripped and everything from the first `#[cfg(test)]` on
/// is skipped (test modules sit at the bottom of each file).
pub fn code_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter_map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line).trim();
            (!code.is_empty()).then(|| (idx + 1, code.to_string()))
        })
        .collect()
}

/// Lines in `files` whose code contains any of `needles`
pub fn find_violations(files: &[PathBuf], needles: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for path in files {
        for (line_number, code) in code_lines(path) {
            if let Some(needle) = needles.iter().find(|n| code.contains(**n)) {
                violations.push(format!(
                    "{}:{line_number}: `{needle}` in `{code}`",
                    path.display()
                ));
            }
        }
    }
    violations
}
