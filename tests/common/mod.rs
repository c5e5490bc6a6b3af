//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Create an evidence root with `a.txt` and `notes/b.md`, plus an empty output directory.
///
/// Returns `(evidence_root, output_dir)`, both under `temp_dir`.
///
/// `a.txt` cites two https links; `notes/b.md` is a short markdown note with none.
#[allow(dead_code)]
pub fn create_test_evidence(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let root = temp_dir.path().join("evidence");
    let out = temp_dir.path().join("out");
    std::fs::create_dir_all(root.join("notes")).unwrap();
    std::fs::create_dir_all(&out).unwrap();

    std::fs::write(
        root.join("a.txt"),
        "see https://x.com/p and https://y.org",
    )
    .unwrap();

    let b = r#"# Shift handover

Nothing unusual reported.
"#;
    std::fs::write(root.join("notes").join("b.md"), b).unwrap();

    (root, out)
}
