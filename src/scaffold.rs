//! Conventional evidence-root layout with a handful of sample documents.

use crate::error::MindseyeError;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Subdirectories created under a fresh evidence root.
pub const EVIDENCE_SUBDIRS: [&str; 3] = ["images", "documents", "reports"];

/// Sample documents written by [`init_evidence_root`], as (relative path, content).
pub const SAMPLE_FILES: [(&str, &str); 4] = [
    (
        "sample_incident.txt",
        "Sample incident report for testing the Mindseye system.",
    ),
    (
        "patient_notes.md",
        "# Patient Notes\n\nThis is a sample patient documentation file.",
    ),
    (
        "safety_protocol.txt",
        "Safety protocol documentation for healthcare workers.",
    ),
    (
        "reports/quarterly_summary.md",
        "# Quarterly Summary\n\nSummary of activities and incidents.",
    ),
];

/// Create the evidence root, its conventional subdirectories and the sample documents.
///
/// Existing files are left untouched. Returns the files actually created.
pub fn init_evidence_root<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, MindseyeError> {
    let root = root.as_ref();
    fs::create_dir_all(root)?;
    for sub in EVIDENCE_SUBDIRS {
        fs::create_dir_all(root.join(sub))?;
    }
    tracing::info!("[Scaffold] Created evidence structure at {:?}", root);

    let mut created = Vec::new();
    for (relative, content) in SAMPLE_FILES {
        let path = root.join(relative);
        if path.exists() {
            tracing::debug!("[Scaffold] Keeping existing {:?}", path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        tracing::info!("[Scaffold] Created {}", relative);
        created.push(path);
    }
    Ok(created)
}
