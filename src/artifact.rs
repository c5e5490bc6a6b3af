//! The bubble collection snapshot (`bubbles.json`).
//!
//! The artifact is a single pretty-printed JSON array rewritten as a whole. Readers must treat it
//! as a point-in-time snapshot.

use crate::{config::SnapshotMode, error::MindseyeError, properties::Bubble};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct BubbleArtifact {
    path: PathBuf,
}

impl BubbleArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BubbleArtifact { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Vec<Bubble>, MindseyeError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Number of records in the artifact. Absent or unreadable artifacts count as zero.
    pub fn len(&self) -> usize {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<Vec<serde_json::Value>>(&content).ok())
            .map(|records| records.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the artifact with `bubbles`.
    ///
    /// The JSON is written to a sibling temp file and renamed into place.
    pub fn write(&self, bubbles: &[Bubble]) -> Result<(), MindseyeError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(bubbles)?;
        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Commit a run's new bubbles according to `mode` and return the resulting artifact length.
    pub fn commit(&self, new: &[Bubble], mode: SnapshotMode) -> Result<usize, MindseyeError> {
        let snapshot = match mode {
            SnapshotMode::Overwrite => new.to_vec(),
            SnapshotMode::Accumulate => {
                let existing = if self.exists() {
                    self.load().unwrap_or_else(|e| {
                        tracing::warn!(
                            "[Artifact] Existing bubbles at {:?} could not be read and will be replaced: {}",
                            self.path,
                            e
                        );
                        Vec::new()
                    })
                } else {
                    Vec::new()
                };
                merge_by_source(existing, new)
            }
        };
        self.write(&snapshot)?;
        Ok(snapshot.len())
    }
}

/// Union of `existing` and `new`, keyed by `source`. New bubbles replace existing ones with the
/// same source; existing bubbles without a source are kept as-is.
pub fn merge_by_source(existing: Vec<Bubble>, new: &[Bubble]) -> Vec<Bubble> {
    let replaced: BTreeSet<&str> = new.iter().map(|b| b.source.as_str()).collect();
    let mut merged: Vec<Bubble> = existing
        .into_iter()
        .filter(|b| b.source.is_empty() || !replaced.contains(b.source.as_str()))
        .collect();
    merged.extend_from_slice(new);
    merged
}
