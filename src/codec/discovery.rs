use crate::paths::has_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively list evidence files under `root` whose extension is in `extensions`.
///
/// Files are ordered by their path components, so repeated runs over an
/// unchanged tree visit files identically. A missing root is not an error: it is logged and
/// yields no files, since callers may still be creating the directory. Unreadable entries are
/// logged and skipped.
pub fn scan_evidence_files<P: AsRef<Path>>(root: P, extensions: &[String]) -> Vec<PathBuf> {
    let root = root.as_ref();
    if !root.exists() {
        tracing::warn!(
            "[Discovery] Evidence root directory {:?} does not exist",
            root
        );
        return Vec::new();
    }

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("[Discovery] Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extensions))
        .collect::<Vec<PathBuf>>();
    files.sort_by(|a, b| a.components().cmp(b.components()));

    tracing::info!("[Discovery] Found {} evidence files", files.len());
    files
}
