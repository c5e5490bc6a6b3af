//! Path helpers shared by discovery, the ledger and bubble assembly.
//!
//! Ledger rows and bubble `source` fields identify evidence by its path relative to the evidence
//! root, always `/` separated so the artifacts read the same on every platform.

use std::{
    borrow::Cow,
    path::{Component, Path},
};

use crate::error::MindseyeError;

/// Replace separators and convert to unicode (via to_string_lossy) on an os path.
pub fn os_path_to_string<P: AsRef<Path>>(os_path_ref: P) -> String {
    let res = os_path_ref
        .as_ref()
        .components()
        .filter_map(|c| match c {
            Component::RootDir => Some(Cow::from("")),
            Component::CurDir => None,
            _ => Some(c.as_os_str().to_string_lossy()),
        })
        .collect::<Vec<_>>()
        .join("/");
    tracing::trace!(
        "os_path_to_string: turned {:?} into {}",
        os_path_ref.as_ref(),
        res
    );
    res
}

/// The dedup key for `path`: its location relative to `root`, `/` separated.
pub fn relative_key(root: &Path, path: &Path) -> Result<String, MindseyeError> {
    let relative = path.strip_prefix(root)?;
    Ok(os_path_to_string(relative))
}

/// Extension-less basename, used as the bubble title and the companion image name.
pub fn file_stem_string(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Case-insensitive extension check against a list of bare extensions (`"md"`, not `".md"`).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
