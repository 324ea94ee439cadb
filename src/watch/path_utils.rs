// src/watch/path_utils.rs

//! Utility functions for path handling in the notifiers.

use std::path::{Path, PathBuf};

/// Resolve a user-supplied path into the absolute form the notifiers report.
///
/// The parent directory is canonicalized (so `./logs/app.log`, symlinked
/// temp dirs and `/private/var/...` prefixes on macOS all line up with what
/// the OS watcher emits) but the file name is kept as given: the file may not
/// exist yet, and a symlink that gets re-pointed must keep being followed by
/// name.
pub fn follow_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let resolved = match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => parent.canonicalize().ok().map(|dir| dir.join(name)),
        _ => None,
    };
    resolved.unwrap_or(absolute)
}

/// Directory to watch for (re)creation of `path`.
pub fn parent_dir(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
