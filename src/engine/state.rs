// src/engine/state.rs

//! Tailer-owned bookkeeping: which paths are interesting and which handles
//! are open. Only the tailer mutates these.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::fs::FollowedFile;

/// Paths being followed and the directories watched on their behalf.
///
/// Both sets only ever grow: a path stays interesting after its file
/// disappears, and a directory may host a future rotation of any file in it.
#[derive(Debug, Default)]
pub struct WatchSet {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `path` was not interesting before.
    pub fn add_file(&mut self, path: &Path) -> bool {
        self.files.insert(path.to_path_buf())
    }

    /// Returns `true` if `dir` was not watched before.
    pub fn add_dir(&mut self, dir: &Path) -> bool {
        self.dirs.insert(dir.to_path_buf())
    }

    pub fn is_interesting(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn is_dir_watched(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }
}

/// At most one open handle per followed path.
#[derive(Debug, Default)]
pub struct HandleTable {
    open: HashMap<PathBuf, FollowedFile>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&FollowedFile> {
        self.open.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut FollowedFile> {
        self.open.get_mut(path)
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.open.contains_key(path)
    }

    /// Take the handle for `path` out of the table. Dropping it closes it.
    pub fn remove(&mut self, path: &Path) -> Option<FollowedFile> {
        self.open.remove(path)
    }

    /// Install `file` under its own path.
    ///
    /// Callers remove (and close) any previous handle first; should one still
    /// be present it is returned rather than leaked.
    pub fn insert(&mut self, file: FollowedFile) -> Option<FollowedFile> {
        self.open.insert(file.path().to_path_buf(), file)
    }

    pub fn count(&self) -> usize {
        self.open.len()
    }

    /// Close every handle. Returns how many were open.
    pub fn close_all(&mut self) -> usize {
        let count = self.open.len();
        self.open.clear();
        count
    }
}
