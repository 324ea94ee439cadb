// src/fs/identity.rs

use std::fs::{self, File, Metadata};
use std::path::Path;

/// Identity of the file behind a handle or path: device plus inode.
///
/// Only available on Unix; elsewhere every lookup yields `None` and callers
/// treat the file as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;

        Some(Self {
            dev: meta.dev(),
            ino: meta.ino(),
        })
    }

    #[cfg(not(unix))]
    pub fn from_metadata(_meta: &Metadata) -> Option<Self> {
        None
    }

    pub fn of_file(file: &File) -> Option<Self> {
        file.metadata().ok().as_ref().and_then(Self::from_metadata)
    }

    pub fn of_path(path: &Path) -> Option<Self> {
        fs::metadata(path).ok().as_ref().and_then(Self::from_metadata)
    }
}
