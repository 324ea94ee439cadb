// src/watch/dir_notifier.rs

//! Classification of raw `notify` events for watched directories.
//!
//! Directory watches exist to notice a followed file (re)appearing, either
//! created in place or renamed into place. Each event is reported for the
//! *entry* path, and only when its parent directory is registered.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

use crate::watch::notifier::{ChangeEvent, ChangeKind};

/// Map a raw event kind onto the directory-scope [`ChangeKind`] for `entry`.
///
/// Backends that cannot tell the two halves of a rename apart
/// (`RenameMode::Any`) are resolved by checking whether `entry` exists now.
pub fn dir_change_kind(kind: &EventKind, entry: &Path) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::To))
        | EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => ChangeKind::RenamedIn,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::Renamed,
        EventKind::Modify(ModifyKind::Name(_)) => {
            if entry.exists() {
                ChangeKind::RenamedIn
            } else {
                ChangeKind::Renamed
            }
        }
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::DataWritten
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::MetadataChanged,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => ChangeKind::Other,
    }
}

fn inside_registered(entry: &Path, registered: &HashSet<PathBuf>) -> bool {
    entry
        .parent()
        .map(|dir| registered.contains(dir))
        .unwrap_or(false)
}

/// Turn one raw event into typed changes for entries of registered directories.
pub fn classify(event: &Event, registered: &HashSet<PathBuf>) -> Vec<ChangeEvent> {
    // `Both` carries `[from, to]`: the source moved away, the target arrived.
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        let mut changes = Vec::with_capacity(2);
        if let Some(from) = event.paths.first() {
            if inside_registered(from, registered) {
                changes.push(ChangeEvent::new(from.clone(), ChangeKind::Renamed));
            }
        }
        if let Some(to) = event.paths.get(1) {
            if inside_registered(to, registered) {
                changes.push(ChangeEvent::new(to.clone(), ChangeKind::RenamedIn));
            }
        }
        return changes;
    }

    event
        .paths
        .iter()
        .filter(|entry| inside_registered(entry, registered))
        .map(|entry| ChangeEvent::new(entry.clone(), dir_change_kind(&event.kind, entry)))
        .collect()
}
