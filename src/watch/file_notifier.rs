// src/watch/file_notifier.rs

//! Classification of raw `notify` events for watched files.

use std::collections::HashSet;
use std::path::PathBuf;

use notify::event::ModifyKind;
use notify::{Event, EventKind};

use crate::watch::notifier::{ChangeEvent, ChangeKind};

/// Map a raw event kind onto the file-scope [`ChangeKind`]s.
pub fn file_change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::DataWritten
        }
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
        EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::MetadataChanged,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => ChangeKind::Other,
    }
}

/// Turn one raw event into typed changes for the registered files it touches.
pub fn classify(event: &Event, registered: &HashSet<PathBuf>) -> Vec<ChangeEvent> {
    let kind = file_change_kind(&event.kind);

    event
        .paths
        .iter()
        .filter(|path| registered.contains(*path))
        .map(|path| ChangeEvent::new(path.clone(), kind))
        .collect()
}
