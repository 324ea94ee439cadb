// tests/notifier_classify.rs

use std::collections::HashSet;
use std::path::PathBuf;

use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use notify::{Event, EventKind};
use tf::watch::{dir_notifier, file_notifier, ChangeEvent, ChangeKind};
use tf_test_utils::{init_tracing, Scratch};

fn registered(paths: &[&str]) -> HashSet<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}

#[test]
fn file_kinds_map_writes_renames_and_removals() {
    init_tracing();
    let cases = [
        (EventKind::Modify(ModifyKind::Data(DataChange::Content)), ChangeKind::DataWritten),
        (EventKind::Modify(ModifyKind::Any), ChangeKind::DataWritten),
        (EventKind::Modify(ModifyKind::Name(RenameMode::From)), ChangeKind::Renamed),
        (EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)), ChangeKind::MetadataChanged),
        (EventKind::Remove(RemoveKind::File), ChangeKind::Removed),
        (EventKind::Create(CreateKind::File), ChangeKind::Other),
        (EventKind::Access(AccessKind::Any), ChangeKind::Other),
    ];

    for (kind, expected) in cases {
        assert_eq!(file_notifier::file_change_kind(&kind), expected, "{kind:?}");
    }
}

#[test]
fn file_events_are_reported_only_for_registered_files() {
    init_tracing();
    let watched = registered(&["/logs/app.log"]);
    let event = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Any)))
        .add_path(PathBuf::from("/logs/app.log"))
        .add_path(PathBuf::from("/logs/other.log"));

    let changes = file_notifier::classify(&event, &watched);

    assert_eq!(
        changes,
        vec![ChangeEvent::new("/logs/app.log", ChangeKind::DataWritten)]
    );
}

#[test]
fn dir_creation_and_rename_targets_count_as_arrivals() {
    init_tracing();
    let entry = PathBuf::from("/logs/app.log");

    assert_eq!(
        dir_notifier::dir_change_kind(&EventKind::Create(CreateKind::File), &entry),
        ChangeKind::Created
    );
    assert_eq!(
        dir_notifier::dir_change_kind(
            &EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &entry
        ),
        ChangeKind::RenamedIn
    );
    assert_eq!(
        dir_notifier::dir_change_kind(
            &EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &entry
        ),
        ChangeKind::Renamed
    );
    assert_eq!(
        dir_notifier::dir_change_kind(&EventKind::Remove(RemoveKind::Any), &entry),
        ChangeKind::Removed
    );
}

#[test]
fn ambiguous_renames_are_resolved_by_whether_the_entry_exists() {
    init_tracing();
    let scratch = Scratch::new();
    let present = scratch.write("present.log", "");
    let absent = scratch.path("absent.log");
    let kind = EventKind::Modify(ModifyKind::Name(RenameMode::Any));

    assert_eq!(dir_notifier::dir_change_kind(&kind, &present), ChangeKind::RenamedIn);
    assert_eq!(dir_notifier::dir_change_kind(&kind, &absent), ChangeKind::Renamed);
}

#[test]
fn dir_events_are_reported_per_entry_of_registered_directories() {
    init_tracing();
    let watched = registered(&["/logs"]);
    let event = Event::new(EventKind::Create(CreateKind::File))
        .add_path(PathBuf::from("/logs/app.log"))
        .add_path(PathBuf::from("/elsewhere/app.log"))
        .add_path(PathBuf::from("/logs/nested/deep.log"));

    let changes = dir_notifier::classify(&event, &watched);

    assert_eq!(
        changes,
        vec![ChangeEvent::new("/logs/app.log", ChangeKind::Created)]
    );
}

#[test]
fn paired_rename_reports_both_halves() {
    init_tracing();
    let watched = registered(&["/logs"]);
    let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
        .add_path(PathBuf::from("/logs/app.log.tmp"))
        .add_path(PathBuf::from("/logs/app.log"));

    let changes = dir_notifier::classify(&event, &watched);

    assert_eq!(
        changes,
        vec![
            ChangeEvent::new("/logs/app.log.tmp", ChangeKind::Renamed),
            ChangeEvent::new("/logs/app.log", ChangeKind::RenamedIn),
        ]
    );
}

#[test]
fn paired_rename_from_an_unwatched_directory_reports_only_the_arrival() {
    init_tracing();
    let watched = registered(&["/logs"]);
    let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
        .add_path(PathBuf::from("/staging/app.log"))
        .add_path(PathBuf::from("/logs/app.log"));

    let changes = dir_notifier::classify(&event, &watched);

    assert_eq!(
        changes,
        vec![ChangeEvent::new("/logs/app.log", ChangeKind::RenamedIn)]
    );
}
