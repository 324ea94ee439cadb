// tests/followed_file.rs

use std::error::Error;
use std::fs;

use tf::fs::{FileIdentity, FollowedFile, OpenMode};
use tf_test_utils::{append, init_tracing, Scratch};

type TestResult = Result<(), Box<dyn Error>>;

fn read_all(file: &mut FollowedFile) -> std::io::Result<Vec<String>> {
    let mut lines = Vec::new();
    file.read_lines(|line| lines.push(line))?;
    Ok(lines)
}

#[test]
fn open_from_end_skips_history_and_from_start_replays_it() -> TestResult {
    init_tracing();
    let scratch = Scratch::new();
    let path = scratch.write("app.log", "one\ntwo\n");

    let mut tail = FollowedFile::open(&path, OpenMode::FromEnd)?;
    let mut replay = FollowedFile::open(&path, OpenMode::FromStart)?;

    assert!(read_all(&mut tail)?.is_empty());
    assert_eq!(read_all(&mut replay)?, vec!["one", "two"]);

    append(&path, "three\n");
    assert_eq!(read_all(&mut tail)?, vec!["three"]);
    assert_eq!(read_all(&mut replay)?, vec!["three"]);
    assert_eq!(replay.lines_read(), 2);
    Ok(())
}

#[test]
fn opening_a_missing_file_fails() {
    init_tracing();
    let scratch = Scratch::new();

    let err = FollowedFile::open(&scratch.path("missing.log"), OpenMode::FromEnd)
        .expect_err("missing file must not open");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn read_lines_reports_how_many_lines_it_emitted() -> TestResult {
    init_tracing();
    let scratch = Scratch::new();
    let path = scratch.write("app.log", "");
    let mut file = FollowedFile::open(&path, OpenMode::FromEnd)?;

    append(&path, "a\nb\nc");
    let mut seen = Vec::new();
    let count = file.read_lines(|line| seen.push(line))?;

    assert_eq!(count, 2);
    assert_eq!(seen, vec!["a", "b"]);
    assert_eq!(file.take_pending().as_deref(), Some("c"));
    assert_eq!(file.take_pending(), None);
    Ok(())
}

#[test]
fn empty_lines_and_carriage_returns_are_preserved_as_lines() -> TestResult {
    init_tracing();
    let scratch = Scratch::new();
    let path = scratch.write("app.log", "");
    let mut file = FollowedFile::open(&path, OpenMode::FromEnd)?;

    append(&path, "\n\r\nwindows\r\n  spaced  \n");

    assert_eq!(read_all(&mut file)?, vec!["", "", "windows", "  spaced  "]);
    Ok(())
}

#[test]
fn invalid_utf8_is_replaced_not_dropped() -> TestResult {
    init_tracing();
    let scratch = Scratch::new();
    let path = scratch.write("app.log", "");
    let mut file = FollowedFile::open(&path, OpenMode::FromEnd)?;

    let mut raw = fs::OpenOptions::new().append(true).open(&path)?;
    std::io::Write::write_all(&mut raw, b"ok \xff\xfe end\n")?;

    assert_eq!(read_all(&mut file)?, vec!["ok \u{fffd}\u{fffd} end"]);
    Ok(())
}

#[test]
fn truncation_resets_the_cursor_and_drops_the_partial_line() -> TestResult {
    init_tracing();
    let scratch = Scratch::new();
    let path = scratch.write("app.log", "");
    let mut file = FollowedFile::open(&path, OpenMode::FromEnd)?;

    append(&path, "before\nhalf");
    assert_eq!(read_all(&mut file)?, vec!["before"]);

    fs::write(&path, "after\n")?;

    assert_eq!(read_all(&mut file)?, vec!["after"]);
    assert_eq!(file.take_pending(), None);
    Ok(())
}

#[cfg(unix)]
#[test]
fn identity_tracks_the_file_not_the_name() -> TestResult {
    init_tracing();
    let scratch = Scratch::new();
    let path = scratch.write("app.log", "v1\n");
    let file = FollowedFile::open(&path, OpenMode::FromStart)?;

    assert!(file.is_same_file_as(&path));
    assert_eq!(file.identity(), FileIdentity::of_path(&path));

    // Appending keeps the identity, replacing does not.
    append(&path, "more\n");
    assert!(file.is_same_file_as(&path));

    fs::rename(&path, scratch.path("app.log.1"))?;
    assert!(!file.is_same_file_as(&path), "missing path is never the same file");

    scratch.write("app.log", "v2\n");
    assert!(!file.is_same_file_as(&path));
    assert!(file.is_same_file_as(&scratch.path("app.log.1")));
    Ok(())
}
