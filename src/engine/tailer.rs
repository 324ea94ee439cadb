// src/engine/tailer.rs

//! The tailer: per-path state machine behind `tf`.
//!
//! Each followed path moves through:
//!
//! ```text
//! unopened -> seeking (opened at EOF) -> streaming -> reopening -> streaming
//! ```
//!
//! - [`Tailer::add_file`] makes a path interesting, opens it at EOF when it
//!   exists, and registers watches on the file and its parent directory.
//! - File-scope `DataWritten` events read whatever complete lines are new.
//! - Directory-scope `Created` / `RenamedIn` events for an interesting path
//!   reopen it from offset 0 and replay the new file.
//!
//! Every emitted line pulses the idle timer once before it reaches the sink.
//! Nothing here is async: the runtime calls in serially, one event at a time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::engine::state::{HandleTable, WatchSet};
use crate::engine::TailEvent;
use crate::fs::{FollowedFile, OpenMode};
use crate::idle::IdleTimer;
use crate::output::LineSink;
use crate::watch::{follow_path, parent_dir, ChangeEvent, ChangeKind, WatchRegistry};

/// Observable state of one followed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    /// Interesting, but no handle is open (file missing or unreadable).
    Unopened,
    /// Opened at EOF; no new line has arrived yet.
    Seeking,
    /// Handing out new lines as they are appended.
    Streaming,
}

/// Owns the watch sets, the open-handle table and the idle timer, and reacts
/// to change events from both notifiers.
pub struct Tailer<N: WatchRegistry> {
    watch_set: WatchSet,
    handles: HandleTable,
    file_notifier: N,
    dir_notifier: N,
    idle: IdleTimer,
    sink: Arc<dyn LineSink>,
    closed: bool,
}

impl<N: WatchRegistry> std::fmt::Debug for Tailer<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tailer")
            .field("watch_set", &self.watch_set)
            .field("handles", &self.handles)
            .field("idle", &self.idle)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Pulse the idle timer, then hand the line to the sink.
fn emit_line(idle: &IdleTimer, sink: &dyn LineSink, line: &str) {
    idle.pulse();
    sink.line(line);
}

impl<N: WatchRegistry> Tailer<N> {
    pub fn new(file_notifier: N, dir_notifier: N, idle: IdleTimer, sink: Arc<dyn LineSink>) -> Self {
        Self {
            watch_set: WatchSet::new(),
            handles: HandleTable::new(),
            file_notifier,
            dir_notifier,
            idle,
            sink,
            closed: false,
        }
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    pub fn open_handle_count(&self) -> usize {
        self.handles.count()
    }

    pub fn idle(&self) -> &IdleTimer {
        &self.idle
    }

    /// Whether `path` has an open handle.
    pub fn is_open(&self, path: &Path) -> bool {
        self.handles.is_open(path)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// State of `path`, or `None` if it was never added.
    pub fn state_of(&self, path: &Path) -> Option<FollowState> {
        if !self.watch_set.is_interesting(path) {
            return None;
        }
        Some(match self.handles.get(path) {
            None => FollowState::Unopened,
            Some(file) if file.mode() == OpenMode::FromEnd && file.lines_read() == 0 => {
                FollowState::Seeking
            }
            Some(_) => FollowState::Streaming,
        })
    }

    /// Start following `path`. Returns the resolved absolute path that
    /// events will be reported under.
    ///
    /// A missing or unreadable file is not an error: the path stays
    /// interesting and is picked up when it is created.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> PathBuf {
        let path = follow_path(path.as_ref());

        if !self.watch_set.add_file(&path) {
            debug!(?path, "already following");
            return path;
        }

        match FollowedFile::open(&path, OpenMode::FromEnd) {
            Ok(file) => {
                self.handles.insert(file);
            }
            Err(err) => {
                debug!(?path, error = %err, "not opened yet; waiting for it to be created");
            }
        }

        if let Err(err) = self.file_notifier.watch(&path) {
            // Typically ENOENT; the directory watch covers creation.
            debug!(?path, error = %err, "could not watch file yet");
        }

        if let Some(dir) = parent_dir(&path) {
            if self.watch_set.add_dir(&dir) {
                if let Err(err) = self.dir_notifier.watch(&dir) {
                    warn!(
                        ?dir,
                        error = %err,
                        "cannot watch directory; files created in it will go unnoticed"
                    );
                }
            }
        }

        info!(?path, state = ?self.state_of(&path), "following");
        path
    }

    pub fn add_files<I, P>(&mut self, paths: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths.into_iter().map(|p| self.add_file(p)).collect()
    }

    /// Handle a single runtime event. Returns whether the runtime should keep
    /// running.
    pub fn handle(&mut self, event: TailEvent) -> bool {
        match event {
            TailEvent::File(change) => self.on_file_event(change),
            TailEvent::Dir(change) => self.on_dir_event(change),
            TailEvent::ShutdownRequested => return false,
        }
        true
    }

    /// React to a change on a followed file.
    pub fn on_file_event(&mut self, event: ChangeEvent) {
        let ChangeEvent { path, kind } = event;

        match kind {
            ChangeKind::DataWritten => {
                if self.handles.is_open(&path) {
                    self.read_available(&path);
                } else {
                    // Lost the race against removal; the creation event that
                    // follows will reopen and replay.
                    debug!(?path, "write on a path with no open handle; dropping");
                }
            }
            ChangeKind::Renamed | ChangeKind::Removed => {
                debug!(?path, ?kind, "followed file moved away; waiting for a new one");
            }
            ChangeKind::MetadataChanged
            | ChangeKind::Created
            | ChangeKind::RenamedIn
            | ChangeKind::Other => {
                trace!(?path, ?kind, "ignoring file event");
            }
        }
    }

    /// React to a change inside a watched directory.
    pub fn on_dir_event(&mut self, event: ChangeEvent) {
        let ChangeEvent { path, kind } = event;

        if !self.watch_set.is_interesting(&path) {
            trace!(?path, ?kind, "ignoring event for unfollowed entry");
            return;
        }

        match kind {
            ChangeKind::Created | ChangeKind::RenamedIn => self.reopen(&path),
            _ => trace!(?path, ?kind, "ignoring directory event"),
        }
    }

    /// Replace the handle for `path` with a fresh one at offset 0 and replay.
    fn reopen(&mut self, path: &Path) {
        if let Some(current) = self.handles.get(path) {
            if current.is_same_file_as(path) {
                debug!(?path, "already following this file; ignoring duplicate creation");
                return;
            }
        }

        let file = match FollowedFile::open(path, OpenMode::FromStart) {
            Ok(file) => file,
            Err(err) => {
                debug!(?path, error = %err, "reopen failed; waiting for the next creation");
                return;
            }
        };

        if let Some(previous) = self.handles.remove(path) {
            self.drain(previous);
        }

        // Register before the first read so nothing written in between is
        // missed: it is either read now or reported afterwards.
        if let Err(err) = self.file_notifier.rewatch(path) {
            warn!(?path, error = %err, "failed to re-register file watch");
        }

        self.handles.insert(file);
        info!(?path, "reopened; replaying from start");

        self.read_available(path);
    }

    /// Finish a handle that is being replaced: whatever was written to the old
    /// file before its write event reached us is still emitted, followed by
    /// its unterminated tail.
    fn drain(&self, mut previous: FollowedFile) {
        let idle = &self.idle;
        let sink = self.sink.as_ref();
        let path = previous.path().to_path_buf();

        match previous.read_lines(|line| emit_line(idle, sink, &line)) {
            Ok(0) => {}
            Ok(count) => debug!(?path, count, "drained previous handle"),
            Err(err) => warn!(?path, error = %err, "failed to drain previous handle"),
        }
        if let Some(partial) = previous.take_pending() {
            emit_line(idle, sink, &partial);
        }

        drop(previous);
        debug!(?path, "closed previous handle");
    }

    /// Read and emit every complete line available on `path`'s handle.
    fn read_available(&mut self, path: &Path) {
        let Some(file) = self.handles.get_mut(path) else {
            return;
        };
        let idle = &self.idle;
        let sink = self.sink.as_ref();

        match file.read_lines(|line| emit_line(idle, sink, &line)) {
            Ok(0) => trace!(?path, "no complete lines available"),
            Ok(count) => trace!(?path, count, "emitted lines"),
            Err(err) => {
                warn!(?path, error = %err, "read failed; will retry on next write");
            }
        }
    }

    /// Close every handle, both notifiers and the idle timer. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let closed_handles = self.handles.close_all();
        self.file_notifier.close();
        self.dir_notifier.close();
        self.idle.stop();

        info!(closed_handles, lines = self.idle.pulse_count(), "tailer closed");
    }
}

impl<N: WatchRegistry> Drop for Tailer<N> {
    fn drop(&mut self) {
        self.close();
    }
}
