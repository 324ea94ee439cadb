// src/watch/notifier.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{Result, TailError};
use crate::watch::{dir_notifier, file_notifier};

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// New bytes were written to the file.
    DataWritten,
    /// A directory entry appeared.
    Created,
    /// A directory entry was moved into place under this name.
    RenamedIn,
    /// The path was moved away (or, for a watched file, renamed).
    Renamed,
    Removed,
    MetadataChanged,
    Other,
}

/// A single typed change, tagged with the path it concerns.
///
/// For the file scope `path` is the watched file itself; for the directory
/// scope it is the entry inside the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Which kind of paths a [`Notifier`] is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchScope {
    Files,
    Directories,
}

/// The registration side of a notifier.
///
/// The tailer only ever needs to add watches and shut everything down; the
/// events themselves arrive through a separate [`ChangeStream`]. Tests can
/// provide their own implementation that records calls instead of touching
/// the OS.
pub trait WatchRegistry: Send {
    /// Register `path`. Registering an already registered path is a no-op.
    fn watch(&mut self, path: &Path) -> Result<()>;

    /// Drop and re-add the OS registration for `path`.
    ///
    /// Needed after the file behind a path was replaced: some backends
    /// silently forget a watch once its inode is gone.
    fn rewatch(&mut self, path: &Path) -> Result<()>;

    /// Release OS resources and end the event stream. Safe to call twice.
    fn close(&mut self);
}

/// Lazy, unbounded stream of typed change events.
///
/// Ends once the owning [`Notifier`] is closed or dropped.
#[derive(Debug)]
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChangeStream {
    pub fn new(rx: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next change; `None` once the notifier is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

type Registered = Arc<Mutex<HashSet<PathBuf>>>;

fn lock(registered: &Registered) -> MutexGuard<'_, HashSet<PathBuf>> {
    match registered.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// `notify`-backed notifier for a growing set of paths.
///
/// The `RecommendedWatcher` invokes our callback on its own thread. The
/// callback classifies the raw event for this notifier's [`WatchScope`],
/// drops anything outside the registered set, and forwards the rest into an
/// unbounded channel: that thread also services `watch` calls, so it must
/// never wait on the consumer.
pub struct Notifier {
    scope: WatchScope,
    watcher: Option<RecommendedWatcher>,
    registered: Registered,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("scope", &self.scope)
            .field("open", &self.watcher.is_some())
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Create a notifier for followed files.
    pub fn files() -> Result<(Self, ChangeStream)> {
        Self::new(WatchScope::Files)
    }

    /// Create a notifier for the directories holding followed files.
    pub fn directories() -> Result<(Self, ChangeStream)> {
        Self::new(WatchScope::Directories)
    }

    pub fn new(scope: WatchScope) -> Result<(Self, ChangeStream)> {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ChangeEvent>();
        let registered: Registered = Arc::new(Mutex::new(HashSet::new()));

        let watcher = RecommendedWatcher::new(
            {
                let registered = Arc::clone(&registered);
                move |res: notify::Result<Event>| match res {
                    Ok(event) => {
                        let changes = {
                            let registered = lock(&registered);
                            match scope {
                                WatchScope::Files => file_notifier::classify(&event, &registered),
                                WatchScope::Directories => {
                                    dir_notifier::classify(&event, &registered)
                                }
                            }
                        };

                        for change in changes {
                            if event_tx.send(change).is_err() {
                                // Stream dropped; nobody is listening any more.
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        warn!(?scope, error = %err, paths = ?err.paths, "file watch error");
                    }
                }
            },
            Config::default(),
        )?;

        info!(?scope, "notifier started");

        Ok((
            Self {
                scope,
                watcher: Some(watcher),
                registered,
            },
            ChangeStream::new(event_rx),
        ))
    }

    /// Whether `path` is currently registered.
    pub fn is_registered(&self, path: &Path) -> bool {
        lock(&self.registered).contains(path)
    }

    fn watcher_mut(&mut self) -> Result<&mut RecommendedWatcher> {
        self.watcher
            .as_mut()
            .ok_or_else(|| TailError::WatchError(notify::Error::generic("notifier is closed")))
    }

    /// Add the OS watch. The path goes into the filter set first so that
    /// events raised while `notify` is still registering are not lost.
    fn register(&mut self, path: &Path) -> Result<()> {
        lock(&self.registered).insert(path.to_path_buf());

        let result = self
            .watcher_mut()
            .and_then(|w| w.watch(path, RecursiveMode::NonRecursive).map_err(TailError::from));

        if result.is_err() {
            lock(&self.registered).remove(path);
        }
        result
    }
}

impl WatchRegistry for Notifier {
    fn watch(&mut self, path: &Path) -> Result<()> {
        if self.is_registered(path) {
            return Ok(());
        }
        self.register(path)?;
        debug!(scope = ?self.scope, ?path, "watching");
        Ok(())
    }

    fn rewatch(&mut self, path: &Path) -> Result<()> {
        if self.is_registered(path) {
            let watcher = self.watcher_mut()?;
            if let Err(err) = watcher.unwatch(path) {
                // Expected when the backend already dropped the watch.
                debug!(?path, error = %err, "unwatch before re-registration failed");
            }
            lock(&self.registered).remove(path);
        }
        self.register(path)?;
        debug!(scope = ?self.scope, ?path, "re-registered watch");
        Ok(())
    }

    fn close(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            lock(&self.registered).clear();
            info!(scope = ?self.scope, "notifier closed");
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.close();
    }
}
