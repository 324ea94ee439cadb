// src/engine/mod.rs

//! Tailing engine for tf.
//!
//! This module ties together:
//! - the watch sets and the open-handle table ([`state`])
//! - the [`Tailer`], which decides per change event whether to read, reopen
//!   or re-register a watch, and emits lines
//! - the [`Runtime`], the async shell that owns the tailer, drains the event
//!   queue serially and handles shutdown
//!
//! Notifier dispatch tasks and the idle timer never touch tailer state; they
//! only produce [`TailEvent`]s (or, for the timer, write separators).

use crate::watch::ChangeEvent;

/// Events flowing into the runtime from the notifier dispatch tasks and the
/// signal listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    /// A change reported by the file-scope notifier.
    File(ChangeEvent),
    /// A change reported by the directory-scope notifier.
    Dir(ChangeEvent),
    /// Graceful shutdown requested (SIGINT, SIGTERM, SIGHUP).
    ShutdownRequested,
}

pub mod runtime;
pub mod state;
pub mod tailer;

pub use runtime::{spawn_dispatch, Runtime};
pub use state::{HandleTable, WatchSet};
pub use tailer::{FollowState, Tailer};
