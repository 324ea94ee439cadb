// src/watch/mod.rs

//! Filesystem change notification.
//!
//! This module is responsible for:
//! - Wrapping a cross-platform watcher (`notify`) behind [`Notifier`], whose
//!   watch set can grow while it runs.
//! - Turning raw `notify` events into typed [`ChangeEvent`]s, scoped either to
//!   followed files ([`file_notifier`]) or to their parent directories
//!   ([`dir_notifier`]).
//! - Resolving user-supplied paths into the form the notifiers report
//!   ([`path_utils`]).
//!
//! It does **not** read files or own any tailing state; it only reports what
//! changed.

pub mod dir_notifier;
pub mod file_notifier;
pub mod notifier;
pub mod path_utils;

pub use notifier::{
    ChangeEvent, ChangeKind, ChangeStream, Notifier, WatchRegistry, WatchScope,
};
pub use path_utils::{follow_path, parent_dir};
