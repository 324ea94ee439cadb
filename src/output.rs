// src/output.rs

//! Where followed lines and idle separators go.
//!
//! The tailer and the idle timer talk to a [`LineSink`] instead of writing to
//! stdout directly, so tests can record output in memory.

use std::io::{self, Write};

use tracing::warn;

/// Printed after a quiet period: forty dashes.
pub const SEPARATOR: &str = "----------------------------------------";

/// Destination for emitted output.
///
/// Both methods may be called concurrently (lines from the tailer task,
/// separators from the idle timer task); implementations must serialize
/// writes themselves.
pub trait LineSink: Send + Sync {
    /// Emit one followed line, without its trailing newline.
    fn line(&self, text: &str);

    /// Emit the idle separator.
    fn separator(&self);
}

/// Production sink writing to the process stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    fn write_line(&self, text: &str) {
        let mut out = io::stdout().lock();
        // A closed pipe (`tf app.log | head`) must not bring the follower down.
        if let Err(err) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(error = %err, "failed to write to stdout");
        }
    }
}

impl LineSink for StdoutSink {
    fn line(&self, text: &str) {
        self.write_line(text);
    }

    fn separator(&self) {
        self.write_line(SEPARATOR);
    }
}
