// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::TailConfig;
use crate::errors::Result;
use crate::idle::IdleTimer;
use crate::output::LineSink;
use crate::watch::{ChangeEvent, ChangeStream, Notifier, WatchRegistry};

use super::tailer::Tailer;
use super::TailEvent;

/// Drives the [`Tailer`] in response to [`TailEvent`]s.
///
/// The runtime is the single consumer of the event queue and therefore the
/// only code that touches the watch sets and the handle table. Producers
/// (notifier dispatch tasks, the signal listener) hold `Sender`s to the same
/// bounded queue and wait when it is full.
pub struct Runtime<N: WatchRegistry> {
    tailer: Tailer<N>,
    event_rx: mpsc::Receiver<TailEvent>,
}

impl<N: WatchRegistry> fmt::Debug for Runtime<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("tailer", &self.tailer)
            .finish_non_exhaustive()
    }
}

impl<N: WatchRegistry> Runtime<N> {
    pub fn new(tailer: Tailer<N>, event_rx: mpsc::Receiver<TailEvent>) -> Self {
        Self { tailer, event_rx }
    }

    /// Main event loop.
    ///
    /// - Consumes `TailEvent`s from `event_rx`, one at a time.
    /// - Feeds them into the tailer.
    /// - Closes the tailer (handles, notifiers, idle timer) on shutdown or
    ///   when every producer is gone.
    pub async fn run(mut self) -> Result<()> {
        info!("tf runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            if !self.tailer.handle(event) {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        self.tailer.close();
        info!("runtime exiting");
        Ok(())
    }
}

impl Runtime<Notifier> {
    /// Wire up a complete tailing pipeline for `files`:
    /// - file and directory notifiers, each with a dispatch task feeding the
    ///   bounded event queue
    /// - the idle timer, writing separators to `sink`
    /// - the tailer, with every file added
    ///
    /// Returns the runtime (not yet running) and a sender into its queue, used
    /// to request shutdown. Must be called from within a Tokio runtime.
    pub fn with_notifiers(
        files: &[PathBuf],
        config: &TailConfig,
        sink: Arc<dyn LineSink>,
    ) -> Result<(Self, mpsc::Sender<TailEvent>)> {
        let (file_notifier, file_events) = Notifier::files()?;
        let (dir_notifier, dir_events) = Notifier::directories()?;

        let (event_tx, event_rx) = mpsc::channel::<TailEvent>(config.queue_capacity);
        spawn_dispatch(file_events, event_tx.clone(), TailEvent::File);
        spawn_dispatch(dir_events, event_tx.clone(), TailEvent::Dir);

        let idle = {
            let sink = Arc::clone(&sink);
            IdleTimer::start(config.idle_timeout, move || sink.separator())
        };
        debug!(idle = ?idle.duration(), capacity = config.queue_capacity, "pipeline assembled");

        let mut tailer = Tailer::new(file_notifier, dir_notifier, idle, sink);
        tailer.add_files(files);

        Ok((Self::new(tailer, event_rx), event_tx))
    }
}

/// Forward a notifier's change stream into the runtime queue.
///
/// `send().await` holds this task back while the queue is full; the notifier
/// keeps buffering in its own stream meanwhile. Ends when the stream ends
/// (notifier closed) or the runtime is gone.
pub fn spawn_dispatch<F>(
    mut stream: ChangeStream,
    runtime_tx: mpsc::Sender<TailEvent>,
    wrap: F,
) -> JoinHandle<()>
where
    F: Fn(ChangeEvent) -> TailEvent + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(change) = stream.next().await {
            if runtime_tx.send(wrap(change)).await.is_err() {
                debug!("runtime queue closed; stopping dispatch");
                return;
            }
        }
        debug!("change stream ended; dispatch finished");
    })
}
