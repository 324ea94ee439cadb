// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod idle;
pub mod logging;
pub mod output;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::engine::{Runtime, TailEvent};
use crate::output::{LineSink, StdoutSink};

/// Printed when `tf` is started without any file.
pub const USAGE: &str = "usage: tf <filename>...";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file + CLI overrides)
/// - notifiers, idle timer and tailer
/// - signal handling
/// - the runtime loop, which only returns after a shutdown signal
pub async fn run(args: CliArgs) -> Result<()> {
    if args.files.is_empty() {
        println!("{USAGE}");
        return Ok(());
    }

    let config = config::resolve(args.config.as_deref(), &args.overrides())?;
    debug!(?config, "resolved configuration");

    let sink: Arc<dyn LineSink> = Arc::new(StdoutSink);
    let (runtime, event_tx) = Runtime::with_notifiers(&args.files, &config, sink)?;
    info!(files = args.files.len(), "following files");

    spawn_signal_listener(event_tx);

    runtime.run().await?;
    Ok(())
}

/// SIGINT / SIGTERM / SIGHUP → graceful shutdown through the runtime queue,
/// so handles and watchers are closed by the task that owns them.
fn spawn_signal_listener(tx: mpsc::Sender<TailEvent>) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            warn!(error = %e, "failed to listen for shutdown signals");
            return;
        }
        let _ = tx.send(TailEvent::ShutdownRequested).await;
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = interrupt.recv() => info!("received SIGINT"),
        _ = terminate.recv() => info!("received SIGTERM"),
        _ = hangup.recv() => info!("received SIGHUP"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("received Ctrl+C");
    Ok(())
}
