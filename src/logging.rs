// src/logging.rs

//! Diagnostics for `tf`, via `tracing` + `tracing-subscriber`.
//!
//! Stdout belongs to followed lines and separators, so every diagnostic goes
//! to stderr. The filter comes from, in order:
//! 1. `--log-level`
//! 2. `TF_LOG`, in `EnvFilter` syntax (`debug`, `tf::engine=trace`, ...)
//! 3. `warn`, which keeps a normal session silent

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable read when no `--log-level` is given.
pub const LOG_ENV: &str = "TF_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Build the filter for `cli_level`, falling back to `env_value` (the raw
/// `TF_LOG` contents) and then to `warn`. Malformed `TF_LOG` directives are
/// ignored rather than fatal.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }
    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Call once, before the runtime starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}
