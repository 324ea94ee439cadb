// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::CliOverrides;

/// Command-line arguments for `tf`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tf",
    version,
    about = "Follow files like `tail -F`, printing a separator after a quiet period.",
    long_about = None
)]
pub struct CliArgs {
    /// Files to follow. They do not need to exist yet.
    ///
    /// Options must come first: everything from the first file on is taken
    /// as a file name, including names starting with `-`.
    #[arg(value_name = "FILE", trailing_var_arg = true)]
    pub files: Vec<PathBuf>,

    /// Quiet period after which a separator line is printed (e.g. `5s`, `250ms`).
    #[arg(long, value_name = "DURATION")]
    pub idle: Option<String>,

    /// Capacity of the internal change-event queue.
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Optional TOML config file with a `[tail]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TF_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            idle_timeout: self.idle.clone(),
            queue_capacity: self.queue_capacity,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
