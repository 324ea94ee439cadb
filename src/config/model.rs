// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Idle separator period used when nothing else is configured.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest accepted idle separator period: one week.
pub const MAX_IDLE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 3600);

/// Capacity of the runtime event queue used when nothing else is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Top-level configuration as read from an (optional) TOML file.
///
/// ```toml
/// [tail]
/// idle_timeout = "5s"
/// queue_capacity = 64
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub tail: TailSection,
}

/// `[tail]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TailSection {
    /// Quiet period after which the separator line is printed, e.g. `"5s"`.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: String,

    /// Number of change events that may wait for the tailer before the
    /// notifier dispatch tasks are held back.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_idle_timeout() -> String {
    format!("{}ms", DEFAULT_IDLE_TIMEOUT.as_millis())
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for TailSection {
    fn default() -> Self {
        Self {
            idle_timeout: default_idle_timeout(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub idle_timeout: Option<String>,
    pub queue_capacity: Option<usize>,
}

impl RawConfigFile {
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(ref idle) = overrides.idle_timeout {
            self.tail.idle_timeout = idle.clone();
        }
        if let Some(capacity) = overrides.queue_capacity {
            self.tail.queue_capacity = capacity;
        }
    }
}

/// Validated, resolved configuration handed to the runtime.
///
/// Constructed via `TailConfig::try_from(RawConfigFile)` (see `validate.rs`)
/// or [`TailConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailConfig {
    pub idle_timeout: Duration,
    pub queue_capacity: usize,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
