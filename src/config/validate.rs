// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{RawConfigFile, TailConfig, MAX_IDLE_TIMEOUT};
use crate::errors::{Result, TailError};

impl TryFrom<RawConfigFile> for TailConfig {
    type Error = TailError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<TailConfig> {
    let idle_timeout = parse_duration(&cfg.tail.idle_timeout).map_err(|e| {
        TailError::ConfigError(format!("[tail].idle_timeout: {e}"))
    })?;

    if idle_timeout.is_zero() {
        return Err(TailError::ConfigError(
            "[tail].idle_timeout must be greater than zero".to_string(),
        ));
    }

    if idle_timeout > MAX_IDLE_TIMEOUT {
        return Err(TailError::ConfigError(format!(
            "[tail].idle_timeout must be at most {}h (got {}s)",
            MAX_IDLE_TIMEOUT.as_secs() / 3600,
            idle_timeout.as_secs()
        )));
    }

    if cfg.tail.queue_capacity == 0 {
        return Err(TailError::ConfigError(
            "[tail].queue_capacity must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(TailConfig {
        idle_timeout,
        queue_capacity: cfg.tail.queue_capacity,
    })
}
