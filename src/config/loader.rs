// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{CliOverrides, RawConfigFile, TailConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; [`resolve`] turns the result
/// into a usable [`TailConfig`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Resolve the effective configuration.
///
/// - Starts from the config file when one is given, otherwise from defaults.
/// - Applies command-line overrides on top.
/// - Validates the result.
pub fn resolve(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<TailConfig> {
    let mut raw = match config_path {
        Some(path) => {
            debug!(?path, "loading config file");
            load_from_path(path)?
        }
        None => RawConfigFile::default(),
    };

    raw.apply_overrides(overrides);
    TailConfig::try_from(raw)
}
