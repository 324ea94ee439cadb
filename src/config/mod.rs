// src/config/mod.rs

//! Configuration loading and validation for tf.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Validate and resolve it into a [`TailConfig`] (`validate.rs`).
//! - Parse human-friendly durations such as `"5s"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_from_path, resolve};
pub use model::{
    CliOverrides, RawConfigFile, TailConfig, TailSection, DEFAULT_IDLE_TIMEOUT,
    DEFAULT_QUEUE_CAPACITY, MAX_IDLE_TIMEOUT,
};
