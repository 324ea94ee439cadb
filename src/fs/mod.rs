// src/fs/mod.rs

//! Open handles on followed files.
//!
//! - [`followed`] owns one open file, its read cursor and any partial line
//!   waiting for its newline.
//! - [`identity`] tells whether a path still names the file behind a handle.

pub mod followed;
pub mod identity;

pub use followed::{FollowedFile, OpenMode};
pub use identity::FileIdentity;
