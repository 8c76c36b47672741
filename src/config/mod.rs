// src/config/mod.rs

//! TOML pipeline description used by the `dagpipe` binary.
//!
//! - [`model`] defines the serde data model.
//! - [`loader`] reads a file from disk.
//! - [`validate`] checks task references.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
