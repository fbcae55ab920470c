// src/config/mod.rs

//! Configuration for pollwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and resolved `Settings` (`model.rs`).
//! - Locate and load the optional config file (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{discover, load_from_path, load_settings, DEFAULT_CONFIG_FILE};
pub use model::{CommandSection, RawConfigFile, Settings, WatchSection};
