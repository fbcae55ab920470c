// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::errors::Result;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "Pollwatch.toml";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; merging with the CLI happens in
/// [`Settings::resolve`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Find the config file to use, if any.
///
/// - An explicit path must exist.
/// - Otherwise `Pollwatch.toml` in the working directory is used when present.
/// - Otherwise all settings come from the CLI and built-in defaults.
pub fn discover(explicit: Option<&Path>) -> Result<RawConfigFile> {
    match explicit {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            load_from_path(path)
        }
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = %path.display(), "loading default config file");
                load_from_path(path)
            } else {
                Ok(RawConfigFile::default())
            }
        }
    }
}

/// Load whichever config file applies and merge it with the CLI.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let file = discover(args.config.as_deref())?;
    Settings::resolve(file, args)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
