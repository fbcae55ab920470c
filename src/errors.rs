// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("cannot watch root {path:?}: {reason}")]
    RootUnavailable { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to spawn `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    ///
    /// `output` holds whatever the child wrote before exiting; the dispatcher
    /// decides whether to show it.
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        output: Vec<u8>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PollwatchError {
    /// Captured output attached to a failed command, if any.
    pub fn captured_output(&self) -> Option<&[u8]> {
        match self {
            PollwatchError::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollwatchError>;
