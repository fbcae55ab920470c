// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::FailureOutput;

/// Command-line arguments for `pollwatch`.
///
/// Flags go before `ROOT`; everything after `COMMAND` is handed to the
/// command untouched, including values that start with `-`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Poll a directory tree for modification-time changes and run a command on each change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to watch recursively.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Command to run whenever a tracked file changes.
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Arguments passed to COMMAND on every invocation.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Path to a TOML config file.
    ///
    /// Default: `Pollwatch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Milliseconds to wait between check passes (0 = poll continuously).
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Glob (relative to ROOT) to leave out of the snapshot. Repeatable.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Append the changed path as the last argument to COMMAND.
    #[arg(long)]
    pub pass_path: bool,

    /// What to do with a failing command's output: discard or print.
    #[arg(long, value_name = "MODE")]
    pub on_failure: Option<FailureOutput>,

    /// Run a single check pass, then exit.
    #[arg(long)]
    pub once: bool,

    /// Build the snapshot, print settings and tracked files, run nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
