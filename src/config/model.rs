// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::engine::DispatchOptions;
use crate::errors::{PollwatchError, Result};
use crate::exec::CommandSpec;
use crate::snapshot::ExcludeSet;
use crate::types::FailureOutput;

/// Optional configuration file, as read from TOML.
///
/// ```toml
/// [watch]
/// interval_ms = 250
/// exclude = [".git/**", "target/**"]
///
/// [command]
/// pass_path = true
/// on_failure = "print"
/// ```
///
/// All sections and keys are optional; anything given on the command line
/// wins over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub command: CommandSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Milliseconds to sleep between check passes. `0` polls continuously.
    pub interval_ms: Option<u64>,

    /// Globs (relative to the watch root) left out of the snapshot.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[command]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSection {
    /// Append the changed path as the command's last argument.
    pub pass_path: Option<bool>,

    /// `"discard"` (default) or `"print"`.
    pub on_failure: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub command: CommandSpec,
    pub interval: Duration,
    pub exclude: ExcludeSet,
    pub pass_path: bool,
    pub on_failure: FailureOutput,
}

impl Settings {
    /// Merge CLI arguments over the config file.
    ///
    /// Precedence: CLI flag, then config file, then built-in default.
    /// Exclusion globs from both sources are combined.
    pub fn resolve(file: RawConfigFile, args: &CliArgs) -> Result<Self> {
        let on_failure = match (args.on_failure, file.command.on_failure.as_deref()) {
            (Some(mode), _) => mode,
            (None, Some(s)) => s.parse().map_err(PollwatchError::ConfigError)?,
            (None, None) => FailureOutput::default(),
        };

        let interval_ms = args.interval_ms.or(file.watch.interval_ms).unwrap_or(0);

        let mut patterns = file.watch.exclude;
        patterns.extend(args.exclude.iter().cloned());
        let exclude = ExcludeSet::new(&patterns)
            .map_err(|e| PollwatchError::ConfigError(format!("{e:#}")))?;

        if args.command.trim().is_empty() {
            return Err(PollwatchError::ConfigError(
                "command must not be empty".to_string(),
            ));
        }

        Ok(Self {
            root: args.root.clone(),
            command: CommandSpec::new(args.command.clone(), args.args.iter().cloned()),
            interval: Duration::from_millis(interval_ms),
            exclude,
            pass_path: args.pass_path || file.command.pass_path.unwrap_or(false),
            on_failure,
        })
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            interval: self.interval,
            pass_path: self.pass_path,
            on_failure: self.on_failure,
        }
    }
}
