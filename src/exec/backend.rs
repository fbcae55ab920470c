// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The dispatcher talks to a `CommandRunner` instead of spawning processes
//! directly, so tests can swap in a fake that records invocations and returns
//! scripted results.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::command::{run_cmd, CommandSpec};

/// Trait abstracting how the configured command is executed.
///
/// Production code uses [`ProcessRunner`].
pub trait CommandRunner: Send {
    /// Run `spec` to completion.
    ///
    /// Returns the combined stdout + stderr on success; any failure (spawn
    /// error, non-zero exit) is an `Err`.
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// Runs commands as real OS processes via [`run_cmd`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(run_cmd(spec))
    }
}
