// src/engine/mod.rs

//! Change dispatch loop for pollwatch.
//!
//! The [`Dispatcher`] owns the [`SnapshotStore`](crate::snapshot::SnapshotStore)
//! and a [`CommandRunner`](crate::exec::CommandRunner). Each cycle drains
//! one check pass and runs the command once per changed path, sequentially.

use std::time::Duration;

use crate::types::FailureOutput;

pub mod dispatcher;

pub use dispatcher::Dispatcher;

/// Knobs that shape how changes are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOptions {
    /// Pause between check passes. Zero means poll continuously.
    pub interval: Duration,
    /// Append the changed path to the command's arguments.
    pub pass_path: bool,
    /// What to print after the error line when the command fails.
    pub on_failure: FailureOutput,
}

/// Tally of one check pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub changed: usize,
    pub succeeded: usize,
    pub failed: usize,
}
