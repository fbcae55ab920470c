// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] defines `CommandSpec` and `run_cmd`, which spawns the
//!   configured command with `tokio::process::Command` and captures its
//!   combined output.
//! - [`backend`] provides the `CommandRunner` trait used by the dispatcher
//!   and the production `ProcessRunner`.

pub mod backend;
pub mod command;

pub use backend::{CommandRunner, ProcessRunner};
pub use command::{run_cmd, CommandSpec};
