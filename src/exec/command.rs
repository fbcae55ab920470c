// src/exec/command.rs

//! Running the configured command and capturing its combined output.

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::{PollwatchError, Result};

/// Program + argument list run for every detected change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The spec actually run for a change to `path`.
    ///
    /// With `pass_path = false` this is the configured command unchanged;
    /// otherwise the changed path is appended as the last argument.
    pub fn invocation_for(&self, path: &Path, pass_path: bool) -> CommandSpec {
        let mut spec = self.clone();
        if pass_path {
            spec.args.push(path.to_string_lossy().into_owned());
        }
        spec
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Run `spec` to completion and return its stdout and stderr as one buffer.
///
/// Chunks from both streams are appended in the order they arrive. There is
/// no timeout: a command that never exits blocks the caller.
///
/// On a non-zero exit the captured bytes travel inside
/// [`PollwatchError::CommandFailed`] and are not returned as output.
pub async fn run_cmd(spec: &CommandSpec) -> Result<Vec<u8>> {
    debug!(cmd = %spec, "spawning command");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| PollwatchError::CommandSpawn {
        command: spec.to_string(),
        source,
    })?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_chunks(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_chunks(stderr, tx.clone()));
    }
    drop(tx);

    let mut output = Vec::new();
    while let Some(chunk) = rx.recv().await {
        output.extend_from_slice(&chunk);
    }

    let status = child.wait().await?;

    info!(
        cmd = %spec,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        bytes = output.len(),
        "command exited"
    );

    if status.success() {
        Ok(output)
    } else {
        Err(PollwatchError::CommandFailed {
            command: spec.to_string(),
            status,
            output,
        })
    }
}

/// Read `reader` to EOF, sending each chunk to `tx`.
async fn forward_chunks<R>(mut reader: R, tx: mpsc::UnboundedSender<Vec<u8>>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(err) => {
                debug!(error = %err, "error reading command output");
                break;
            }
        }
    }
}
