// src/engine/dispatcher.rs

use std::fmt;
use std::future::Future;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::{CommandRunner, CommandSpec};
use crate::snapshot::SnapshotStore;
use crate::types::FailureOutput;

use super::{CycleReport, DispatchOptions};

/// Owns the snapshot store and turns every detected change into one command
/// run.
///
/// Everything the dispatcher prints goes to `out`: the `File changed:` line,
/// then either the command's captured output or an error line.
pub struct Dispatcher<R: CommandRunner, W: Write + Send> {
    store: SnapshotStore,
    runner: R,
    command: CommandSpec,
    options: DispatchOptions,
    out: W,
}

impl<R: CommandRunner, W: Write + Send> fmt::Debug for Dispatcher<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("store", &self.store)
            .field("command", &self.command)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner, W: Write + Send> Dispatcher<R, W> {
    pub fn new(
        store: SnapshotStore,
        runner: R,
        command: CommandSpec,
        options: DispatchOptions,
        out: W,
    ) -> Self {
        Self {
            store,
            runner,
            command,
            options,
            out,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Consume the dispatcher and hand back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run one check pass and dispatch the command for every changed path,
    /// in the order the store reports them.
    ///
    /// Command failures are reported to `out` and never end the pass; only
    /// errors writing to `out` are returned.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let Self {
            store,
            runner,
            command,
            options,
            out,
        } = self;

        let mut report = CycleReport::default();

        for path in store.check() {
            report.changed += 1;
            writeln!(out, "File changed: {}", path.display())?;

            let invocation = command.invocation_for(&path, options.pass_path);
            match runner.run(&invocation).await {
                Ok(output) => {
                    out.write_all(&output)?;
                    report.succeeded += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), cmd = %invocation, error = %err, "command failed");
                    writeln!(out, "Error executing command: {err}")?;
                    if options.on_failure == FailureOutput::Print {
                        if let Some(output) = err.captured_output() {
                            out.write_all(output)?;
                        }
                    }
                    report.failed += 1;
                }
            }
            out.flush()?;
        }

        if report.changed > 0 {
            debug!(?report, "check pass finished");
        }
        Ok(report)
    }

    /// Run check passes until `shutdown` resolves.
    ///
    /// With a zero interval the next pass starts as soon as the previous one
    /// is drained; otherwise the loop sleeps `interval` between passes.
    /// Resolving `shutdown` mid-command drops the running child, which kills
    /// it.
    pub async fn run<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            root = %self.store.root().display(),
            tracked = self.store.len(),
            cmd = %self.command,
            interval_ms = self.options.interval.as_millis() as u64,
            "watch loop started"
        );

        let interval = self.options.interval;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                res = self.run_cycle() => {
                    res?;
                }
            }

            if interval.is_zero() {
                // Busy poll, but give the runtime a chance to deliver Ctrl-C.
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        }

        info!("shutdown requested; watch loop stopped");
        Ok(())
    }
}
