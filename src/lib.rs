// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod snapshot;
pub mod types;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{load_settings, Settings};
use crate::engine::Dispatcher;
use crate::exec::ProcessRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::snapshot::SnapshotStore;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI + optional TOML file)
/// - the initial snapshot of the watch root
/// - the dispatcher and its process runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let store = SnapshotStore::build(fs, settings.root.clone(), &settings.exclude)?;

    if args.dry_run {
        print_dry_run(&settings, &store, &mut std::io::stdout())?;
        return Ok(());
    }

    let mut dispatcher = Dispatcher::new(
        store,
        ProcessRunner,
        settings.command.clone(),
        settings.dispatch_options(),
        std::io::stdout(),
    );

    if args.once {
        let wait = once_wait(settings.interval);
        info!(wait_ms = wait.as_millis() as u64, "waiting before the single check pass");
        tokio::time::sleep(wait).await;

        let report = dispatcher.run_cycle().await?;
        info!(?report, "single check pass complete");
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    dispatcher.run(shutdown).await?;
    Ok(())
}

/// How long `--once` waits between the snapshot and its check pass.
const ONCE_DEFAULT_WAIT: Duration = Duration::from_secs(1);

/// The configured interval, or [`ONCE_DEFAULT_WAIT`] when polling is busy.
fn once_wait(interval: Duration) -> Duration {
    if interval.is_zero() {
        ONCE_DEFAULT_WAIT
    } else {
        interval
    }
}

/// Dry-run output: resolved settings and every tracked path.
fn print_dry_run(settings: &Settings, store: &SnapshotStore, out: &mut impl Write) -> Result<()> {
    writeln!(out, "pollwatch dry-run")?;
    writeln!(out, "  root = {}", settings.root.display())?;
    writeln!(out, "  command = {}", settings.command)?;
    writeln!(out, "  interval_ms = {}", settings.interval.as_millis())?;
    writeln!(out, "  pass_path = {}", settings.pass_path)?;
    writeln!(out, "  on_failure = {:?}", settings.on_failure)?;
    if !settings.exclude.is_empty() {
        writeln!(out, "  exclude = {:?}", settings.exclude.patterns())?;
    }
    writeln!(out)?;

    writeln!(out, "tracked files ({}):", store.len())?;
    for path in store.paths() {
        writeln!(out, "  - {}", path.display())?;
    }
    Ok(())
}
