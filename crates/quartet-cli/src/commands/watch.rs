//! `quartet watch`: keep every variant rebuilding until a watcher fails.

use std::path::Path;
use std::sync::Arc;

use quartet_config::BuildPlan;
use quartet_core::{BundlingEngine, WatchSupervisor};
use tokio::signal;

use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the watch command.
///
/// Runs until the first fatal watcher event (an error) or Ctrl+C (success).
///
/// # Errors
///
/// Returns an error if the build plan cannot be loaded or a watcher fails
/// fatally.
pub async fn execute<E: BundlingEngine>(root: &Path, engine: Arc<E>) -> Result<()> {
    let plan = BuildPlan::load(root)?;
    let supervisor = WatchSupervisor::new(engine, plan);

    ui::info(&format!(
        "Watching {} for changes",
        supervisor.options().root.display()
    ));
    ui::info("Press Ctrl+C to stop");

    tokio::select! {
        result = supervisor.watch() => match result {
            Ok(never) => match never {},
            Err(err) => Err(err.into()),
        },

        interrupted = signal::ctrl_c() => {
            interrupted.context("Failed to listen for Ctrl+C")?;
            ui::info("Stopping watchers...");
            Ok(())
        }
    }
}
