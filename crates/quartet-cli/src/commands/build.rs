//! `quartet build`: one pass over the variant matrix.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use quartet_core::{BundlingEngine, GzipCompressor, Orchestrator, SizeReport};

use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the build command.
///
/// A failing variant does not fail the command: the report keeps the sizes
/// of the variants that finished, the failure is shown, and the command
/// still succeeds. Only setup problems (settings, `package.json`) are errors.
///
/// # Errors
///
/// Returns an error if the build plan cannot be loaded or the size report
/// cannot be printed.
pub async fn execute<E: BundlingEngine>(root: &Path, engine: Arc<E>) -> Result<SizeReport> {
    let start_time = Instant::now();

    ui::info(&format!("Building {}", root.display()));
    let orchestrator = Orchestrator::load(engine, GzipCompressor::new(), root)?;
    let steps = orchestrator.plan().steps().len();

    let report = orchestrator.build().await;
    ui::write_size_report(&mut std::io::stdout().lock(), &report)
        .context("Failed to print size report")?;
    let summary = ui::build_summary(&report, steps, start_time.elapsed());

    match &report.failure {
        None => ui::success(&summary),
        Some(err) => {
            ui::error(&err.to_string());
            ui::warning(&summary);
        }
    }

    Ok(report)
}
