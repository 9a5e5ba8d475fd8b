//! Quartet CLI - build one library entry as four variants.
//!
//! The crate ships the argument parser, logging, terminal output and the
//! two commands, but no bundling engine. A binary plugs its engine in:
//!
//! ```no_run
//! use std::process::ExitCode;
//! use std::sync::Arc;
//!
//! use clap::Parser;
//! use quartet_cli::cli::Cli;
//! # use quartet_core::BundlingEngine;
//!
//! # async fn main_with<E: BundlingEngine>(engine: E) -> ExitCode {
//! let cli = Cli::parse();
//! quartet_cli::run(cli, Arc::new(engine)).await
//! # }
//! ```
//!
//! - [`cli`] - clap definitions and mode selection
//! - [`commands`] - `build` and `watch`
//! - [`error`] - CLI errors and exit codes
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use quartet_core::BundlingEngine;

use crate::cli::{Cli, Mode};

pub use error::{CliError, Result, ResultExt, cli_error_to_miette};

/// Resolve the project root from `--cwd` or the process working directory.
///
/// # Errors
///
/// Returns [`CliError::RootNotFound`] if the directory does not exist.
pub fn resolve_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let root = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to read working directory")?,
    };
    root.canonicalize().with_path(&root)
}

/// Run one invocation and return its outcome without touching the process.
///
/// # Errors
///
/// Returns setup failures of either mode and fatal watcher failures.
pub async fn execute<E: BundlingEngine>(cli: &Cli, engine: Arc<E>) -> Result<()> {
    let root = resolve_root(cli.cwd.as_deref())?;
    tracing::debug!(root = %root.display(), mode = ?cli.mode(), "starting");

    match cli.mode() {
        Mode::Build => commands::build_execute(&root, engine).await.map(|_| ()),
        Mode::Watch => commands::watch_execute(&root, engine).await,
    }
}

/// Initialise logging and colors, run the invocation and map the outcome to
/// a process exit code.
pub async fn run<E: BundlingEngine>(cli: Cli, engine: Arc<E>) -> ExitCode {
    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);
    ui::init_colors(cli.no_color);

    match execute(&cli, engine).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", cli_error_to_miette(err));
            ExitCode::from(exit_status(code))
        }
    }
}

/// Clamp an error code into the range a process can report.
fn exit_status(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(0) | Err(_) => quartet_core::DEFAULT_FAILURE_CODE as u8,
        Ok(code) => code,
    }
}
