//! Command-line interface definition.
//!
//! - `quartet build` (also the default with no subcommand) runs the four
//!   variants once and logs their gzip sizes
//! - `quartet watch`, or `--watch` / `-w`, keeps one watcher per variant
//!   alive until a watcher fails or Ctrl+C is pressed


use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Quartet - build a library as CommonJS and ES modules, dev and prod
#[derive(Parser, Debug)]
#[command(
    name = "quartet",
    version,
    about = "Build a library in CommonJS and ES module formats, dev and prod",
    long_about = "Quartet bundles one entry module into four variants: CommonJS and ES modules,\n\
                  each as a readable development build and a minified production build.\n\
                  Dependencies declared in package.json stay external."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root containing package.json (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Watch sources and rebuild every variant on change
    ///
    /// Same as the `watch` subcommand.
    #[arg(short, long, global = true)]
    pub watch: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Build all four variants once and report their gzip sizes
    Build,

    /// Keep rebuilding all four variants on source changes
    Watch,
}

/// Which of the two modes an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Build,
    Watch,
}

impl Cli {
    /// Resolve the mode; `--watch` wins over an implicit build.
    pub fn mode(&self) -> Mode {
        match (self.command, self.watch) {
            (Some(Command::Watch), _) | (_, true) => Mode::Watch,
            _ => Mode::Build,
        }
    }
}
