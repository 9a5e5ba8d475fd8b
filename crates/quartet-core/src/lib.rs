//! # quartet-core
//!
//! Drives a bundling engine through the four-variant library matrix
//! (CommonJS and ES modules, each in a development and a production profile).
//!
//! The core never names a concrete bundler. Callers supply something that
//! implements [`BundlingEngine`] and a [`Compressor`] (the gzip one ships
//! here), and pick one of two modes:
//!
//! - one-shot: [`Orchestrator::build`] runs the steps in order, threads the
//!   engine's cache from step to step and returns a [`SizeReport`];
//! - watch: [`WatchSupervisor::watch`] keeps one watcher per step alive and
//!   only returns on the first fatal watcher event.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use quartet_core::{BundlingEngine, GzipCompressor, Orchestrator};
//! # async fn run<E: BundlingEngine>(engine: Arc<E>) -> quartet_core::Result<()> {
//! let orchestrator = Orchestrator::load(engine, GzipCompressor::new(), "/path/to/package")?;
//! let report = orchestrator.build().await;
//! for line in report.rendered() {
//!     println!("{line}");
//! }
//! # Ok(()) }
//! ```

pub mod artifact;
pub mod capability;
pub mod compress;
pub mod error;
pub mod orchestrator;
pub mod rebuild;
pub mod size;
pub mod watch;

pub use artifact::{BundleArtifact, CacheHandle};
pub use capability::{BundlingEngine, CompiledBuild, Compressor, WatchOptions, WatchStream};
pub use compress::GzipCompressor;
pub use error::{DEFAULT_FAILURE_CODE, EngineError, Error, Result};
pub use orchestrator::{Orchestrator, build};
pub use rebuild::{ChangeFilter, watch_with_rebuilds};
pub use size::{SizeLine, SizeReport, pretty_bytes};
pub use watch::{WatchEvent, WatchSupervisor};

pub use quartet_config;
