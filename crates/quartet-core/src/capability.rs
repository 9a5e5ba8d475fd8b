//! Capability traits for the external collaborators.
//!
//! The orchestration core never names a concrete bundler, transform or
//! compressor. It drives whatever implements these traits.

use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quartet_config::{BuildSettings, InputConfig, OutputConfig};
use tokio_stream::Stream;

use crate::artifact::{BundleArtifact, CacheHandle};
use crate::error::EngineError;
use crate::watch::WatchEvent;

/// Event stream of one long-lived watcher.
pub type WatchStream = Pin<Box<dyn Stream<Item = WatchEvent> + Send + 'static>>;

/// The in-memory result of compiling one step.
#[async_trait]
pub trait CompiledBuild: Send + Sync {
    /// Produce the step's artifacts without touching the filesystem.
    async fn generate(&self, output: &OutputConfig) -> Result<Vec<BundleArtifact>, EngineError>;

    /// Write the step's artifacts under `output.dir`.
    async fn write(&self, output: &OutputConfig) -> Result<(), EngineError>;

    /// State the next compilation may reuse.
    fn cache_handle(&self) -> CacheHandle;
}

/// A bundling engine: module graph resolution, transforms and emission.
#[async_trait]
pub trait BundlingEngine: Send + Sync + 'static {
    type Build: CompiledBuild + 'static;

    /// Compile the input graph, optionally reusing a previous compilation.
    async fn compile(
        &self,
        input: &InputConfig,
        cache: Option<CacheHandle>,
    ) -> Result<Self::Build, EngineError>;

    /// Start a long-lived watcher for one `(input, output)` pair.
    ///
    /// The default implementation recompiles on filesystem changes through
    /// [`crate::rebuild::watch_with_rebuilds`]. Engines with a native watch
    /// mode override it.
    fn watch(
        self: Arc<Self>,
        input: InputConfig,
        output: OutputConfig,
        options: WatchOptions,
    ) -> Result<WatchStream, EngineError>
    where
        Self: Sized,
    {
        crate::rebuild::watch_with_rebuilds(self, input, output, options)
    }
}

/// Computes the compressed size of an artifact.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compressed_size(&self, bytes: &[u8]) -> Result<u64, EngineError>;
}

/// Options shared by every watcher of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Directory watched recursively.
    pub root: PathBuf,
    /// Globs, relative to `root`, whose changes are ignored.
    pub exclude: Vec<String>,
    /// Directories never watched; the output directory lives here so that
    /// writing artifacts does not trigger another rebuild.
    pub ignore_dirs: Vec<PathBuf>,
    /// Window in which repeated change events are coalesced.
    pub debounce: Duration,
}

impl WatchOptions {
    pub fn from_settings(settings: &BuildSettings) -> Self {
        Self {
            root: settings.root.clone(),
            exclude: settings.watch_exclude.clone(),
            ignore_dirs: vec![settings.out_path()],
            debounce: Duration::from_millis(settings.debounce_ms),
        }
    }
}
