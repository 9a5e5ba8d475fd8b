//! Shared test utilities for quartet-core tests
//!
//! A scripted in-memory engine that records what it was asked to do, plus a
//! fixture project on disk.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quartet_core::quartet_config::{InputConfig, OutputConfig};
use quartet_core::{
    BundleArtifact, BundlingEngine, CacheHandle, CompiledBuild, Compressor, EngineError,
    WatchEvent, WatchOptions, WatchStream,
};
use tempfile::TempDir;
use tokio_stream::StreamExt;

/// Write a minimal library project and return its directory.
pub fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{
  "name": "urql",
  "main": "dist/urql.js",
  "dependencies": { "wonka": "^4.0.0" },
  "peerDependencies": { "react": ">= 16.8.0" }
}"#,
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/index.ts"), "export const x = 1;\n").unwrap();
    dir
}

/// Phase of a step in which the fake engine can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Compile,
    Generate,
    Write,
}

/// What one `compile` call received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCall {
    pub index: usize,
    pub production: bool,
    /// Index of the compilation whose cache was passed in.
    pub cache_from: Option<usize>,
}

type WatchScript = Box<dyn Fn(usize) -> Vec<WatchEvent> + Send + Sync>;

/// Scripted bundling engine.
///
/// Compilation `n` produces a cache handle holding `n`, a chunk of
/// `100 * (n + 1)` bytes and a source map asset.
pub struct FakeEngine {
    compiles: AtomicUsize,
    watches: AtomicUsize,
    fail_at: Option<(usize, Phase)>,
    pub calls: Mutex<Vec<CompileCall>>,
    pub written: Arc<Mutex<Vec<PathBuf>>>,
    watch_script: Option<WatchScript>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            compiles: AtomicUsize::new(0),
            watches: AtomicUsize::new(0),
            fail_at: None,
            calls: Mutex::new(Vec::new()),
            written: Arc::new(Mutex::new(Vec::new())),
            watch_script: None,
        }
    }

    /// Fail compilation number `index` in `phase`.
    pub fn failing_at(mut self, index: usize, phase: Phase) -> Self {
        self.fail_at = Some((index, phase));
        self
    }

    /// Replace the default watcher with scripted events; the stream stays
    /// open after the last event, like a real watcher.
    pub fn with_watch_script(
        mut self,
        script: impl Fn(usize) -> Vec<WatchEvent> + Send + Sync + 'static,
    ) -> Self {
        self.watch_script = Some(Box::new(script));
        self
    }

    pub fn calls(&self) -> Vec<CompileCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.written.lock().unwrap().clone()
    }

    pub fn watch_count(&self) -> usize {
        self.watches.load(Ordering::SeqCst)
    }

    fn fails(&self, index: usize, phase: Phase) -> bool {
        self.fail_at == Some((index, phase))
    }
}

pub struct FakeBuild {
    index: usize,
    fail: Option<Phase>,
    written: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait]
impl CompiledBuild for FakeBuild {
    async fn generate(&self, output: &OutputConfig) -> Result<Vec<BundleArtifact>, EngineError> {
        if self.fail == Some(Phase::Generate) {
            return Err(EngineError::new("generate failed"));
        }
        let file_name = output.file_name();
        Ok(vec![
            BundleArtifact::chunk(file_name.clone(), "x".repeat(100 * (self.index + 1))),
            BundleArtifact::asset(format!("{}.map", file_name)),
        ])
    }

    async fn write(&self, output: &OutputConfig) -> Result<(), EngineError> {
        if self.fail == Some(Phase::Write) {
            return Err(EngineError::new("write failed"));
        }
        tokio::fs::create_dir_all(&output.dir).await?;
        tokio::fs::write(&output.file, "x".repeat(100 * (self.index + 1))).await?;
        self.written.lock().unwrap().push(output.file.clone());
        Ok(())
    }

    fn cache_handle(&self) -> CacheHandle {
        CacheHandle::new(self.index)
    }
}

#[async_trait]
impl BundlingEngine for FakeEngine {
    type Build = FakeBuild;

    async fn compile(
        &self,
        input: &InputConfig,
        cache: Option<CacheHandle>,
    ) -> Result<FakeBuild, EngineError> {
        let index = self.compiles.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(CompileCall {
            index,
            production: input.production,
            cache_from: cache.as_ref().and_then(|c| c.downcast_ref::<usize>().copied()),
        });

        if self.fails(index, Phase::Compile) {
            return Err(EngineError::new("compile failed"));
        }

        let fail = [Phase::Generate, Phase::Write]
            .into_iter()
            .find(|&phase| self.fails(index, phase));

        Ok(FakeBuild {
            index,
            fail,
            written: Arc::clone(&self.written),
        })
    }

    fn watch(
        self: Arc<Self>,
        input: InputConfig,
        output: OutputConfig,
        options: WatchOptions,
    ) -> Result<WatchStream, EngineError> {
        let index = self.watches.fetch_add(1, Ordering::SeqCst);
        match &self.watch_script {
            Some(script) => {
                let events = script(index);
                Ok(Box::pin(
                    tokio_stream::iter(events).chain(tokio_stream::pending()),
                ))
            }
            None => quartet_core::watch_with_rebuilds(self, input, output, options),
        }
    }
}

/// Compressor that reports half the input length.
pub struct HalfCompressor;

#[async_trait]
impl Compressor for HalfCompressor {
    async fn compressed_size(&self, bytes: &[u8]) -> Result<u64, EngineError> {
        Ok(bytes.len() as u64 / 2)
    }
}

/// Relative path of `path` under `root`, with `/` separators.
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap()
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
