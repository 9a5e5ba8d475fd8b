//! Shared test utilities for quartet-cli tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use quartet_config::{InputConfig, OutputConfig};
use quartet_core::{
    BundleArtifact, BundlingEngine, CacheHandle, CompiledBuild, EngineError, WatchEvent,
    WatchOptions, WatchStream,
};
use tempfile::TempDir;

/// Write a minimal library project and return its directory.
pub fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "urql", "main": "dist/urql.js", "dependencies": { "wonka": "^4.0.0" } }"#,
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/index.ts"), "export const x = 1;\n").unwrap();
    dir
}

/// Engine that echoes a fixed chunk for every variant and writes it to disk.
///
/// Production compilations fail when `fail_production` is set; every watcher
/// reports a fatal event when `fatal_watch` is set.
#[derive(Default)]
pub struct EchoEngine {
    pub fail_production: bool,
    pub fatal_watch: bool,
}

pub struct EchoBuild;

#[async_trait]
impl CompiledBuild for EchoBuild {
    async fn generate(&self, output: &OutputConfig) -> Result<Vec<BundleArtifact>, EngineError> {
        Ok(vec![BundleArtifact::chunk(
            output.file_name(),
            "export const x = 1;\n",
        )])
    }

    async fn write(&self, output: &OutputConfig) -> Result<(), EngineError> {
        tokio::fs::create_dir_all(&output.dir).await?;
        tokio::fs::write(&output.file, "export const x = 1;\n").await?;
        Ok(())
    }

    fn cache_handle(&self) -> CacheHandle {
        CacheHandle::new(())
    }
}

#[async_trait]
impl BundlingEngine for EchoEngine {
    type Build = EchoBuild;

    async fn compile(
        &self,
        input: &InputConfig,
        _cache: Option<CacheHandle>,
    ) -> Result<EchoBuild, EngineError> {
        if self.fail_production && input.production {
            return Err(EngineError::new("minifier crashed"));
        }
        Ok(EchoBuild)
    }

    fn watch(
        self: Arc<Self>,
        input: InputConfig,
        output: OutputConfig,
        options: WatchOptions,
    ) -> Result<WatchStream, EngineError> {
        if self.fatal_watch {
            let events = vec![
                WatchEvent::Start,
                WatchEvent::Fatal(EngineError::new("watcher crashed")),
            ];
            return Ok(Box::pin(tokio_stream::iter(events)));
        }
        quartet_core::watch_with_rebuilds(self, input, output, options)
    }
}
