//! One-shot matrix build.
//!
//! Steps run strictly in matrix order. Each step compiles with the cache
//! handle of the step before it, generates its artifacts, measures their
//! compressed size, writes them, and hands its own cache handle on.
//!
//! A failing step stops the matrix. The lines of the steps that completed
//! are kept, the failure is logged and stored in the report, and the build
//! still returns normally. Only setup (settings, manifest, plan) can make the
//! whole call fail.

use std::path::PathBuf;
use std::sync::Arc;

use quartet_config::{BuildPlan, StepPlan};
use tracing::Instrument;

use crate::artifact::CacheHandle;
use crate::capability::{BundlingEngine, CompiledBuild, Compressor};
use crate::error::{EngineError, Error, Result};
use crate::size::{SizeLine, SizeReport};

/// Result of one completed step.
struct StepOutcome {
    lines: Vec<SizeLine>,
    cache: CacheHandle,
}

/// Runs the build matrix once.
pub struct Orchestrator<E, C> {
    engine: Arc<E>,
    compressor: C,
    plan: BuildPlan,
}

impl<E, C> Orchestrator<E, C>
where
    E: BundlingEngine,
    C: Compressor,
{
    pub fn new(engine: Arc<E>, compressor: C, plan: BuildPlan) -> Self {
        Self {
            engine,
            compressor,
            plan,
        }
    }

    /// Load the plan for the project at `root`.
    ///
    /// # Errors
    ///
    /// Returns a setup error when settings or the package manifest cannot be
    /// loaded.
    pub fn load(engine: Arc<E>, compressor: C, root: impl Into<PathBuf>) -> Result<Self> {
        let plan = BuildPlan::load(root)?;
        Ok(Self::new(engine, compressor, plan))
    }

    pub fn plan(&self) -> &BuildPlan {
        &self.plan
    }

    /// Run every step in order and collect the size report.
    pub async fn build(&self) -> SizeReport {
        let mut report = SizeReport::default();
        let mut cache: Option<CacheHandle> = None;

        for step in self.plan.steps() {
            let span = tracing::info_span!("step", step = %step.step);
            match self.run_step(step, cache.take()).instrument(span).await {
                Ok(outcome) => {
                    report.lines.extend(outcome.lines);
                    report.completed_steps += 1;
                    cache = Some(outcome.cache);
                }
                Err(source) => {
                    let err = Error::Step {
                        step: step.step,
                        source,
                    };
                    tracing::error!(error = %err, "build stopped");
                    report.failure = Some(err);
                    break;
                }
            }
        }

        for line in &report.lines {
            tracing::debug!("{}", line);
        }

        report
    }

    async fn run_step(
        &self,
        step: &StepPlan,
        cache: Option<CacheHandle>,
    ) -> Result<StepOutcome, EngineError> {
        tracing::debug!(
            reused_cache = cache.is_some(),
            pipeline = ?step.input.pipeline.names(),
            "compiling"
        );

        let build = self.engine.compile(&step.input, cache).await?;
        let artifacts = build.generate(&step.output).await?;

        let mut lines = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            let Some(code) = artifact.code.as_deref() else {
                continue;
            };
            let compressed = self.compressor.compressed_size(code.as_bytes()).await?;
            lines.push(SizeLine::new(artifact.file_name.clone(), compressed));
        }

        build.write(&step.output).await?;
        tracing::debug!(dir = %step.output.dir.display(), artifacts = artifacts.len(), "written");

        Ok(StepOutcome {
            lines,
            cache: build.cache_handle(),
        })
    }
}

/// Load the plan at `root` and run the matrix once.
///
/// # Errors
///
/// Only setup failures are returned as `Err`; step failures are reported in
/// [`SizeReport::failure`].
pub async fn build<E, C>(engine: Arc<E>, compressor: C, root: impl Into<PathBuf>) -> Result<SizeReport>
where
    E: BundlingEngine,
    C: Compressor,
{
    let orchestrator = Orchestrator::load(engine, compressor, root)?;
    Ok(orchestrator.build().await)
}
