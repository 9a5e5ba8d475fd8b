//! Per-step input/output configuration for the whole matrix.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::external::ExternalClassifier;
use crate::manifest::PackageManifest;
use crate::pipeline::TransformPipeline;
use crate::settings::BuildSettings;
use crate::steps::{BUILD_STEPS, BuildStep, OutputConfig};

/// Tree-shaking options passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeshakeOptions {
    /// Whether reading a property may have side effects.
    pub property_read_side_effects: bool,
}

impl Default for TreeshakeOptions {
    fn default() -> Self {
        Self {
            property_read_side_effects: false,
        }
    }
}

/// Input options handed to the bundling engine for one step.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Entry module.
    pub input: PathBuf,
    pub production: bool,
    /// Decides which specifiers stay external.
    pub external: Arc<ExternalClassifier>,
    pub pipeline: TransformPipeline,
    pub treeshake: TreeshakeOptions,
}

impl InputConfig {
    /// Convenience passthrough to the classifier.
    pub fn is_external(&self, id: &str) -> bool {
        self.external.is_external(id)
    }
}

/// Everything one matrix step needs.
#[derive(Debug, Clone)]
pub struct StepPlan {
    pub step: BuildStep,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// The fully derived build matrix for one invocation.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    settings: BuildSettings,
    externals: Arc<ExternalClassifier>,
    steps: Vec<StepPlan>,
}

impl BuildPlan {
    /// Derive the plan from settings and the package manifest.
    ///
    /// # Errors
    ///
    /// Fails when the manifest lacks a usable `main` entry.
    pub fn new(settings: BuildSettings, manifest: &PackageManifest) -> Result<Self> {
        let basename = manifest.entry_basename()?;
        let externals = Arc::new(ExternalClassifier::from_manifest(manifest));
        let out_dir = settings.out_path();
        let input = settings.input_path();

        let steps = BUILD_STEPS
            .iter()
            .map(|&step| StepPlan {
                step,
                input: InputConfig {
                    input: input.clone(),
                    production: step.production,
                    external: Arc::clone(&externals),
                    pipeline: TransformPipeline::for_profile(
                        step.production,
                        &settings.root,
                        &out_dir,
                        &externals,
                    ),
                    treeshake: TreeshakeOptions::default(),
                },
                output: OutputConfig::for_step(step, &out_dir, &basename),
            })
            .collect();

        tracing::debug!(
            basename = %basename,
            out_dir = %out_dir.display(),
            "derived build plan"
        );

        Ok(Self {
            settings,
            externals,
            steps,
        })
    }

    /// Load settings and manifest from `root` and derive the plan.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let settings = BuildSettings::load(&root)?;
        let manifest = PackageManifest::load(&root)?;
        Self::new(settings, &manifest)
    }

    pub fn steps(&self) -> &[StepPlan] {
        &self.steps
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn externals(&self) -> &ExternalClassifier {
        &self.externals
    }
}
