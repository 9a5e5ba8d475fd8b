//! # quartet-config
//!
//! Everything derived before a build starts: the package manifest, the
//! external dependency classifier, the fixed step matrix, the transform
//! pipeline descriptors and layered settings. All of it is computed once per
//! invocation into a [`BuildPlan`] and never read from ambient state again.
//!
//! ```no_run
//! use quartet_config::BuildPlan;
//!
//! let plan = BuildPlan::load("/path/to/package").unwrap();
//! for step in plan.steps() {
//!     println!("{} -> {}", step.step, step.output.file.display());
//! }
//! ```

pub mod error;
pub mod external;
pub mod manifest;
pub mod pipeline;
pub mod plan;
pub mod settings;
pub mod steps;

pub use error::{ConfigError, Result};
pub use external::{BUILTIN_EXTERNALS, ExternalClassifier, INLINED_HELPERS, INLINED_PACKAGE};
pub use manifest::{MANIFEST_FILE, PackageManifest};
pub use pipeline::{
    BabelPlugin, MinifyOptions, MinifyOutput, TransformCapability, TransformPipeline,
};
pub use plan::{BuildPlan, InputConfig, StepPlan, TreeshakeOptions};
pub use settings::{BuildSettings, SETTINGS_FILE};
pub use steps::{BUILD_STEPS, BuildStep, ModuleFormat, OutputConfig};
