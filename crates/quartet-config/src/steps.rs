//! The fixed build step matrix and per-step output configuration.
//!
//! Every invocation produces the same four variants in the same order.
//! Development variants come first so that a cache handle carried from one
//! step to the next always originates from a non-minified pass.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Module format of an output variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// CommonJS (`require` / `module.exports`)
    Cjs,
    /// ECMAScript modules (`import` / `export`)
    Esm,
}

impl ModuleFormat {
    /// Output directory segment for this format.
    pub fn dir_name(self) -> &'static str {
        match self {
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Esm => "es",
        }
    }

    /// File name infix inserted before the extension.
    fn infix(self) -> &'static str {
        match self {
            ModuleFormat::Cjs => "",
            ModuleFormat::Esm => ".es",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleFormat::Cjs => write!(f, "cjs"),
            ModuleFormat::Esm => write!(f, "esm"),
        }
    }
}

/// One output variant: a format crossed with a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildStep {
    pub format: ModuleFormat,
    pub production: bool,
}

impl BuildStep {
    pub const fn new(format: ModuleFormat, production: bool) -> Self {
        Self { format, production }
    }

    /// Profile label, `dev` or `prod`.
    pub fn profile(&self) -> &'static str {
        if self.production { "prod" } else { "dev" }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.format, self.profile())
    }
}

/// The build matrix, in execution order.
pub const BUILD_STEPS: [BuildStep; 4] = [
    BuildStep::new(ModuleFormat::Cjs, false),
    BuildStep::new(ModuleFormat::Esm, false),
    BuildStep::new(ModuleFormat::Cjs, true),
    BuildStep::new(ModuleFormat::Esm, true),
];

/// Output options handed to the bundling engine for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputConfig {
    pub format: ModuleFormat,
    /// Directory the step's artifacts are written to.
    pub dir: PathBuf,
    /// Path of the primary artifact.
    pub file: PathBuf,
    pub sourcemap: bool,
    /// `None` leaves the `__esModule` marker to the transform's default.
    pub es_module: Option<bool>,
    pub legacy: bool,
    pub freeze: bool,
}

impl OutputConfig {
    /// Derive the output options of `step`.
    ///
    /// `out_dir` is the distribution root (usually `dist`) and `basename` the
    /// file stem of the package's primary entry.
    pub fn for_step(step: BuildStep, out_dir: &Path, basename: &str) -> Self {
        let mut dir = out_dir.join(step.format.dir_name());
        if step.production {
            dir.push("min");
        }

        let file_name = format!(
            "{}{}{}.js",
            basename,
            step.format.infix(),
            if step.production { ".min" } else { "" }
        );

        Self {
            format: step.format,
            file: dir.join(file_name),
            dir,
            sourcemap: !step.production,
            es_module: if step.production { None } else { Some(false) },
            legacy: true,
            freeze: false,
        }
    }

    /// File name of the primary artifact.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
