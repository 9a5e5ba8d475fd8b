//! Typed transform pipeline descriptors.
//!
//! The bundling engine receives an ordered list of capability descriptors
//! rather than concrete plugin instances. The order is significant: module
//! resolution and CommonJS interop run before type stripping, which runs
//! before syntax down-leveling, Babel transforms, constant replacement and
//! finally minification.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::external::ExternalClassifier;

/// Source globs excluded from type checking and declaration output.
pub const TYPESCRIPT_EXCLUDES: &[&str] = &[
    "src/**/*.test.ts",
    "src/**/*.test.tsx",
    "src/**/test-utils/*",
];

/// Glob excluded from the Buble and Babel passes.
pub const NODE_MODULES_GLOB: &str = "node_modules/**";

/// One stage of the transform pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TransformCapability {
    /// Node-style module resolution.
    NodeResolve {
        main_fields: Vec<String>,
        browser: bool,
    },

    /// CommonJS to ESM interop for dependencies.
    CommonJs {
        ignore_global: bool,
        /// Path fragment of modules to convert.
        include: String,
        /// Packages whose named exports must be detected explicitly.
        named_exports_from: Vec<String>,
    },

    /// TypeScript type stripping and declaration emission.
    TypeScript {
        tsconfig: PathBuf,
        cache_root: PathBuf,
        declaration: bool,
        declaration_dir: PathBuf,
        target: String,
        source_map: bool,
        exclude: Vec<String>,
    },

    /// Syntax down-leveling.
    Buble {
        unicode_reg_exp: bool,
        dangerous_for_of: bool,
        dangerous_tagged_template_string: bool,
        object_assign: String,
        exclude: String,
    },

    /// Babel passes (JSX, async-to-promises and friends).
    Babel {
        exclude: String,
        plugins: Vec<BabelPlugin>,
    },

    /// Compile-time constant replacement, production only.
    Replace { values: IndexMap<String, String> },

    /// Minifier, in either pretty or fully minified mode.
    Minify(MinifyOptions),
}

impl TransformCapability {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            TransformCapability::NodeResolve { .. } => "node-resolve",
            TransformCapability::CommonJs { .. } => "commonjs",
            TransformCapability::TypeScript { .. } => "typescript",
            TransformCapability::Buble { .. } => "buble",
            TransformCapability::Babel { .. } => "babel",
            TransformCapability::Replace { .. } => "replace",
            TransformCapability::Minify(_) => "minify",
        }
    }
}

/// Babel plugins applied in the Babel stage, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "plugin", rename_all = "kebab-case")]
pub enum BabelPlugin {
    /// Wraps `invariant`/`warning` calls in development-only guards.
    InvariantWarning,
    ClosureElimination,
    ObjectAssign,
    ReactJsx {
        pragma: String,
        pragma_frag: String,
        use_built_ins: bool,
    },
    AsyncToPromises {
        inline_helpers: bool,
        external_helpers: bool,
    },
}

/// Minifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinifyOptions {
    pub sourcemap: bool,
    pub ecma: u32,
    pub toplevel: bool,
    pub mangle: bool,
    pub keep_fnames: bool,
    pub keep_fargs: bool,
    pub keep_infinity: bool,
    pub pure_getters: bool,
    pub passes: u32,
    pub sequences: bool,
    pub loops: bool,
    pub conditionals: bool,
    pub join_vars: bool,
    pub if_return: bool,
    pub output: MinifyOutput,
}

/// Code generation options of the minifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinifyOutput {
    pub beautify: bool,
    pub comments: bool,
    /// Always wrap control-flow bodies in braces.
    pub braces: bool,
    /// Indentation width when beautifying; the minifier default otherwise.
    pub indent_level: Option<u32>,
}

impl MinifyOptions {
    /// Readable output for development builds: no statement merging, names kept.
    pub fn pretty() -> Self {
        Self {
            sourcemap: true,
            ecma: 5,
            toplevel: true,
            mangle: false,
            keep_fnames: true,
            keep_fargs: true,
            keep_infinity: false,
            pure_getters: true,
            passes: 1,
            sequences: false,
            loops: false,
            conditionals: false,
            join_vars: false,
            if_return: false,
            output: MinifyOutput {
                beautify: true,
                comments: true,
                braces: true,
                indent_level: Some(2),
            },
        }
    }

    /// Fully minified output for production builds.
    pub fn minified() -> Self {
        Self {
            sourcemap: true,
            ecma: 5,
            toplevel: true,
            mangle: true,
            keep_fnames: false,
            keep_fargs: false,
            keep_infinity: true,
            pure_getters: true,
            passes: 10,
            sequences: true,
            loops: true,
            conditionals: true,
            join_vars: true,
            if_return: true,
            output: MinifyOutput {
                beautify: false,
                comments: false,
                braces: false,
                indent_level: None,
            },
        }
    }
}

/// Ordered transform stages for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformPipeline {
    stages: Vec<TransformCapability>,
}

impl TransformPipeline {
    /// Pipeline for the given profile.
    ///
    /// `root` anchors the tsconfig and cache paths; declarations go to
    /// `types/` under `out_dir`.
    pub fn for_profile(
        production: bool,
        root: &Path,
        out_dir: &Path,
        externals: &ExternalClassifier,
    ) -> Self {
        let mut stages = vec![
            TransformCapability::NodeResolve {
                main_fields: vec!["module".into(), "jsnext".into(), "main".into()],
                browser: true,
            },
            TransformCapability::CommonJs {
                ignore_global: true,
                include: "/node_modules/".to_string(),
                named_exports_from: if externals.contains("react") {
                    vec!["react".to_string()]
                } else {
                    Vec::new()
                },
            },
            TransformCapability::TypeScript {
                tsconfig: root.join("tsconfig.json"),
                cache_root: root.join("node_modules/.cache/.rts2_cache"),
                declaration: !production,
                declaration_dir: out_dir.join("types"),
                target: "es6".to_string(),
                source_map: true,
                exclude: TYPESCRIPT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            },
            TransformCapability::Buble {
                unicode_reg_exp: false,
                dangerous_for_of: true,
                dangerous_tagged_template_string: true,
                object_assign: "Object.assign".to_string(),
                exclude: NODE_MODULES_GLOB.to_string(),
            },
            TransformCapability::Babel {
                exclude: NODE_MODULES_GLOB.to_string(),
                plugins: vec![
                    BabelPlugin::InvariantWarning,
                    BabelPlugin::ClosureElimination,
                    BabelPlugin::ObjectAssign,
                    BabelPlugin::ReactJsx {
                        pragma: "React.createElement".to_string(),
                        pragma_frag: "React.Fragment".to_string(),
                        use_built_ins: true,
                    },
                    BabelPlugin::AsyncToPromises {
                        inline_helpers: true,
                        external_helpers: true,
                    },
                ],
            },
        ];

        if production {
            let production_literal = "\"production\"".to_string();
            let mut values = IndexMap::new();
            values.insert("ENVIRONMENT".to_string(), production_literal.clone());
            values.insert("process.env.NODE_ENV".to_string(), production_literal);
            stages.push(TransformCapability::Replace { values });
        }

        stages.push(TransformCapability::Minify(if production {
            MinifyOptions::minified()
        } else {
            MinifyOptions::pretty()
        }));

        Self { stages }
    }

    /// Build a pipeline from explicit stages.
    pub fn from_stages(stages: Vec<TransformCapability>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[TransformCapability] {
        &self.stages
    }

    /// Stage names in order, for logging.
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(TransformCapability::name).collect()
    }
}
