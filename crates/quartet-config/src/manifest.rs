//! Package manifest (`package.json`) loading.
//!
//! Only the fields the build needs are read: the primary entry file and the
//! declared runtime/peer dependency names. Everything else in the manifest is
//! ignored.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Conventional manifest file name looked up under the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// The subset of `package.json` used to derive externals and output names.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    /// Primary entry file, e.g. `dist/urql.js`.
    #[serde(default)]
    pub main: Option<String>,

    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    #[serde(default)]
    pub peer_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    /// Read `<root>/package.json`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` if the file does not exist and
    /// `InvalidManifest` if it is not valid JSON of the expected shape.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(MANIFEST_FILE);
        if !path.exists() {
            return Err(ConfigError::ManifestNotFound(path));
        }

        let content = fs::read_to_string(&path)?;
        let manifest = Self::from_json(&content).map_err(|source| ConfigError::InvalidManifest {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            dependencies = manifest.dependencies.len(),
            peer_dependencies = manifest.peer_dependencies.len(),
            "loaded package manifest"
        );

        Ok(manifest)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Declared dependency names, peer dependencies first.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.peer_dependencies
            .keys()
            .chain(self.dependencies.keys())
            .map(String::as_str)
    }

    /// File stem of the `main` entry, used as the base name of every output.
    ///
    /// `dist/urql.js` yields `urql`; `lib/index.cjs.js` yields `index.cjs`.
    pub fn entry_basename(&self) -> Result<String> {
        let main = self.main.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "main".to_string(),
            hint: "Declare the primary entry file, e.g. \"main\": \"dist/my-lib.js\"".to_string(),
        })?;

        PathBuf::from(main)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "main".to_string(),
                hint: format!("'{}' does not name a file", main),
            })
    }
}
