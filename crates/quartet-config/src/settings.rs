//! Layered build settings.
//!
//! Priority: environment (`QUARTET_*`) > `quartet.toml` > defaults. The project
//! root is always passed in explicitly; nothing here reads the process
//! working directory.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Optional settings file looked up under the project root.
pub const SETTINGS_FILE: &str = "quartet.toml";

/// Settings resolved once per invocation and threaded through every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Project root containing `package.json`.
    #[serde(default)]
    pub root: PathBuf,

    /// Entry module, relative to `root`.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Distribution directory, relative to `root`.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Globs (relative to `root`) whose changes never trigger a rebuild.
    #[serde(default = "default_watch_exclude")]
    pub watch_exclude: Vec<String>,

    /// Window in which repeated change events are coalesced.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

pub fn default_input() -> PathBuf {
    PathBuf::from("./src/index.ts")
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("./dist")
}

pub fn default_watch_exclude() -> Vec<String> {
    vec!["node_modules/**".to_string()]
}

pub fn default_debounce_ms() -> u64 {
    50
}

impl BuildSettings {
    /// Defaults anchored at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            input: default_input(),
            out_dir: default_out_dir(),
            watch_exclude: default_watch_exclude(),
            debounce_ms: default_debounce_ms(),
        }
    }

    /// Load settings for the project at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `quartet.toml` or the environment hold values of
    /// the wrong type, or if the merged settings fail validation.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut figment = Figment::new().merge(Serialized::defaults(Self::new(root)));

        let settings_file = root.join(SETTINGS_FILE);
        if settings_file.exists() {
            tracing::debug!(path = %settings_file.display(), "merging settings file");
            figment = figment.merge(Toml::file(&settings_file));
        }

        figment = figment.merge(Env::prefixed("QUARTET_").ignore(&["root"]));

        let mut settings: Self = figment.extract()?;
        // The root is fixed by the caller, never by a settings source.
        settings.root = root.to_path_buf();
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the rest of the build relies on.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "input".to_string(),
                hint: "entry module path cannot be empty".to_string(),
            });
        }

        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "out_dir".to_string(),
                hint: "output directory cannot be empty".to_string(),
            });
        }

        if self.watch_exclude.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "watch_exclude".to_string(),
                hint: "dependency directories must stay excluded from watching".to_string(),
            });
        }

        Ok(())
    }

    /// Entry module resolved against the root.
    pub fn input_path(&self) -> PathBuf {
        self.root.join(&self.input)
    }

    /// Distribution directory resolved against the root.
    pub fn out_path(&self) -> PathBuf {
        self.root.join(&self.out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults_without_settings_file() {
        let dir = TempDir::new().unwrap();
        let settings = BuildSettings::load(dir.path()).unwrap();

        assert_eq!(settings.root, dir.path());
        assert_eq!(settings.input, PathBuf::from("./src/index.ts"));
        assert_eq!(settings.out_dir, PathBuf::from("./dist"));
        assert_eq!(settings.watch_exclude, vec!["node_modules/**".to_string()]);
        assert_eq!(settings.input_path(), dir.path().join("./src/index.ts"));
    }

    #[test]
    #[serial]
    fn test_settings_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"
input = "lib/main.ts"
out_dir = "build"
debounce_ms = 200
"#,
        )
        .unwrap();

        let settings = BuildSettings::load(dir.path()).unwrap();
        assert_eq!(settings.input, PathBuf::from("lib/main.ts"));
        assert_eq!(settings.out_dir, PathBuf::from("build"));
        assert_eq!(settings.debounce_ms, 200);
        assert_eq!(settings.watch_exclude, default_watch_exclude());
    }

    #[test]
    #[serial]
    fn test_settings_file_cannot_move_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "root = \"/elsewhere\"\n").unwrap();

        let settings = BuildSettings::load(dir.path()).unwrap();
        assert_eq!(settings.root, dir.path());
    }

    #[test]
    #[serial]
    fn test_invalid_settings_type_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "debounce_ms = \"soon\"\n").unwrap();

        let err = BuildSettings::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    #[serial]
    fn test_empty_watch_exclude_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "watch_exclude = []\n").unwrap();

        let err = BuildSettings::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "watch_exclude"));
    }

    #[test]
    fn test_validate_rejects_empty_input() {
        let mut settings = BuildSettings::new("/p");
        settings.input = PathBuf::new();
        assert!(settings.validate().is_err());
    }
}
