//! Error types for manifest loading and settings validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Package manifest errors
    #[error("package manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("invalid package manifest {}: {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("package manifest has no '{field}' field\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    // Settings errors
    #[error("invalid config value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },

    #[error("failed to load settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Settings(Box::new(err))
    }
}
