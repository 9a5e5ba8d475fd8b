//! Error kinds for the build orchestration core.
//!
//! Only setup failures may carry a process exit-code override. Every other
//! kind maps to the default failure code. A package manifest that exists but
//! cannot be read becomes a setup error carrying the OS error number.

use quartet_config::{BuildStep, ConfigError};

/// Exit code used for every failure without an explicit override.
pub const DEFAULT_FAILURE_CODE: i32 = 1;

/// Failure reported by an external collaborator (engine, compressor, watcher).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error with a message.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::with_source(format!("I/O error: {}", err), err)
    }
}

/// Errors surfaced by the orchestrator and the watch supervisor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Setup failed before any step ran.
    #[error("Setup failed: {message}")]
    Setup {
        message: String,
        /// Process exit code requested by the failing collaborator.
        exit_code: Option<i32>,
    },

    /// Settings or package manifest could not be loaded.
    #[error("Configuration error: {0}")]
    Config(ConfigError),

    /// A matrix step failed in one-shot mode.
    #[error("Build step {step} failed: {source}")]
    Step {
        step: BuildStep,
        #[source]
        source: EngineError,
    },

    /// A watcher reported a fatal event.
    #[error("Watcher for {step} failed: {source}")]
    WatchFatal {
        step: BuildStep,
        #[source]
        source: EngineError,
    },
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => Error::Setup {
                message: format!("failed to read package manifest: {}", io),
                exit_code: io.raw_os_error(),
            },
            other => Error::Config(other),
        }
    }
}

/// Result type alias for orchestration operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Setup error without an exit-code override.
    pub fn setup(message: impl Into<String>) -> Self {
        Error::Setup {
            message: message.into(),
            exit_code: None,
        }
    }

    /// Whether this error happened before any step ran.
    pub fn is_setup(&self) -> bool {
        matches!(self, Error::Setup { .. } | Error::Config(_))
    }

    /// Process exit code for this failure.
    ///
    /// A setup override of `0` would report success for a failed run, so it
    /// falls back to the default code as well.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Setup {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => DEFAULT_FAILURE_CODE,
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Setup { .. } => "SETUP_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Step { .. } => "STEP_ERROR",
            Error::WatchFatal { .. } => "WATCH_FATAL",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(_) => Some(Box::new(
                "Check package.json and quartet.toml in the project root.",
            )),
            Error::WatchFatal { .. } => Some(Box::new(
                "The watcher cannot recover; fix the error and restart watch mode.",
            )),
            _ => None,
        }
    }
}
