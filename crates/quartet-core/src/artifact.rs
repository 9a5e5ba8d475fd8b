//! Emitted artifacts and the opaque cross-step cache handle.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One emitted output file.
///
/// `code` is `None` for files that carry no emitted code (source maps and
/// other assets); those are excluded from size reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    pub file_name: String,
    pub code: Option<String>,
}

impl BundleArtifact {
    /// A code chunk.
    pub fn chunk(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            code: Some(code.into()),
        }
    }

    /// A non-code asset such as a source map.
    pub fn asset(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            code: None,
        }
    }

    /// Uncompressed size of the emitted code.
    pub fn byte_size(&self) -> Option<usize> {
        self.code.as_ref().map(String::len)
    }
}

/// Opaque state from one compilation, reused by the next one.
///
/// Only the engine that produced a handle knows what is inside; the
/// orchestrator just moves it from one step to the next. Cloning is cheap.
#[derive(Clone)]
pub struct CacheHandle(Arc<dyn Any + Send + Sync>);

impl CacheHandle {
    pub fn new<T: Any + Send + Sync>(state: T) -> Self {
        Self(Arc::new(state))
    }

    /// Borrow the engine-specific state, if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles share the same state.
    pub fn ptr_eq(&self, other: &CacheHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CacheHandle(..)")
    }
}
