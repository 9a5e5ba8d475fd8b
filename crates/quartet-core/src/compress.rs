//! Gzip size measurement.

use std::io::Write;

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::capability::Compressor;
use crate::error::EngineError;

/// Measures gzip-compressed size at the default compression level.
///
/// Compression runs on the blocking pool so large bundles do not stall the
/// runtime.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }

    /// Use an explicit compression level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new()
    }
}

fn gzip_len(bytes: &[u8], level: Compression) -> std::io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), level);
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?.len() as u64)
}

#[async_trait]
impl Compressor for GzipCompressor {
    async fn compressed_size(&self, bytes: &[u8]) -> Result<u64, EngineError> {
        let owned = bytes.to_vec();
        let level = self.level;

        tokio::task::spawn_blocking(move || gzip_len(&owned, level))
            .await
            .map_err(|e| EngineError::with_source("gzip task failed", e))?
            .map_err(|e| EngineError::with_source("gzip compression failed", e))
    }
}
