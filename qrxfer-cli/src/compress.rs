//! zstd compression for transfers

use qrxfer_core::{Compressor, PackError};

/// Compression level used when none is given
pub const DEFAULT_LEVEL: i32 = 16;

/// Compressor backed by zstd
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    /// Create a compressor at `level` (1..=22)
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    /// Compression level in use
    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, PackError> {
        zstd::encode_all(data, self.level)
            .map_err(|e| PackError::Decode(format!("zstd compression failed: {}", e)))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, PackError> {
        zstd::decode_all(data)
            .map_err(|e| PackError::Decode(format!("zstd decompression failed: {}", e)))
    }
}
