//! Library entry for qrxfer-cli used by integration tests and embedding.

pub mod commands;
pub mod compress;
pub mod crypto;

// Re-export commands for convenience
pub use commands::*;

pub use compress::ZstdCompressor;
pub use crypto::PasswordCipher;

use qrxfer_core::Transfer;

/// The transfer the `qrxfer` binary uses: password encryption over zstd
pub type FileTransfer = Transfer<PasswordCipher, ZstdCompressor>;
