//! Splitting an encrypted blob into ordered fragments

use crate::constants::{FORMAT_VERSION, MAX_FRAGMENTS};
use crate::error::PackError;
use crate::types::Fragment;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::debug;

/// Split a blob into fragments of at most `chunk_size` bytes in the current format
///
/// Slices are contiguous and non-overlapping; only the last one may be shorter.
/// Fragments share the blob's buffer rather than copying it.
pub fn split(blob: impl Into<Bytes>, chunk_size: usize) -> Result<Vec<Fragment>, PackError> {
    split_with_version(blob, chunk_size, FORMAT_VERSION)
}

/// Split a blob into fragments carrying an explicit framing version
pub fn split_with_version(
    blob: impl Into<Bytes>,
    chunk_size: usize,
    version: u8,
) -> Result<Vec<Fragment>, PackError> {
    let blob: Bytes = blob.into();

    if blob.is_empty() {
        return Err(PackError::EmptyPayload);
    }

    if chunk_size == 0 {
        return Err(PackError::CapacityTooSmall { capacity: 0 });
    }

    let total = blob.len().div_ceil(chunk_size);
    if total > MAX_FRAGMENTS {
        return Err(PackError::TooManyFragments {
            total,
            max: MAX_FRAGMENTS,
        });
    }

    #[cfg(feature = "logging")]
    debug!(
        "Splitting {} bytes into {} fragments of up to {} bytes",
        blob.len(),
        total,
        chunk_size
    );

    let fragments = (0..total)
        .map(|i| {
            let start = i * chunk_size;
            let end = (start + chunk_size).min(blob.len());
            Fragment::with_version(version, i as u32 + 1, total as u32, blob.slice(start..end))
        })
        .collect();

    Ok(fragments)
}
