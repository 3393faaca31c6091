//! Core types for qrxfer fragments

use crate::constants::{is_known_version, FORMAT_VERSION, FRAGMENT_HEADER_SIZE, MAX_FRAGMENTS};
use crate::error::PackError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One transport unit of a multi-part transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Framing format version
    pub version: u8,

    /// Position of this fragment, 1-based
    pub index: u32,

    /// Number of fragments in the transfer
    pub total: u32,

    /// Slice of the encrypted blob carried by this fragment
    pub chunk: Bytes,
}

impl Fragment {
    /// Create a fragment in the current framing format
    pub fn new(index: u32, total: u32, chunk: Bytes) -> Self {
        Self::with_version(FORMAT_VERSION, index, total, chunk)
    }

    /// Create a fragment with an explicit framing version
    pub fn with_version(version: u8, index: u32, total: u32, chunk: Bytes) -> Self {
        Self {
            version,
            index,
            total,
            chunk,
        }
    }

    /// Validate version and position fields
    pub fn validate(&self) -> Result<(), PackError> {
        if !is_known_version(self.version) {
            return Err(PackError::UnsupportedVersion(self.version));
        }

        if self.index == 0 || self.total == 0 {
            return Err(PackError::MalformedFragment(format!(
                "index and total must be positive, got {}/{}",
                self.index, self.total
            )));
        }

        if self.index > self.total {
            return Err(PackError::MalformedFragment(format!(
                "index {} exceeds total {}",
                self.index, self.total
            )));
        }

        if self.total as usize > MAX_FRAGMENTS {
            return Err(PackError::TooManyFragments {
                total: self.total as usize,
                max: MAX_FRAGMENTS,
            });
        }

        Ok(())
    }

    /// Size of the binary frame for this fragment
    pub fn frame_size(&self) -> usize {
        FRAGMENT_HEADER_SIZE + self.chunk.len()
    }

    /// Header summary without the chunk bytes
    pub fn info(&self) -> FragmentInfo {
        FragmentInfo {
            version: self.version,
            index: self.index,
            total: self.total,
        }
    }
}

/// Position metadata of a fragment, as shown to a user collecting parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentInfo {
    /// Framing format version
    pub version: u8,

    /// Position of the fragment, 1-based
    pub index: u32,

    /// Number of fragments in the transfer
    pub total: u32,
}

impl core::fmt::Display for FragmentInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Part {}/{}", self.index, self.total)
    }
}
