//! Error types for qrxfer operations

use thiserror::Error;

/// Errors that can occur while packaging, framing or reassembling a transfer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// Carrier capacity leaves no room for chunk data
    #[error("Carrier capacity {capacity} is too small to hold any fragment data")]
    CapacityTooSmall {
        /// The carrier capacity that was requested.
        capacity: usize,
    },

    /// Zero-length payload or blob
    #[error("Refusing to package an empty payload")]
    EmptyPayload,

    /// Wire text or frame bytes could not be parsed into a fragment
    #[error("Malformed fragment: {0}")]
    MalformedFragment(String),

    /// Frame format version this build does not understand
    #[error("Unsupported fragment version: {0}")]
    UnsupportedVersion(u8),

    /// Fragments of one transfer disagree on the format version
    #[error("Version mismatch: expected {expected}, got {found}")]
    VersionMismatch {
        /// Version of the first fragment.
        expected: u8,
        /// Version of the offending fragment.
        found: u8,
    },

    /// Fragments of one transfer disagree on the fragment count
    #[error("Inconsistent total: expected {expected} parts, fragment claims {found}")]
    InconsistentTotal {
        /// Total announced by the first fragment.
        expected: u32,
        /// Total announced by the offending fragment.
        found: u32,
    },

    /// Some fragments were never supplied
    #[error("Missing parts: {0:?}")]
    MissingParts(Vec<u32>),

    /// Two fragments share an index but carry different bytes
    #[error("Conflicting fragment content for part {0}")]
    ConflictingFragment(u32),

    /// Reconstructed data does not match its digest
    #[error("Integrity check failed: digest does not match reconstructed data")]
    IntegrityFailure,

    /// Decrypted bytes are not a serialized package
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// Fragment count exceeds the format limit
    #[error("Fragment count {total} exceeds maximum {max}")]
    TooManyFragments {
        /// Requested fragment count.
        total: usize,
        /// Maximum supported fragment count.
        max: usize,
    },

    /// An encoded fragment does not fit the carrier
    #[error("Part {index} is {size} bytes encoded, carrier holds {max}")]
    FragmentTooLarge {
        /// Index of the fragment (1-based, 1 for the single-fragment form).
        index: u32,
        /// Encoded size in bytes.
        size: usize,
        /// Carrier capacity in bytes.
        max: usize,
    },

    /// No fragments were supplied at all
    #[error("No fragments provided")]
    NoFragments,

    /// Decryption failed (wrong password or tampered ciphertext)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Decompression or other collaborator decoding failed
    #[error("Decode error: {0}")]
    Decode(String),
}
