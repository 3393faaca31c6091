//! Reversible text encoding between frame bytes and carrier text
//!
//! Standard base64 alphabet with `=` padding. The padding is kept because
//! pasted text segmentation relies on it.

use crate::constants::TRANSPORT_RATIO;
use crate::error::PackError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode bytes into carrier-safe text
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode carrier text into bytes, ignoring surrounding whitespace
pub fn decode(text: &str) -> Result<Vec<u8>, PackError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| PackError::MalformedFragment(format!("invalid transport encoding: {}", e)))
}

/// Length of the encoded text for `len` input bytes
pub const fn encoded_len(len: usize) -> usize {
    let (out, inp) = TRANSPORT_RATIO;
    len.div_ceil(inp) * out
}

/// Largest input length whose encoded text fits in `capacity` characters
pub const fn max_decoded_len(capacity: usize) -> usize {
    let (out, inp) = TRANSPORT_RATIO;
    (capacity / out) * inp
}
