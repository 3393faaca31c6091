//! Fragment decoding (strict mode)

use crate::constants::{FRAGMENT_HEADER_SIZE, FRAGMENT_MARKER};
use crate::error::PackError;
use crate::transport;
use crate::types::{Fragment, FragmentInfo};
use bytes::Bytes;

/// Decode a fragment from its binary frame
///
/// This function performs strict validation:
/// - Validates marker
/// - Validates version (current and legacy are accepted)
/// - Validates that the chunk length matches the remaining bytes exactly
/// - Validates `1 <= index <= total`
pub fn decode_fragment(data: &[u8]) -> Result<Fragment, PackError> {
    decode_fragment_from_bytes(Bytes::copy_from_slice(data))
}

/// Decode a fragment from a byte buffer without copying the chunk
pub fn decode_fragment_from_bytes(buf: Bytes) -> Result<Fragment, PackError> {
    if buf.len() < FRAGMENT_HEADER_SIZE {
        return Err(PackError::MalformedFragment(format!(
            "frame is {} bytes, header needs {}",
            buf.len(),
            FRAGMENT_HEADER_SIZE
        )));
    }

    if &buf[0..3] != FRAGMENT_MARKER {
        return Err(PackError::MalformedFragment("missing fragment marker".into()));
    }

    let version = buf[3];
    let index = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let total = u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);
    let chunk_len = u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]) as usize;

    let actual = buf.len() - FRAGMENT_HEADER_SIZE;
    if chunk_len != actual {
        return Err(PackError::MalformedFragment(format!(
            "chunk length field says {}, frame carries {}",
            chunk_len, actual
        )));
    }

    let fragment = Fragment::with_version(version, index, total, buf.slice(FRAGMENT_HEADER_SIZE..));
    fragment.validate()?;

    Ok(fragment)
}

/// Decode a fragment from carrier text
pub fn decode_wire(wire: &str) -> Result<Fragment, PackError> {
    let frame = transport::decode(wire)?;
    decode_fragment_from_bytes(Bytes::from(frame))
}

/// Check whether carrier text is an enveloped multi-part fragment
///
/// Never fails; returns true exactly when [`decode_wire`] would succeed.
pub fn is_multipart(wire: &str) -> bool {
    decode_wire(wire).is_ok()
}

/// Read the position of a multi-part fragment from carrier text
pub fn fragment_info(wire: &str) -> Result<FragmentInfo, PackError> {
    decode_wire(wire).map(|f| f.info())
}
