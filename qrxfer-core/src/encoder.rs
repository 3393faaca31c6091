//! Fragment encoding

use crate::constants::FRAGMENT_MARKER;
use crate::error::PackError;
use crate::transport;
use crate::types::Fragment;
use bytes::{BufMut, Bytes, BytesMut};

/// Encode a fragment into its binary frame
///
/// The frame is encoded with the following layout:
/// 1. Marker (3 bytes): "QXF"
/// 2. Header:
///    - Version (1 byte)
///    - Index (4 bytes, big-endian)
///    - Total (4 bytes, big-endian)
///    - Chunk length (4 bytes, big-endian)
/// 3. Chunk (variable length)
///
/// Encoding is deterministic: the same fragment always yields the same bytes.
pub fn encode_fragment(fragment: &Fragment) -> Result<Bytes, PackError> {
    fragment.validate()?;

    let chunk_len = u32::try_from(fragment.chunk.len()).map_err(|_| {
        PackError::MalformedFragment(format!(
            "chunk of {} bytes does not fit the length field",
            fragment.chunk.len()
        ))
    })?;

    let mut buf = BytesMut::with_capacity(fragment.frame_size());

    // Write marker
    buf.put_slice(FRAGMENT_MARKER);

    // Write header
    buf.put_u8(fragment.version);
    buf.put_u32(fragment.index);
    buf.put_u32(fragment.total);
    buf.put_u32(chunk_len);

    // Write chunk
    buf.put_slice(&fragment.chunk);

    Ok(buf.freeze())
}

/// Encode a fragment into carrier text (binary frame, then transport encoding)
pub fn encode_wire(fragment: &Fragment) -> Result<String, PackError> {
    let frame = encode_fragment(fragment)?;
    Ok(transport::encode(&frame))
}

/// Encode a sequence of fragments into carrier text, preserving order
pub fn encode_all(fragments: &[Fragment]) -> Result<Vec<String>, PackError> {
    fragments.iter().map(encode_wire).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FRAGMENT_HEADER_SIZE;

    #[test]
    fn test_encode_simple_fragment() {
        let frag = Fragment::new(1, 3, Bytes::from_static(b"hello"));
        let encoded = encode_fragment(&frag).unwrap();

        // Check marker
        assert_eq!(&encoded[0..3], b"QXF");

        // Check version
        assert_eq!(encoded[3], 2);

        // Check index/total/len (big-endian)
        assert_eq!(&encoded[4..8], &1u32.to_be_bytes());
        assert_eq!(&encoded[8..12], &3u32.to_be_bytes());
        assert_eq!(&encoded[12..16], &5u32.to_be_bytes());
        assert_eq!(&encoded[16..], b"hello");
        assert_eq!(encoded.len(), FRAGMENT_HEADER_SIZE + 5);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let frag = Fragment::new(2, 2, Bytes::from_static(b"\x00\x01\x02"));
        assert_eq!(encode_wire(&frag).unwrap(), encode_wire(&frag).unwrap());
    }

    #[test]
    fn test_wire_starts_with_marker_text() {
        let frag = Fragment::new(1, 1, Bytes::from_static(b"x"));
        assert!(encode_wire(&frag).unwrap().starts_with("UVhG"));
    }

    #[test]
    fn test_encode_rejects_invalid_position() {
        let frag = Fragment::new(3, 2, Bytes::new());
        assert!(matches!(encode_fragment(&frag), Err(PackError::MalformedFragment(_))));
    }
}
