//! Constants and limits for the qrxfer wire format

/// Fragment marker - 3 bytes so the base64 form starts with a fixed `UVhG`
pub const FRAGMENT_MARKER: &[u8; 3] = b"QXF";

/// Current framing format version (digest carried inside the encrypted package)
pub const FORMAT_VERSION: u8 = 2;

/// Superseded framing format version (digest carried beside the encrypted blob)
pub const LEGACY_VERSION: u8 = 1;

/// Size of the BLAKE3 digest in bytes
pub const DIGEST_SIZE: usize = 32;

/// Frame header size: marker + version + index + total + chunk_len
/// 3 (marker) + 1 (version) + 4 (index) + 4 (total) + 4 (chunk_len) = 16 bytes
pub const FRAGMENT_HEADER_SIZE: usize = 16;

/// Serialized package header: digest + data_len
pub const PACKAGE_HEADER_SIZE: usize = DIGEST_SIZE + 4;

/// Byte capacity of a version 40 QR code at low error correction
pub const DEFAULT_CARRIER_CAPACITY: usize = 2953;

/// Upper bound on fragments per transfer
pub const MAX_FRAGMENTS: usize = u16::MAX as usize;

/// Text expansion of the transport encoding: 4 output characters per 3 input bytes
pub const TRANSPORT_RATIO: (usize, usize) = (4, 3);

/// Padding character of the transport encoding
pub const TRANSPORT_PADDING: u8 = b'=';

/// Returns true if `version` is a framing version this build can decode
pub const fn is_known_version(version: u8) -> bool {
    version == FORMAT_VERSION || version == LEGACY_VERSION
}
