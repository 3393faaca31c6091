//! Fuzzing entry points for qrxfer-core
//!
//! Each function takes arbitrary bytes and must never panic. They are
//! shaped for cargo-fuzz targets:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decode

use bytes::Bytes;
use qrxfer_core::{
    assembler::AssemblySession,
    decoder::{decode_fragment, decode_wire, is_multipart},
    package::unwrap,
    scanner::scan_pasted,
    types::Fragment,
};

/// Decode arbitrary bytes both as a raw frame and as carrier text
pub fn fuzz_decode(data: &[u8]) {
    let _ = decode_fragment(data);

    let text = String::from_utf8_lossy(data);
    let decoded = decode_wire(&text);
    assert_eq!(decoded.is_ok(), is_multipart(&text));
}

/// Segment and decode arbitrary pasted text
pub fn fuzz_segment(data: &[u8]) {
    let text = String::from_utf8_lossy(data);
    let (fragments, stats) = scan_pasted(&text);
    assert_eq!(fragments.len(), stats.fragments_found);
}

/// Feed fragments built from arbitrary bytes into a session
///
/// Every 8 input bytes become a (index, total) pair with a short chunk.
pub fn fuzz_assemble(data: &[u8]) {
    let mut session = AssemblySession::new();

    for window in data.chunks(8) {
        if window.len() < 8 {
            break;
        }
        let index = u32::from(u16::from_be_bytes([window[0], window[1]]));
        let total = u32::from(u16::from_be_bytes([window[2], window[3]]));
        let chunk = Bytes::copy_from_slice(&window[4..]);
        let _ = session.add(Fragment::new(index, total, chunk));
    }

    if let Ok(assembled) = session.finish() {
        let _ = unwrap(&assembled);
    }
}
