//! Segmentation of pasted text holding several wire fragments
//!
//! Users sometimes paste the text of several codes as one string. Fragments
//! separated by whitespace are always recovered. Fragments glued together
//! are split after each run of transport padding (`=`), which can only occur
//! at the end of an encoded fragment. This is a best-effort heuristic: a
//! fragment whose frame length is a multiple of three has no padding, so it
//! cannot be told apart from the fragment that follows it.

use crate::constants::TRANSPORT_PADDING;
use crate::decoder::decode_wire;
use crate::types::Fragment;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Statistics from scanning pasted text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Number of candidate segments found
    pub segments: usize,

    /// Number of segments that decoded as fragments
    pub fragments_found: usize,

    /// Number of segments that failed to decode
    pub decode_failures: usize,
}

impl ScanStats {
    /// Share of segments that decoded, in percent
    pub fn recovery_rate(&self) -> f64 {
        if self.segments == 0 {
            0.0
        } else {
            (self.fragments_found as f64 / self.segments as f64) * 100.0
        }
    }
}

/// Split pasted text into candidate wire fragments
pub fn segment_pasted(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for token in text.split_whitespace() {
        split_on_padding(token, &mut segments);
    }
    segments
}

/// Split one whitespace-free token after every padding run
fn split_on_padding(token: &str, out: &mut Vec<String>) {
    let bytes = token.as_bytes();
    let mut start = 0;
    let mut positions = memchr::memchr_iter(TRANSPORT_PADDING, bytes).peekable();

    while let Some(pos) = positions.next() {
        let mut end = pos + 1;
        while positions.peek() == Some(&end) {
            positions.next();
            end += 1;
        }
        out.push(token[start..end].to_string());
        start = end;
    }

    if start < bytes.len() {
        out.push(token[start..].to_string());
    }
}

/// Segment pasted text and decode every segment that is a fragment
pub fn scan_pasted(text: &str) -> (Vec<Fragment>, ScanStats) {
    let segments = segment_pasted(text);
    let mut stats = ScanStats {
        segments: segments.len(),
        ..ScanStats::default()
    };
    let mut fragments = Vec::with_capacity(segments.len());

    for (_i, segment) in segments.iter().enumerate() {
        match decode_wire(segment) {
            Ok(fragment) => {
                #[cfg(feature = "logging")]
                debug!("Segment {} decoded as {}", _i, fragment.info());

                stats.fragments_found += 1;
                fragments.push(fragment);
            }
            Err(_e) => {
                #[cfg(feature = "logging")]
                warn!("Segment {} is not a fragment: {}", _i, _e);

                stats.decode_failures += 1;
            }
        }
    }

    (fragments, stats)
}
