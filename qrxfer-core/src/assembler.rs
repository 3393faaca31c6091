//! Order-independent reassembly of fragments

use crate::decoder::decode_wire;
use crate::error::PackError;
use crate::types::Fragment;
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// What to do when two fragments share an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later fragment replaces the earlier one
    #[default]
    LastWins,

    /// Identical duplicates are accepted, differing ones fail with `ConflictingFragment`
    RejectConflicting,
}

/// Snapshot of a session after accepting a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Index of the fragment just accepted
    pub index: u32,

    /// Number of distinct indices held
    pub received: usize,

    /// Number of fragments in the transfer
    pub total: u32,
}

impl Progress {
    /// Whether every index is present
    pub fn is_complete(&self) -> bool {
        self.received == self.total as usize
    }

    /// Share of distinct fragments received, in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.received as f64 / self.total as f64) * 100.0
        }
    }
}

/// Receiver-side state while fragments are collected one at a time
///
/// The first accepted fragment fixes `version` and `total`; every later
/// fragment is checked against them. A rejected fragment leaves the
/// session unchanged.
#[derive(Debug, Clone, Default)]
pub struct AssemblySession {
    policy: DuplicatePolicy,
    version: Option<u8>,
    total: Option<u32>,
    chunks: BTreeMap<u32, Bytes>,
}

impl AssemblySession {
    /// Create an empty session with last-wins duplicate handling
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with an explicit duplicate policy
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Accept a decoded fragment
    pub fn add(&mut self, fragment: Fragment) -> Result<Progress, PackError> {
        fragment.validate()?;

        if let Some(expected) = self.version {
            if fragment.version != expected {
                return Err(PackError::VersionMismatch {
                    expected,
                    found: fragment.version,
                });
            }
        }

        if let Some(expected) = self.total {
            if fragment.total != expected {
                return Err(PackError::InconsistentTotal {
                    expected,
                    found: fragment.total,
                });
            }
        }

        if let Some(existing) = self.chunks.get(&fragment.index) {
            if *existing != fragment.chunk {
                match self.policy {
                    DuplicatePolicy::RejectConflicting => {
                        return Err(PackError::ConflictingFragment(fragment.index));
                    }
                    DuplicatePolicy::LastWins => {
                        #[cfg(feature = "logging")]
                        warn!(
                            "Part {} received twice with different content, keeping the later one",
                            fragment.index
                        );
                    }
                }
            } else {
                #[cfg(feature = "logging")]
                debug!("Duplicate part {} ignored", fragment.index);
            }
        }

        self.version = Some(fragment.version);
        self.total = Some(fragment.total);
        let index = fragment.index;
        self.chunks.insert(index, fragment.chunk);

        #[cfg(feature = "logging")]
        debug!("Accepted part {}/{}", index, fragment.total);

        Ok(Progress {
            index,
            received: self.chunks.len(),
            total: fragment.total,
        })
    }

    /// Decode carrier text and accept the fragment
    pub fn add_wire(&mut self, wire: &str) -> Result<Progress, PackError> {
        let fragment = decode_wire(wire)?;
        self.add(fragment)
    }

    /// Framing version fixed by the first fragment
    pub fn version(&self) -> Option<u8> {
        self.version
    }

    /// Fragment count fixed by the first fragment
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// Number of distinct indices held
    pub fn received(&self) -> usize {
        self.chunks.len()
    }

    /// Indices not yet received, ascending
    pub fn missing(&self) -> Vec<u32> {
        match self.total {
            Some(total) => (1..=total).filter(|i| !self.chunks.contains_key(i)).collect(),
            None => Vec::new(),
        }
    }

    /// Whether every index of the transfer is present
    pub fn is_complete(&self) -> bool {
        self.total
            .is_some_and(|total| self.chunks.len() == total as usize)
    }

    /// Drop all collected fragments, keeping the duplicate policy
    pub fn clear(&mut self) {
        self.version = None;
        self.total = None;
        self.chunks.clear();
    }

    /// Concatenate the chunks in index order
    ///
    /// Fails with `NoFragments` on an empty session and with `MissingParts`
    /// listing every absent index otherwise.
    pub fn finish(&self) -> Result<Bytes, PackError> {
        let total = self.total.ok_or(PackError::NoFragments)?;

        let missing = self.missing();
        if !missing.is_empty() {
            #[cfg(feature = "logging")]
            warn!("Cannot assemble: {} of {} parts missing", missing.len(), total);

            return Err(PackError::MissingParts(missing));
        }

        let size = self.chunks.values().map(Bytes::len).sum();
        let mut buf = BytesMut::with_capacity(size);
        for chunk in self.chunks.values() {
            buf.extend_from_slice(chunk);
        }

        #[cfg(feature = "logging")]
        debug!("Assembled {} parts into {} bytes", total, size);

        Ok(buf.freeze())
    }
}

/// Reassemble a complete snapshot of fragments, in any order
///
/// This function:
/// 1. Rejects an empty input
/// 2. Checks every fragment's version and total against the first fragment
/// 3. Maps index to chunk, resolving duplicates last-wins
/// 4. Reports every missing index
/// 5. Concatenates chunks in ascending index order
pub fn assemble<I>(fragments: I) -> Result<Bytes, PackError>
where
    I: IntoIterator<Item = Fragment>,
{
    assemble_with(fragments, DuplicatePolicy::default())
}

/// Reassemble a snapshot of fragments with an explicit duplicate policy
pub fn assemble_with<I>(fragments: I, policy: DuplicatePolicy) -> Result<Bytes, PackError>
where
    I: IntoIterator<Item = Fragment>,
{
    let fragments: Vec<Fragment> = fragments.into_iter().collect();

    let first = fragments.first().ok_or(PackError::NoFragments)?;
    let (version, total) = (first.version, first.total);

    for fragment in &fragments[1..] {
        if fragment.version != version {
            return Err(PackError::VersionMismatch {
                expected: version,
                found: fragment.version,
            });
        }
        if fragment.total != total {
            return Err(PackError::InconsistentTotal {
                expected: total,
                found: fragment.total,
            });
        }
    }

    let mut session = AssemblySession::with_policy(policy);
    for fragment in fragments {
        session.add(fragment)?;
    }

    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LEGACY_VERSION;

    fn frag(index: u32, total: u32, chunk: &'static [u8]) -> Fragment {
        Fragment::new(index, total, Bytes::from_static(chunk))
    }

    #[test]
    fn test_assemble_in_order() {
        let out = assemble(vec![frag(1, 3, b"ab"), frag(2, 3, b"cd"), frag(3, 3, b"e")]).unwrap();
        assert_eq!(out.as_ref(), b"abcde");
    }

    #[test]
    fn test_assemble_unordered() {
        let out = assemble(vec![frag(3, 3, b"e"), frag(1, 3, b"ab"), frag(2, 3, b"cd")]).unwrap();
        assert_eq!(out.as_ref(), b"abcde");
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(assemble(Vec::new()), Err(PackError::NoFragments));
    }

    #[test]
    fn test_assemble_missing_middle() {
        let result = assemble(vec![frag(1, 3, b"a"), frag(3, 3, b"c")]);
        assert_eq!(result, Err(PackError::MissingParts(vec![2])));
    }

    #[test]
    fn test_assemble_lists_every_missing_index() {
        let result = assemble(vec![frag(4, 6, b"d")]);
        assert_eq!(result, Err(PackError::MissingParts(vec![1, 2, 3, 5, 6])));
    }

    #[test]
    fn test_assemble_inconsistent_total() {
        let result = assemble(vec![frag(1, 3, b"a"), frag(2, 4, b"b")]);
        assert_eq!(
            result,
            Err(PackError::InconsistentTotal {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_assemble_version_mismatch() {
        let legacy = Fragment::with_version(LEGACY_VERSION, 2, 2, Bytes::from_static(b"b"));
        let result = assemble(vec![frag(1, 2, b"a"), legacy]);
        assert_eq!(
            result,
            Err(PackError::VersionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_assemble_duplicate_last_wins() {
        let out = assemble(vec![frag(1, 2, b"xx"), frag(2, 2, b"b"), frag(1, 2, b"a")]).unwrap();
        assert_eq!(out.as_ref(), b"ab");
    }

    #[test]
    fn test_assemble_duplicate_rejected_when_conflicting() {
        let fragments = vec![frag(1, 2, b"xx"), frag(2, 2, b"b"), frag(1, 2, b"a")];
        let result = assemble_with(fragments, DuplicatePolicy::RejectConflicting);
        assert_eq!(result, Err(PackError::ConflictingFragment(1)));

        let identical = vec![frag(1, 2, b"a"), frag(2, 2, b"b"), frag(1, 2, b"a")];
        let out = assemble_with(identical, DuplicatePolicy::RejectConflicting).unwrap();
        assert_eq!(out.as_ref(), b"ab");
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let fragments = vec![frag(2, 2, b"2"), frag(1, 2, b"1")];
        assert_eq!(assemble(fragments.clone()), assemble(fragments));
    }

    #[test]
    fn test_session_progress_and_missing() {
        let mut session = AssemblySession::new();
        assert!(session.missing().is_empty());
        assert!(!session.is_complete());

        let progress = session.add(frag(2, 3, b"b")).unwrap();
        assert_eq!(progress.received, 1);
        assert!(!progress.is_complete());
        assert_eq!(session.missing(), vec![1, 3]);
        assert_eq!(session.total(), Some(3));
        assert_eq!(session.version(), Some(2));

        session.add(frag(3, 3, b"c")).unwrap();
        let progress = session.add(frag(1, 3, b"a")).unwrap();
        assert!(progress.is_complete());
        assert_eq!(progress.percent(), 100.0);
        assert_eq!(session.finish().unwrap().as_ref(), b"abc");
    }

    #[test]
    fn test_session_rejects_without_mutation() {
        let mut session = AssemblySession::new();
        session.add(frag(1, 2, b"a")).unwrap();

        assert!(session.add(frag(2, 5, b"b")).is_err());
        assert_eq!(session.received(), 1);
        assert_eq!(session.total(), Some(2));
        assert_eq!(session.finish(), Err(PackError::MissingParts(vec![2])));
    }

    #[test]
    fn test_session_clear() {
        let mut session = AssemblySession::with_policy(DuplicatePolicy::RejectConflicting);
        session.add(frag(1, 2, b"a")).unwrap();
        session.clear();

        assert_eq!(session.finish(), Err(PackError::NoFragments));
        // A new transfer with a different total is accepted after clearing
        session.add(frag(1, 1, b"z")).unwrap();
        assert_eq!(session.finish().unwrap().as_ref(), b"z");
    }

    #[test]
    fn test_session_add_wire() {
        let wire = crate::encoder::encode_wire(&frag(1, 1, b"only")).unwrap();
        let mut session = AssemblySession::new();
        assert!(session.add_wire(&wire).unwrap().is_complete());
        assert!(session.add_wire("garbage").is_err());
    }
}
