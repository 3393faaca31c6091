//! Integration tests for the complete seal → carry → open flow

mod common;

use bytes::Bytes;
use common::{RleCompressor, TagCipher};
use qrxfer_core::{
    assembler::{assemble, AssemblySession},
    chunker::{split, split_with_version},
    constants::{DIGEST_SIZE, LEGACY_VERSION},
    decoder::{decode_wire, fragment_info, is_multipart},
    encoder::{encode_all, encode_wire},
    package::{compute_digest, LegacyEnvelope},
    planner::plan,
    transfer::Passthrough,
    Cipher, Compressor, DuplicatePolicy, PackError, Transfer, TransferConfig,
};

fn transfer(password: &str, capacity: usize) -> Transfer<TagCipher, RleCompressor> {
    let config = TransferConfig {
        carrier_capacity: capacity,
        ..TransferConfig::default()
    };
    Transfer::with_config(TagCipher::new(password), RleCompressor, config)
}

/// Bytes without adjacent repeats, so run-length compression cannot shrink them
fn noise(len: u32) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

#[test]
fn test_ten_thousand_a_at_capacity_500() {
    let data = vec![b'A'; 10_000];

    // Step 1: Plan
    let plan = plan(data.len(), 500).unwrap();
    assert!(plan.fragment_count > 1);

    // Step 2: Split and encode
    let fragments = split(data.clone(), plan.chunk_size).unwrap();
    assert_eq!(fragments.len(), plan.fragment_count);
    let wires = encode_all(&fragments).unwrap();
    assert!(wires.iter().all(|w| w.len() <= 500));

    // Step 3: Decode in reverse order and assemble
    let decoded: Vec<_> = wires.iter().rev().map(|w| decode_wire(w).unwrap()).collect();
    let assembled = assemble(decoded).unwrap();

    assert_eq!(assembled.as_ref(), data.as_slice());
}

#[test]
fn test_full_workflow_multi_part() {
    let t = transfer("hunter2", 300);

    // Pseudo-random content does not compress under RLE, forcing several parts
    let payload: Vec<u8> = (0..4000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    let wires = t.seal(&payload).unwrap();

    assert!(wires.len() > 1);
    for (i, wire) in wires.iter().enumerate() {
        let info = fragment_info(wire).unwrap();
        assert_eq!(info.index, i as u32 + 1);
        assert_eq!(info.total, wires.len() as u32);
    }

    let mut shuffled = wires.clone();
    shuffled.rotate_left(wires.len() / 2);
    shuffled.swap(0, 1);

    assert_eq!(t.open(&shuffled).unwrap().as_ref(), payload.as_slice());
}

#[test]
fn test_full_workflow_single_part() {
    let t = transfer("hunter2", 2953);
    let payload = b"Hello World! ".repeat(40);

    let wires = t.seal(&payload).unwrap();

    assert_eq!(wires.len(), 1);
    assert!(!is_multipart(&wires[0]));
    assert_eq!(t.open(&wires).unwrap().as_ref(), payload.as_slice());
}

#[test]
fn test_wrong_password_is_not_integrity_failure() {
    let wires = transfer("right", 400).seal(&[0xAB; 3000]).unwrap();
    let result = transfer("wrong", 400).open(&wires);

    assert!(matches!(result, Err(PackError::Auth(_))));
}

#[test]
fn test_missing_fragments_are_listed() {
    let t = transfer("pw", 200);
    let payload = noise(2000);
    let wires = t.seal(&payload).unwrap();
    let total = wires.len() as u32;
    assert!(total >= 5);

    let kept: Vec<String> = wires
        .iter()
        .filter(|w| {
            let idx = fragment_info(w).unwrap().index;
            idx != 1 && idx != 4 && idx != total
        })
        .cloned()
        .collect();

    assert_eq!(
        t.open(&kept),
        Err(PackError::MissingParts(vec![1, 4, total]))
    );
}

#[test]
fn test_fragments_from_two_transfers_do_not_mix() {
    let t = transfer("pw", 200);
    let a = t.seal(&noise(1500)).unwrap();
    let b = t.seal(&noise(3000)).unwrap();
    assert_ne!(a.len(), b.len());

    let mixed = vec![a[0].clone(), b[1].clone()];
    assert!(matches!(
        t.open(&mixed),
        Err(PackError::InconsistentTotal { .. })
    ));
}

#[test]
fn test_pasted_glued_fragments() {
    let t = transfer("pw", 160);
    let payload: Vec<u8> = (0..700u32).map(|i| (i ^ (i >> 3)) as u8).collect();
    let wires = t.seal(&payload).unwrap();

    let pasted = wires.join("\r\n");
    assert_eq!(t.open_pasted(&pasted).unwrap().as_ref(), payload.as_slice());
}

#[test]
fn test_session_accretion_one_at_a_time() {
    let t = transfer("pw", 250);
    let payload = noise(1200);
    let wires = t.seal(&payload).unwrap();
    assert!(wires.len() > 2);

    let mut session = AssemblySession::new();
    for wire in wires.iter().skip(1) {
        let progress = session.add_wire(wire).unwrap();
        assert!(!progress.is_complete());
    }
    assert_eq!(t.open_session(&session), Err(PackError::MissingParts(vec![1])));

    let progress = session.add_wire(&wires[0]).unwrap();
    assert!(progress.is_complete());
    assert_eq!(t.open_session(&session).unwrap().as_ref(), payload.as_slice());
}

#[test]
fn test_legacy_version_one_transfer() {
    let cipher = TagCipher::new("legacy");
    let payload = b"written by an older producer".repeat(20);

    // Version 1: digest of the raw payload travels beside the encrypted blob
    let compressed = RleCompressor.compress(&payload).unwrap();
    let blob = cipher.encrypt(&compressed).unwrap();
    let envelope = LegacyEnvelope {
        digest: compute_digest(&payload),
        blob: Bytes::from(blob),
    };
    let fragments = split_with_version(envelope.to_bytes(), 120, LEGACY_VERSION).unwrap();
    let wires: Vec<String> = fragments.iter().map(|f| encode_wire(f).unwrap()).collect();
    assert!(wires.len() > 1);

    let t = transfer("legacy", 2953);
    assert_eq!(t.open(&wires).unwrap().as_ref(), payload.as_slice());
}

#[test]
fn test_legacy_digest_mismatch() {
    let cipher = TagCipher::new("legacy");
    let compressed = RleCompressor.compress(b"actual payload").unwrap();
    let envelope = LegacyEnvelope {
        digest: [0u8; DIGEST_SIZE],
        blob: Bytes::from(cipher.encrypt(&compressed).unwrap()),
    };
    let fragments = split_with_version(envelope.to_bytes(), 50, LEGACY_VERSION).unwrap();
    let wires: Vec<String> = fragments.iter().map(|f| encode_wire(f).unwrap()).collect();

    assert_eq!(
        transfer("legacy", 2953).open(&wires),
        Err(PackError::IntegrityFailure)
    );
}

#[test]
fn test_single_form_tamper_is_detected_after_decrypt() {
    let t = Transfer::new(Passthrough, Passthrough);
    let wires = t.seal(b"abcdefgh").unwrap();
    assert_eq!(wires.len(), 1);

    let mut blob = qrxfer_core::transport::decode(&wires[0]).unwrap();
    blob[DIGEST_SIZE + 4] ^= 0x20;
    let tampered = qrxfer_core::transport::encode(&blob);

    assert_eq!(t.open(&[tampered]), Err(PackError::IntegrityFailure));
}

#[test]
fn test_truncated_first_part_is_not_reported_as_wrong_password() {
    let t = transfer("pw", 200);
    let wires = t.seal(&noise(2000)).unwrap();
    assert!(wires.len() > 1);

    let damaged = wires[0][..wires[0].len() - 8].to_string();
    let result = t.open(&[damaged]);

    assert!(matches!(result, Err(PackError::MalformedFragment(_))));
}

#[test]
fn test_open_rejects_conflicting_duplicate_when_configured() {
    let config = TransferConfig {
        carrier_capacity: 200,
        duplicate_policy: DuplicatePolicy::RejectConflicting,
        ..TransferConfig::default()
    };
    let t = Transfer::with_config(TagCipher::new("pw"), RleCompressor, config);
    let wires = t.seal(&noise(1500)).unwrap();
    let total = wires.len() as u32;
    assert!(total > 2);

    // A second scan of part 2 with one flipped chunk byte
    let mut frame = qrxfer_core::transport::decode(&wires[1]).unwrap();
    let last = frame.len() - 1;
    frame[last] ^= 0x01;
    let conflicting = qrxfer_core::transport::encode(&frame);
    assert_eq!(fragment_info(&conflicting).unwrap().index, 2);

    let mut with_conflict = wires.clone();
    with_conflict.push(conflicting);
    assert_eq!(t.open(&with_conflict), Err(PackError::ConflictingFragment(2)));

    // An identical rescan is accepted
    let mut with_rescan = wires.clone();
    with_rescan.push(wires[1].clone());
    assert_eq!(t.open(&with_rescan).unwrap().as_ref(), noise(1500).as_slice());
}
