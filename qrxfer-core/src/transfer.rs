//! End-to-end transfer pipeline over external collaborators
//!
//! Sending: wrap → compress → encrypt → plan → split → encode.
//! Receiving: decode → assemble → decrypt → decompress → unwrap and verify.
//!
//! Encryption and compression are supplied by the caller through the
//! [`Cipher`] and [`Compressor`] traits. A transfer that fits one carrier is
//! emitted in the degenerate single form: the transport-encoded blob with no
//! fragment envelope.

use crate::assembler::{assemble_with, AssemblySession, DuplicatePolicy};
use crate::chunker;
use crate::constants::{
    DEFAULT_CARRIER_CAPACITY, FRAGMENT_HEADER_SIZE, FRAGMENT_MARKER, LEGACY_VERSION,
};
use crate::decoder::decode_wire;
use crate::encoder::encode_all;
use crate::error::PackError;
use crate::package::{self, LegacyEnvelope};
use crate::planner::CapacityPlanner;
use crate::scanner::segment_pasted;
use crate::transport;
use crate::types::Fragment;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// Password-based symmetric encryption supplied by the caller
pub trait Cipher {
    /// Encrypt bytes; the output carries whatever salt and nonce decryption needs
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, PackError>;

    /// Decrypt bytes, failing with [`PackError::Auth`] on a wrong key or tampering
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, PackError>;
}

/// Compression supplied by the caller
pub trait Compressor {
    /// Compress bytes
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, PackError>;

    /// Decompress bytes, failing with [`PackError::Decode`] on corrupt input
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, PackError>;
}

/// Identity collaborator: no encryption, no compression
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Cipher for Passthrough {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, PackError> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, PackError> {
        Ok(ciphertext.to_vec())
    }
}

impl Compressor for Passthrough {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, PackError> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, PackError> {
        Ok(data.to_vec())
    }
}

/// Run-time settings of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Maximum characters one carrier holds
    pub carrier_capacity: usize,

    /// Bytes reserved per fragment for the envelope
    pub envelope_overhead: usize,

    /// Handling of fragments that share an index
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            carrier_capacity: DEFAULT_CARRIER_CAPACITY,
            envelope_overhead: FRAGMENT_HEADER_SIZE,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Sender and receiver of one kind of transfer
#[derive(Debug, Clone)]
pub struct Transfer<C, Z> {
    cipher: C,
    compressor: Z,
    config: TransferConfig,
}

impl<C: Cipher, Z: Compressor> Transfer<C, Z> {
    /// Create a transfer with default settings
    pub fn new(cipher: C, compressor: Z) -> Self {
        Self::with_config(cipher, compressor, TransferConfig::default())
    }

    /// Create a transfer with explicit settings
    pub fn with_config(cipher: C, compressor: Z, config: TransferConfig) -> Self {
        Self {
            cipher,
            compressor,
            config,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    fn planner(&self) -> CapacityPlanner {
        CapacityPlanner::with_overhead(self.config.envelope_overhead)
    }

    /// Turn a payload into carrier text, one string per carrier
    pub fn seal(&self, payload: &[u8]) -> Result<Vec<String>, PackError> {
        if payload.is_empty() {
            return Err(PackError::EmptyPayload);
        }

        let serialized = package::wrap(Bytes::copy_from_slice(payload)).to_bytes()?;
        let compressed = self.compressor.compress(&serialized)?;
        let blob = self.cipher.encrypt(&compressed)?;

        #[cfg(feature = "logging")]
        debug!(
            "Payload {} bytes, package {} bytes, compressed {} bytes, encrypted {} bytes",
            payload.len(),
            serialized.len(),
            compressed.len(),
            blob.len()
        );

        let capacity = self.config.carrier_capacity;
        let plan = self.planner().plan(blob.len(), capacity)?;

        if plan.is_single() {
            // A blob opening with the marker would read back as a damaged fragment
            if !blob.starts_with(FRAGMENT_MARKER) {
                let wire = transport::encode(&blob);
                check_fits(1, &wire, capacity)?;

                #[cfg(feature = "logging")]
                info!("Payload fits a single code ({} characters)", wire.len());

                return Ok(vec![wire]);
            }

            #[cfg(feature = "logging")]
            debug!("Single form starts with the fragment marker, using one enveloped part");
        }

        let fragments = chunker::split(blob, plan.chunk_size)?;
        let wires = encode_all(&fragments)?;

        for (i, wire) in wires.iter().enumerate() {
            check_fits(i as u32 + 1, wire, capacity)?;
        }

        #[cfg(feature = "logging")]
        info!("Payload will be split into {} codes", wires.len());

        Ok(wires)
    }

    /// Recover a payload from carrier text, in any order
    ///
    /// A lone string that is not a fragment envelope is read as the single
    /// form, unless it carries the fragment marker, in which case it is a
    /// damaged fragment and the decode error is returned. Anything else is
    /// decoded, assembled and opened according to the framing version it
    /// carries.
    pub fn open<S: AsRef<str>>(&self, wires: &[S]) -> Result<Bytes, PackError> {
        match wires {
            [] => Err(PackError::NoFragments),
            [single] => match decode_wire(single.as_ref()) {
                Ok(fragment) => self.open_fragments(vec![fragment]),
                Err(e) => self.open_single(single.as_ref(), e),
            },
            _ => {
                let fragments = wires
                    .iter()
                    .map(|w| decode_wire(w.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?;
                self.open_fragments(fragments)
            }
        }
    }

    /// Recover a payload from pasted text holding one or more wire strings
    pub fn open_pasted(&self, text: &str) -> Result<Bytes, PackError> {
        self.open(&segment_pasted(text))
    }

    /// Recover a payload from fragments collected in a session
    pub fn open_session(&self, session: &AssemblySession) -> Result<Bytes, PackError> {
        let assembled = session.finish()?;
        let version = session.version().ok_or(PackError::NoFragments)?;
        self.open_assembled(version, assembled)
    }

    fn open_single(&self, wire: &str, fragment_error: PackError) -> Result<Bytes, PackError> {
        let blob = transport::decode(wire)?;
        if blob.starts_with(FRAGMENT_MARKER) {
            #[cfg(feature = "logging")]
            warn!("Code carries the fragment marker but does not decode: {}", fragment_error);

            return Err(fragment_error);
        }

        #[cfg(feature = "logging")]
        debug!("Opening single-form code");

        self.open_package(&blob)
    }

    fn open_fragments(&self, fragments: Vec<Fragment>) -> Result<Bytes, PackError> {
        #[cfg(feature = "logging")]
        let count = fragments.len();
        let version = fragments.first().ok_or(PackError::NoFragments)?.version;
        let assembled = assemble_with(fragments, self.config.duplicate_policy)?;

        #[cfg(feature = "logging")]
        info!("Assembled {} codes into {} bytes", count, assembled.len());

        self.open_assembled(version, assembled)
    }

    fn open_assembled(&self, version: u8, assembled: Bytes) -> Result<Bytes, PackError> {
        if version == LEGACY_VERSION {
            self.open_legacy(assembled)
        } else {
            self.open_package(&assembled)
        }
    }

    fn open_package(&self, blob: &[u8]) -> Result<Bytes, PackError> {
        let compressed = self.cipher.decrypt(blob)?;
        let serialized = self.compressor.decompress(&compressed)?;
        package::unwrap(&serialized)
    }

    fn open_legacy(&self, assembled: Bytes) -> Result<Bytes, PackError> {
        #[cfg(feature = "logging")]
        debug!("Opening legacy version {} transfer", LEGACY_VERSION);

        let envelope = LegacyEnvelope::from_bytes(assembled)?;
        let compressed = self.cipher.decrypt(&envelope.blob)?;
        let payload = self.compressor.decompress(&compressed)?;
        envelope.verify(&payload)?;
        Ok(Bytes::from(payload))
    }
}

fn check_fits(index: u32, wire: &str, capacity: usize) -> Result<(), PackError> {
    if wire.len() > capacity {
        return Err(PackError::FragmentTooLarge {
            index,
            size: wire.len(),
            max: capacity,
        });
    }
    Ok(())
}
