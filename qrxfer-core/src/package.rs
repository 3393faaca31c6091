//! Integrity wrapping of the payload
//!
//! A [`Package`] is what actually gets compressed and encrypted: the raw
//! payload together with its BLAKE3 digest. The digest therefore travels
//! under encryption and is checked after every reconstruction.
//!
//! Serialized layout:
//! - Digest (32 bytes)
//! - Data length (4 bytes, big-endian)
//! - Data (variable length)
//!
//! The legacy (version 1) format kept the digest beside the encrypted blob
//! instead; [`LegacyEnvelope`] covers that variant.

use crate::constants::{DIGEST_SIZE, PACKAGE_HEADER_SIZE};
use crate::error::PackError;
use bytes::{BufMut, Bytes, BytesMut};

/// Payload bytes paired with their digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Raw payload
    pub data: Bytes,

    /// BLAKE3 digest of `data`
    pub digest: [u8; DIGEST_SIZE],
}

impl Package {
    /// Serialize for the compression and encryption collaborators
    pub fn to_bytes(&self) -> Result<Bytes, PackError> {
        let data_len = u32::try_from(self.data.len()).map_err(|_| {
            PackError::MalformedPackage(format!("payload of {} bytes is too large", self.data.len()))
        })?;

        let mut buf = BytesMut::with_capacity(PACKAGE_HEADER_SIZE + self.data.len());
        buf.put_slice(&self.digest);
        buf.put_u32(data_len);
        buf.put_slice(&self.data);
        Ok(buf.freeze())
    }

    /// Parse a serialized package without verifying the digest
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        if bytes.len() < PACKAGE_HEADER_SIZE {
            return Err(PackError::MalformedPackage(format!(
                "{} bytes is shorter than the package header",
                bytes.len()
            )));
        }

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&bytes[..DIGEST_SIZE]);

        let data_len = u32::from_be_bytes([
            bytes[DIGEST_SIZE],
            bytes[DIGEST_SIZE + 1],
            bytes[DIGEST_SIZE + 2],
            bytes[DIGEST_SIZE + 3],
        ]) as usize;

        let data = &bytes[PACKAGE_HEADER_SIZE..];
        if data.len() != data_len {
            return Err(PackError::MalformedPackage(format!(
                "data length field says {}, package carries {}",
                data_len,
                data.len()
            )));
        }

        Ok(Self {
            data: Bytes::copy_from_slice(data),
            digest,
        })
    }

    /// Check the digest against the data
    pub fn verify(&self) -> Result<(), PackError> {
        if compute_digest(&self.data) != self.digest {
            return Err(PackError::IntegrityFailure);
        }
        Ok(())
    }
}

/// Compute the BLAKE3 digest of data
pub fn compute_digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    *blake3::hash(data).as_bytes()
}

/// Wrap a payload with its digest
pub fn wrap(data: impl Into<Bytes>) -> Package {
    let data: Bytes = data.into();
    let digest = compute_digest(&data);
    Package { data, digest }
}

/// Parse a serialized package and verify its digest, returning the payload
pub fn unwrap(serialized: &[u8]) -> Result<Bytes, PackError> {
    let package = Package::from_bytes(serialized)?;
    package.verify()?;
    Ok(package.data)
}

/// Version 1 layout: digest in the clear beside the encrypted blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEnvelope {
    /// BLAKE3 digest of the raw payload
    pub digest: [u8; DIGEST_SIZE],

    /// Encrypted, compressed raw payload
    pub blob: Bytes,
}

impl LegacyEnvelope {
    /// Serialize as digest followed by blob
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(DIGEST_SIZE + self.blob.len());
        buf.put_slice(&self.digest);
        buf.put_slice(&self.blob);
        buf.freeze()
    }

    /// Split assembled version 1 bytes into digest and blob
    pub fn from_bytes(bytes: Bytes) -> Result<Self, PackError> {
        if bytes.len() <= DIGEST_SIZE {
            return Err(PackError::MalformedPackage(format!(
                "legacy envelope of {} bytes has no blob",
                bytes.len()
            )));
        }

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&bytes[..DIGEST_SIZE]);

        Ok(Self {
            digest,
            blob: bytes.slice(DIGEST_SIZE..),
        })
    }

    /// Check a decrypted payload against the carried digest
    pub fn verify(&self, payload: &[u8]) -> Result<(), PackError> {
        if compute_digest(payload) != self.digest {
            return Err(PackError::IntegrityFailure);
        }
        Ok(())
    }
}
