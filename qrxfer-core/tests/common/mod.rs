//! Shared collaborators for integration tests

#![allow(dead_code)]

use qrxfer_core::{Cipher, Compressor, PackError};

/// Keystream cipher with a keyed BLAKE3 tag; wrong keys fail authentication
pub struct TagCipher {
    key: [u8; 32],
}

impl TagCipher {
    pub fn new(password: &str) -> Self {
        Self {
            key: blake3::derive_key("qrxfer tests 2025 tag cipher", password.as_bytes()),
        }
    }

    fn keystream(&self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        blake3::Hasher::new_keyed(&self.key)
            .finalize_xof()
            .fill(&mut out);
        out
    }
}

impl Cipher for TagCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, PackError> {
        let ks = self.keystream(plaintext.len());
        let mut out: Vec<u8> = plaintext.iter().zip(ks).map(|(p, k)| p ^ k).collect();
        let tag = blake3::keyed_hash(&self.key, &out);
        out.extend_from_slice(tag.as_bytes());
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, PackError> {
        if ciphertext.len() < 32 {
            return Err(PackError::Auth("ciphertext shorter than tag".into()));
        }
        let (body, tag) = ciphertext.split_at(ciphertext.len() - 32);
        if blake3::keyed_hash(&self.key, body).as_bytes() != tag {
            return Err(PackError::Auth("wrong password or corrupted data".into()));
        }
        let ks = self.keystream(body.len());
        Ok(body.iter().zip(ks).map(|(c, k)| c ^ k).collect())
    }
}

/// Run-length compressor: (count, byte) pairs
pub struct RleCompressor;

impl Compressor for RleCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, PackError> {
        let mut out = Vec::new();
        let mut iter = data.iter().peekable();
        while let Some(&byte) = iter.next() {
            let mut run = 1u8;
            while run < u8::MAX && iter.peek() == Some(&&byte) {
                iter.next();
                run += 1;
            }
            out.push(run);
            out.push(byte);
        }
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, PackError> {
        if data.len() % 2 != 0 {
            return Err(PackError::Decode("odd run-length stream".into()));
        }
        let mut out = Vec::new();
        for pair in data.chunks(2) {
            out.extend(std::iter::repeat(pair[1]).take(pair[0] as usize));
        }
        Ok(out)
    }
}
