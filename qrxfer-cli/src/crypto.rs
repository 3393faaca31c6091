//! Password-based encryption for transfers
//!
//! A fresh salt and nonce are drawn for every encryption and travel in
//! front of the ciphertext: `salt (16) || nonce (24) || ciphertext+tag`.
//! The key is derived with Argon2id and zeroized after use.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use qrxfer_core::{Cipher, PackError};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// XChaCha20 nonce length in bytes
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length in bytes
pub const TAG_LEN: usize = 16;

const KEY_LEN: usize = 32;

// Argon2id parameters: 19 MiB, 2 passes, 1 lane
const ARGON2_M_COST: u32 = 19 * 1024;
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

/// Cipher keyed by a user password
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PasswordCipher {
    password: Vec<u8>,
}

impl PasswordCipher {
    /// Create a cipher for `password`
    pub fn new(password: &str) -> Self {
        Self {
            password: password.as_bytes().to_vec(),
        }
    }

    fn derive_key(&self, salt: &[u8]) -> Result<[u8; KEY_LEN], PackError> {
        let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(KEY_LEN))
            .map_err(|e| PackError::Auth(format!("key derivation parameters: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = [0u8; KEY_LEN];
        argon2
            .hash_password_into(&self.password, salt, &mut key)
            .map_err(|e| PackError::Auth(format!("key derivation failed: {}", e)))?;
        Ok(key)
    }
}

impl std::fmt::Debug for PasswordCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCipher")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Cipher for PasswordCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, PackError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut key = self.derive_key(&salt)?;
        let cipher = XChaCha20Poly1305::new((&key).into());
        key.zeroize();

        let ciphertext = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|_| PackError::Auth("XChaCha20-Poly1305 encryption failed".into()))?;

        let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, PackError> {
        if ciphertext.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(PackError::Auth(format!(
                "ciphertext of {} bytes is too short",
                ciphertext.len()
            )));
        }

        let (salt, rest) = ciphertext.split_at(SALT_LEN);
        let (nonce, body) = rest.split_at(NONCE_LEN);

        let mut key = self.derive_key(salt)?;
        let cipher = XChaCha20Poly1305::new((&key).into());
        key.zeroize();

        cipher
            .decrypt(XNonce::from_slice(nonce), body)
            .map_err(|_| PackError::Auth("wrong password or corrupted data".into()))
    }
}
