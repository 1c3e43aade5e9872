//! SHA-256 key derivation from a 256-bit prefix.
//!
//! # Known limitation
//!
//! The IV is the first 16 bytes of the same digest that forms the key,
//! so key and IV overlap by construction. Changing this would change
//! every derived ciphertext, so it is kept as-is.

use crate::bits::{BitSequence, KEY_BITS};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised by key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Fewer bits than a key needs.
    #[error("insufficient bits: got {got}, need {need}")]
    InsufficientBits {
        /// Bits supplied.
        got: usize,
        /// Bits required.
        need: usize,
    },
}

/// AES-256 key and CTR initial counter block.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: [u8; 32],
    iv: [u8; 16],
}

impl KeyMaterial {
    /// Derives key material from the first 256 bits of `bits`.
    ///
    /// The bits are packed MSB-first into 32 bytes and hashed with
    /// SHA-256. The key is the whole digest and the IV its first half.
    pub fn derive(bits: &BitSequence) -> Result<Self, KeyError> {
        let packed = bits
            .pack_msb(KEY_BITS / 8)
            .ok_or(KeyError::InsufficientBits {
                got: bits.len(),
                need: KEY_BITS,
            })?;

        let digest = sha256(&packed);
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&digest[..16]);

        Ok(Self { key: digest, iv })
    }

    /// Returns the 32-byte key.
    #[inline]
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    /// Returns the 16-byte IV.
    #[inline]
    pub fn iv(&self) -> &[u8; 16] {
        &self.iv
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}

/// SHA-256 of `data` as a fixed-size array.
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}
