//! AES-256-CTR encryption under derived key material.
//!
//! Illustrative only: the same key material always yields the same
//! keystream, so encrypting two messages under one key reuses it.

use super::kdf::KeyMaterial;
use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use serde::{Serialize, Serializer};

/// AES-256 with a 128-bit big-endian counter.
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Encrypted message bytes. Same length as the UTF-8 plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wraps raw ciphertext bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the ciphertext bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the ciphertext length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Serialize for Ciphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ciphertext").field(&self.to_hex()).finish()
    }
}

fn apply_keystream(material: &KeyMaterial, data: &mut [u8]) {
    let key = *material.key();
    let iv = *material.iv();
    let mut cipher = Aes256Ctr::new(&key.into(), &iv.into());
    cipher.apply_keystream(data);
}

/// Encrypts the UTF-8 bytes of `plaintext`.
pub fn encrypt(material: &KeyMaterial, plaintext: &str) -> Ciphertext {
    let mut buf = plaintext.as_bytes().to_vec();
    apply_keystream(material, &mut buf);
    Ciphertext(buf)
}

/// Decrypts `ciphertext` and decodes the result as text.
///
/// Invalid UTF-8 is replaced rather than rejected, so a wrong key
/// produces garbage text instead of an error.
pub fn decrypt(material: &KeyMaterial, ciphertext: &Ciphertext) -> String {
    let mut buf = ciphertext.0.clone();
    apply_keystream(material, &mut buf);
    match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitSequence;
    use proptest::prelude::*;

    fn material_from(byte: u8) -> KeyMaterial {
        KeyMaterial::derive(&BitSequence::from_bytes_msb(&[byte; 32])).unwrap()
    }

    #[test]
    fn test_known_answer() {
        // Key and IV derived from 256 zero bits; checked against OpenSSL aes-256-ctr.
        let material = material_from(0x00);
        let ct = encrypt(&material, "hello entropy");
        assert_eq!(ct.to_hex(), "debc93488392492ef68daf21b9");
    }

    #[test]
    fn test_length_preserved() {
        let ct = encrypt(&material_from(0x42), "stream cipher, no padding");
        assert_eq!(ct.len(), "stream cipher, no padding".len());
    }

    #[test]
    fn test_wrong_key_does_not_recover() {
        let ct = encrypt(&material_from(0x01), "attack at dawn");
        assert_ne!(decrypt(&material_from(0x02), &ct), "attack at dawn");
    }

    #[test]
    fn test_invalid_utf8_decodes_lossily() {
        let material = material_from(0x07);
        // Encrypting raw bytes: XOR a 0xFF byte through the keystream.
        let mut raw = vec![0xFFu8, 0xFE, b'a'];
        apply_keystream(&material, &mut raw);

        let text = decrypt(&material, &Ciphertext::from_bytes(raw));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with('a'));
    }

    proptest! {
        #[test]
        fn prop_round_trip(bytes in proptest::array::uniform32(any::<u8>()), message in ".*") {
            let material = KeyMaterial::derive(&BitSequence::from_bytes_msb(&bytes)).unwrap();
            let ct = encrypt(&material, &message);
            prop_assert_eq!(decrypt(&material, &ct), message);
        }
    }
}
