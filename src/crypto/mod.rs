//! Key derivation and symmetric encryption.
//!
//! Bits become a key through SHA-256 ([`KeyMaterial::derive`]) and the
//! key drives AES-256 in counter mode ([`encrypt`] / [`decrypt`]).

mod cipher;
mod kdf;

pub use cipher::{decrypt, encrypt, Ciphertext};
pub use kdf::{KeyError, KeyMaterial};

pub(crate) use kdf::sha256;
