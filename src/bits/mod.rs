//! Bit sequences.
//!
//! The common currency of the experiment: sources produce a
//! [`BitSequence`], the evaluator scores it and the key deriver
//! packs its first 256 bits into key material.

mod sequence;

pub use sequence::{BitSequence, BitsError};

/// Number of bits consumed by key derivation and produced by whitening.
pub const KEY_BITS: usize = 256;
