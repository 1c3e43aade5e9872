//! Owned bit sequence type shared by every stage of the experiment.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors raised while building a [`BitSequence`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitsError {
    /// An element other than 0 or 1.
    #[error("value {value} at position {position} is not a bit")]
    NotABit {
        /// Index of the offending element.
        position: usize,
        /// The offending value.
        value: u8,
    },
}

/// An ordered, immutable sequence of single-bit values.
///
/// Every element is guaranteed to be 0 or 1. Sources produce these,
/// the evaluator scores them, and the key deriver consumes the first
/// 256 of them.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    /// Builds a sequence from 0/1 values, rejecting anything else.
    pub fn from_bits(bits: Vec<u8>) -> Result<Self, BitsError> {
        if let Some((position, &value)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
            return Err(BitsError::NotABit { position, value });
        }
        Ok(Self { bits })
    }

    /// Builds a sequence from booleans.
    pub fn from_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bits: bits.into_iter().map(u8::from).collect(),
        }
    }

    /// Unpacks bytes into bits, most-significant bit first.
    pub fn from_bytes_msb(bytes: &[u8]) -> Self {
        let bits = bytes
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
            .collect();
        Self { bits }
    }

    /// Packs the first `byte_len * 8` bits into bytes, most-significant bit first.
    ///
    /// Returns `None` if the sequence is shorter than `byte_len * 8`.
    pub fn pack_msb(&self, byte_len: usize) -> Option<Vec<u8>> {
        let needed = byte_len.checked_mul(8)?;
        if self.bits.len() < needed {
            return None;
        }
        Some(
            self.bits[..needed]
                .chunks_exact(8)
                .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
                .collect(),
        )
    }

    /// Keeps only the first `len` bits.
    pub(crate) fn truncated(mut self, len: usize) -> Self {
        self.bits.truncate(len);
        self
    }

    /// Returns the bit values.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Returns the number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Counts the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Renders the sequence as a string of '0' and '1' characters.
    pub fn to_bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect()
    }
}

impl Serialize for BitSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bit_string())
    }
}

impl std::fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitSequence")
            .field("len", &self.bits.len())
            .field("ones", &self.count_ones())
            .finish()
    }
}
