//! Operating-system-backed bit source.

use super::{BitSource, SourceError, SourceKind};
use crate::bits::BitSequence;
use rand_core::{OsRng, RngCore};

/// Cryptographically strong, non-reproducible bits from the OS RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsBitSource;

impl OsBitSource {
    /// Creates a handle to the OS RNG.
    pub fn new() -> Self {
        Self
    }
}

impl BitSource for OsBitSource {
    fn kind(&self) -> SourceKind {
        SourceKind::CryptoStrong
    }

    fn generate(&mut self, n: usize) -> Result<BitSequence, SourceError> {
        let mut bytes = vec![0u8; n.div_ceil(8)];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SourceError::Os(e.to_string()))?;
        Ok(BitSequence::from_bytes_msb(&bytes).truncated(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length() {
        let mut source = OsBitSource::new();
        assert_eq!(source.generate(256).unwrap().len(), 256);
        assert_eq!(source.generate(13).unwrap().len(), 13);
    }

    #[test]
    fn test_calls_are_independent() {
        let mut source = OsBitSource::new();
        let a = source.generate(256).unwrap();
        let b = source.generate(256).unwrap();
        assert_ne!(a, b);
    }
}
