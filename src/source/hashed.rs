//! SHA-256 whitening of another source's bits.
//!
//! Not an independent generator: it reshapes 256 raw bits into the
//! 256 bits of their SHA-256 digest. The output length is fixed no
//! matter how biased the input is.

use super::{BitSource, SourceError, SourceKind};
use crate::bits::{BitSequence, KEY_BITS};
use crate::crypto::{sha256, KeyError};

/// Whitens the first 256 bits of `raw`.
///
/// The bits are packed MSB-first, hashed, and the digest is unpacked
/// MSB-first into a new 256-bit sequence.
pub fn whiten(raw: &BitSequence) -> Result<BitSequence, KeyError> {
    let packed = raw.pack_msb(KEY_BITS / 8).ok_or(KeyError::InsufficientBits {
        got: raw.len(),
        need: KEY_BITS,
    })?;
    Ok(BitSequence::from_bytes_msb(&sha256(&packed)))
}

/// Wraps a raw source and emits whitened bits.
pub struct HashedSource<S: BitSource> {
    raw: S,
}

impl<S: BitSource> HashedSource<S> {
    /// Wraps `raw`.
    pub fn new(raw: S) -> Self {
        Self { raw }
    }

    /// Returns the wrapped raw source.
    pub fn into_inner(self) -> S {
        self.raw
    }
}

impl<S: BitSource> BitSource for HashedSource<S> {
    fn kind(&self) -> SourceKind {
        SourceKind::PhysicalHashed
    }

    /// Draws exactly 256 raw bits and returns 256 whitened bits; `n` is ignored.
    fn generate(&mut self, _n: usize) -> Result<BitSequence, SourceError> {
        let raw = self.raw.generate(KEY_BITS)?;
        Ok(whiten(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StatReport;
    use crate::config::ChannelConfig;
    use crate::source::physical::{MockChannel, PhysicalSource};

    #[test]
    fn test_constant_input_still_256_bits() {
        let raw = BitSequence::from_bools(vec![true; 256]);
        let white = whiten(&raw).unwrap();

        assert_eq!(white.len(), 256);
        let report = StatReport::analyze(&white);
        assert!(report.entropy > 0.8);
    }

    #[test]
    fn test_matches_digest_of_packed_bits() {
        // 256 zero bits pack to 32 zero bytes.
        let white = whiten(&BitSequence::from_bools(vec![false; 256])).unwrap();
        assert_eq!(white.pack_msb(2).unwrap(), vec![0x66, 0x68]);
    }

    #[test]
    fn test_only_first_256_bits_used() {
        let base = BitSequence::from_bools((0..256).map(|i| i % 3 == 0));
        let mut longer = base.as_slice().to_vec();
        longer.extend_from_slice(&[1; 64]);
        let longer = BitSequence::from_bits(longer).unwrap();

        assert_eq!(whiten(&base).unwrap(), whiten(&longer).unwrap());
    }

    #[test]
    fn test_short_input_rejected() {
        let raw = BitSequence::from_bools(vec![true; 100]);
        assert!(matches!(
            whiten(&raw),
            Err(KeyError::InsufficientBits { got: 100, need: 256 })
        ));
    }

    #[test]
    fn test_hashed_source_over_physical() {
        let lines = vec!["1"; 256];
        let physical =
            PhysicalSource::new(MockChannel::from_lines(lines), ChannelConfig::default());
        let mut hashed = HashedSource::new(physical);

        let bits = hashed.generate(KEY_BITS).unwrap();
        assert_eq!(hashed.kind(), SourceKind::PhysicalHashed);
        assert_eq!(bits, whiten(&BitSequence::from_bools(vec![true; 256])).unwrap());
    }
}
