//! Bit sources under comparison.
//!
//! Four strategies produce candidate key bits:
//!
//! - [`SeededBitSource`]: deterministic, replayable from its seed
//! - [`OsBitSource`]: operating-system CSPRNG
//! - [`PhysicalSource`]: raw bits from an external device
//! - [`HashedSource`] / [`whiten`]: SHA-256 whitening of physical bits

mod hashed;
mod os;
pub mod physical;
mod seeded;

pub use hashed::{whiten, HashedSource};
pub use os::OsBitSource;
pub use physical::{ChannelError, LineChannel, MockChannel, PhysicalSource};
pub use seeded::SeededBitSource;

use crate::bits::BitSequence;
use crate::crypto::KeyError;
use serde::Serialize;
use thiserror::Error;

/// The four generation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    /// Replayable generator seeded from a small integer.
    DeterministicSeeded,
    /// Operating-system CSPRNG.
    CryptoStrong,
    /// Unprocessed bits from the physical device.
    PhysicalRaw,
    /// Physical bits whitened with SHA-256.
    PhysicalHashed,
}

impl SourceKind {
    /// All kinds in experiment order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::DeterministicSeeded,
        SourceKind::CryptoStrong,
        SourceKind::PhysicalRaw,
        SourceKind::PhysicalHashed,
    ];

    /// Whether the generator can be replayed from an external seed.
    pub fn is_seedable(self) -> bool {
        matches!(self, SourceKind::DeterministicSeeded)
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::DeterministicSeeded => "seeded PRNG",
            SourceKind::CryptoStrong => "OS CSPRNG",
            SourceKind::PhysicalRaw => "physical raw",
            SourceKind::PhysicalHashed => "physical + SHA-256",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur while generating bits.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The physical channel failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// Too few bits to whiten.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// The OS RNG returned an error.
    #[error("OS random source failed: {0}")]
    Os(String),
}

/// A producer of bit sequences.
pub trait BitSource {
    /// Which strategy this source implements.
    fn kind(&self) -> SourceKind;

    /// Produces `n` bits. Whitening sources always produce 256.
    fn generate(&mut self, n: usize) -> Result<BitSequence, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_seeded_is_seedable() {
        let seedable: Vec<_> = SourceKind::ALL.iter().filter(|k| k.is_seedable()).collect();
        assert_eq!(seedable, vec![&SourceKind::DeterministicSeeded]);
    }

    #[test]
    fn test_sources_report_their_kind() {
        assert_eq!(SeededBitSource::new(1).kind(), SourceKind::DeterministicSeeded);
        assert_eq!(OsBitSource::new().kind(), SourceKind::CryptoStrong);
    }
}
