//! Key-recovery attack simulators.
//!
//! Both attacks are bounded search loops that decrypt a ciphertext
//! under candidate keys and compare the result with a known plaintext:
//!
//! ```text
//! Searching ──match──▶ Found
//!     │
//!     └──bound reached──▶ Exhausted
//! ```
//!
//! - [`SeedSearchAttack`] replays the seeded generator over a seed range.
//! - [`BoundedBruteForce`] guesses fresh OS-random keys.
//!
//! Exhaustion is a normal outcome, not an error.

mod brute_force;
mod search;
mod seed_search;

pub use brute_force::BoundedBruteForce;
pub use seed_search::SeedSearchAttack;

use crate::bits::BitSequence;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Attack state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttackState {
    /// Initial state, logged when an attack starts. An [`AttackResult`]
    /// only ever holds `Found` or `Exhausted`.
    Searching,
    /// A candidate key decrypted to the known plaintext.
    Found,
    /// The bound was reached without a match.
    Exhausted,
}

impl AttackState {
    /// Whether the search has ended.
    pub fn is_terminal(self) -> bool {
        !matches!(self, AttackState::Searching)
    }
}

/// Outcome of a finished attack.
#[derive(Debug, Clone, Serialize)]
pub struct AttackResult {
    state: AttackState,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs_f64")]
    elapsed: Duration,
    attempts: u64,
    seed: Option<u64>,
    recovered_bits: Option<BitSequence>,
    recovered_plaintext: Option<String>,
}

impl AttackResult {
    fn found(elapsed: Duration, attempts: u64, seed: Option<u64>, hit: search::Hit) -> Self {
        Self {
            state: AttackState::Found,
            elapsed,
            attempts,
            seed,
            recovered_bits: Some(hit.bits),
            recovered_plaintext: Some(hit.plaintext),
        }
    }

    fn exhausted(elapsed: Duration, attempts: u64) -> Self {
        Self {
            state: AttackState::Exhausted,
            elapsed,
            attempts,
            seed: None,
            recovered_bits: None,
            recovered_plaintext: None,
        }
    }

    /// Terminal state.
    pub fn state(&self) -> AttackState {
        self.state
    }

    /// Whether the key was recovered.
    pub fn succeeded(&self) -> bool {
        self.state == AttackState::Found
    }

    /// Wall-clock time spent searching.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Candidates tried: the matching index plus one, or the full bound.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Recovered seed (seed search only).
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Bits of the matching candidate.
    pub fn recovered_bits(&self) -> Option<&BitSequence> {
        self.recovered_bits.as_ref()
    }

    /// Recovered plaintext.
    pub fn recovered_plaintext(&self) -> Option<&str> {
        self.recovered_plaintext.as_deref()
    }
}

fn as_secs_f64<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}
