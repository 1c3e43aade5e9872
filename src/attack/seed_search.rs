//! Seed search against the deterministic generator.
//!
//! Models an attacker who knows the generator algorithm but not the
//! seed. Only applicable to sources that are replayable from a seed.

use super::search::{lowest_match, Hit};
use super::{AttackResult, AttackState};
use crate::bits::KEY_BITS;
use crate::crypto::{decrypt, Ciphertext, KeyMaterial};
use crate::source::SeededBitSource;
use std::time::Instant;

/// Exhaustive search over seeds `[0, max_seed)`.
#[derive(Debug, Clone)]
pub struct SeedSearchAttack {
    max_seed: u64,
    workers: usize,
}

impl SeedSearchAttack {
    /// Creates a sequential search over `[0, max_seed)`.
    pub fn new(max_seed: u64) -> Self {
        Self {
            max_seed,
            workers: 1,
        }
    }

    /// Splits the seed range across `workers` threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Runs the search. The reported seed is the lowest one that matches.
    pub fn run(&self, ciphertext: &Ciphertext, known_plaintext: &str) -> AttackResult {
        tracing::info!(
            max_seed = self.max_seed,
            workers = self.workers,
            state = ?AttackState::Searching,
            "Starting seed search"
        );
        let start = Instant::now();

        let found = lowest_match(
            self.max_seed,
            self.workers,
            || SeededBitSource::new(0),
            |source: &mut SeededBitSource, seed: u64| {
                source.reseed(seed);
                let bits = source.next_bits(KEY_BITS);
                let material = KeyMaterial::derive(&bits).ok()?;
                let plaintext = decrypt(&material, ciphertext);
                (plaintext == known_plaintext).then_some(Hit { bits, plaintext })
            },
        );

        let elapsed = start.elapsed();
        match found {
            Some((seed, hit)) => {
                tracing::info!(seed, elapsed_ms = elapsed.as_millis() as u64, "Seed found");
                AttackResult::found(elapsed, seed + 1, Some(seed), hit)
            }
            None => {
                tracing::info!(
                    max_seed = self.max_seed,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Seed not found"
                );
                AttackResult::exhausted(elapsed, self.max_seed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encrypt;

    const MESSAGE: &str = "the seed was small";

    fn ciphertext_for_seed(seed: u64) -> Ciphertext {
        let bits = SeededBitSource::new(seed).next_bits(KEY_BITS);
        encrypt(&KeyMaterial::derive(&bits).unwrap(), MESSAGE)
    }

    #[test]
    fn test_finds_seed_in_range() {
        let ct = ciphertext_for_seed(42);
        let result = SeedSearchAttack::new(100).run(&ct, MESSAGE);

        assert_eq!(result.state(), AttackState::Found);
        assert_eq!(result.seed(), Some(42));
        assert_eq!(result.attempts(), 43);
        assert_eq!(result.recovered_plaintext(), Some(MESSAGE));
        assert_eq!(
            result.recovered_bits(),
            Some(&SeededBitSource::new(42).next_bits(KEY_BITS))
        );
    }

    #[test]
    fn test_exhausts_when_seed_out_of_range() {
        let ct = ciphertext_for_seed(42);
        let result = SeedSearchAttack::new(10).run(&ct, MESSAGE);

        assert_eq!(result.state(), AttackState::Exhausted);
        assert!(!result.succeeded());
        assert_eq!(result.attempts(), 10);
        assert_eq!(result.seed(), None);
        assert_eq!(result.recovered_plaintext(), None);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ct = ciphertext_for_seed(1234);
        let sequential = SeedSearchAttack::new(2000).run(&ct, MESSAGE);
        let parallel = SeedSearchAttack::new(2000).with_workers(4).run(&ct, MESSAGE);

        assert_eq!(sequential.seed(), Some(1234));
        assert_eq!(parallel.seed(), Some(1234));
        assert_eq!(parallel.attempts(), sequential.attempts());
    }

    #[test]
    fn test_os_key_not_found_by_seed_search() {
        use crate::source::{BitSource, OsBitSource};

        let bits = OsBitSource::new().generate(KEY_BITS).unwrap();
        let ct = encrypt(&KeyMaterial::derive(&bits).unwrap(), MESSAGE);
        let result = SeedSearchAttack::new(200).run(&ct, MESSAGE);
        assert!(!result.succeeded());
    }
}
