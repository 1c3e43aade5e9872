//! Bounded brute force with fresh OS-random keys.
//!
//! A naive guess-the-key attack. Against any reasonable source it is
//! expected to exhaust its budget; the point is a negative result with
//! a bounded time cost.

use super::search::{lowest_match, Hit};
use super::{AttackResult, AttackState};
use crate::bits::KEY_BITS;
use crate::crypto::{decrypt, Ciphertext, KeyMaterial};
use crate::source::{BitSource, OsBitSource};
use std::time::Instant;

/// Up to `max_attempts` independent random key guesses.
#[derive(Debug, Clone)]
pub struct BoundedBruteForce {
    max_attempts: u64,
    workers: usize,
}

impl BoundedBruteForce {
    /// Creates a sequential brute force with `max_attempts` guesses.
    pub fn new(max_attempts: u64) -> Self {
        Self {
            max_attempts,
            workers: 1,
        }
    }

    /// Splits the attempt budget across `workers` threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Runs the attack. No seed is recorded on success, only the attempt count.
    pub fn run(&self, ciphertext: &Ciphertext, known_plaintext: &str) -> AttackResult {
        tracing::info!(
            max_attempts = self.max_attempts,
            workers = self.workers,
            state = ?AttackState::Searching,
            "Starting bounded brute force"
        );
        let start = Instant::now();

        let found = lowest_match(
            self.max_attempts,
            self.workers,
            OsBitSource::new,
            |source: &mut OsBitSource, _attempt: u64| {
                let bits = match source.generate(KEY_BITS) {
                    Ok(bits) => bits,
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping attempt");
                        return None;
                    }
                };
                let material = KeyMaterial::derive(&bits).ok()?;
                let plaintext = decrypt(&material, ciphertext);
                (plaintext == known_plaintext).then_some(Hit { bits, plaintext })
            },
        );

        let elapsed = start.elapsed();
        match found {
            Some((attempt, hit)) => {
                tracing::info!(attempts = attempt + 1, "Key guessed");
                AttackResult::found(elapsed, attempt + 1, None, hit)
            }
            None => {
                tracing::info!(
                    attempts = self.max_attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Brute force exhausted"
                );
                AttackResult::exhausted(elapsed, self.max_attempts)
            }
        }
    }
}
