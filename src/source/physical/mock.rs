//! Mock channel that replays canned lines.

use super::channel::{ChannelError, LineChannel};
use crate::config::ChannelConfig;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use std::collections::VecDeque;

/// Junk lines a real device emits around its samples (banners, blank lines, glitches).
const NOISE_LINES: [&str; 4] = ["", "?", "10", "ready"];

/// Mock channel for testing and demonstrations.
///
/// Queued entries are either a line or a read timeout. Once the queue
/// is empty, reads fail with [`ChannelError::Closed`].
#[derive(Debug, Default)]
pub struct MockChannel {
    queue: VecDeque<Option<String>>,
    open: bool,
    unavailable: bool,
}

impl MockChannel {
    /// Creates a channel that replays `lines` in order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: lines.into_iter().map(|l| Some(l.into())).collect(),
            ..Default::default()
        }
    }

    /// Creates a channel that fails to open.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// Simulates a weak physical device: `lines` samples biased towards 1,
    /// interleaved with occasional junk lines.
    ///
    /// Deterministic in `seed`. NOT an entropy source.
    pub fn simulated(seed: u64, lines: usize) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let queue = (0..lines)
            .map(|_| {
                let roll = rng.next_u32() % 100;
                let line = if roll < 5 {
                    NOISE_LINES[(rng.next_u32() as usize) % NOISE_LINES.len()]
                } else if roll < 70 {
                    "1"
                } else {
                    "0"
                };
                Some(line.to_string())
            })
            .collect();

        Self {
            queue,
            ..Default::default()
        }
    }

    /// Simulated device with room for `bits` samples plus its junk lines.
    pub fn simulated_for_bits(seed: u64, bits: usize) -> Self {
        Self::simulated(seed, bits.saturating_mul(2).saturating_add(64))
    }

    /// Prepends `count` read timeouts.
    pub fn with_timeouts(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.queue.push_front(None);
        }
        self
    }

    /// Number of queued entries not yet read.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl LineChannel for MockChannel {
    fn open(&mut self, config: &ChannelConfig) -> Result<(), ChannelError> {
        if self.unavailable {
            return Err(ChannelError::OpenFailed(format!(
                "{}: device not present",
                config.port
            )));
        }
        self.open = true;
        tracing::info!(port = %config.port, "MockChannel opened");
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        if !self.open {
            return Err(ChannelError::NotOpen);
        }
        self.queue.pop_front().ok_or(ChannelError::Closed)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
        tracing::info!("MockChannel closed");
    }
}
