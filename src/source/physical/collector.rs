//! Bit collection from a line channel.
//!
//! Lines pass through a filter that admits only `"0"` and `"1"`;
//! everything else is dropped without error.

use super::channel::{ChannelError, LineChannel, OpenChannel};
use crate::bits::BitSequence;
use crate::config::ChannelConfig;

/// Accumulates bit-valued lines until a target count is reached.
#[derive(Debug)]
pub struct BitAccumulator {
    bits: Vec<u8>,
    target: usize,
    discarded: u64,
}

impl BitAccumulator {
    /// Creates an accumulator that completes after `target` bits.
    pub fn new(target: usize) -> Self {
        Self {
            bits: Vec::with_capacity(target),
            target,
            discarded: 0,
        }
    }

    /// Offers one line. Returns true if it was admitted as a bit.
    pub fn offer(&mut self, line: &str) -> bool {
        if self.is_complete() {
            return false;
        }

        let bit = match line.trim() {
            "0" => 0,
            "1" => 1,
            other => {
                self.discarded += 1;
                tracing::trace!(line = other, "Discarded non-bit line");
                return false;
            }
        };

        self.bits.push(bit);
        true
    }

    /// Returns true once `target` bits have been admitted.
    pub fn is_complete(&self) -> bool {
        self.bits.len() >= self.target
    }

    /// Number of bits admitted so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if no bits have been admitted.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of lines rejected by the filter.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Consumes the accumulator and returns the collected bits.
    pub fn finish(self) -> BitSequence {
        BitSequence::from_bools(self.bits.into_iter().map(|b| b == 1))
    }
}

/// Reads `n` bits from `channel`, opening and closing it around the read loop.
///
/// Blocks until enough bit lines arrive. The channel is closed on every
/// exit path, including read errors part-way through.
pub fn collect_bits<C: LineChannel + ?Sized>(
    channel: &mut C,
    config: &ChannelConfig,
    n: usize,
) -> Result<BitSequence, ChannelError> {
    let mut open = OpenChannel::open(channel, config)?;
    let mut acc = BitAccumulator::new(n);

    tracing::info!(bits = n, "Waiting for bits from physical device");

    while !acc.is_complete() {
        if let Some(line) = open.read_line()? {
            acc.offer(&line);
        }
    }

    tracing::info!(
        bits = acc.len(),
        discarded = acc.discarded(),
        "Physical collection complete"
    );

    Ok(acc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::physical::MockChannel;

    #[test]
    fn test_filter_admits_only_bits() {
        let mut acc = BitAccumulator::new(10);
        for line in ["1", "0", "", "2", "01", "x", " 1\r", "0\n", "10"] {
            acc.offer(line);
        }
        assert_eq!(acc.len(), 4);
        assert_eq!(acc.discarded(), 5);
        assert_eq!(acc.finish().as_slice(), &[1, 0, 1, 0]);
    }

    #[test]
    fn test_stops_at_target() {
        let mut acc = BitAccumulator::new(2);
        assert!(acc.offer("1"));
        assert!(acc.offer("1"));
        assert!(!acc.offer("0"));
        assert!(acc.is_complete());
        assert_eq!(acc.finish().len(), 2);
    }

    #[test]
    fn test_collects_from_channel_and_closes() {
        let lines = ["1", "noise", "0", "", "1", "1", "0"];
        let mut channel = MockChannel::from_lines(lines);

        let bits = collect_bits(&mut channel, &ChannelConfig::default(), 4).unwrap();

        assert_eq!(bits.as_slice(), &[1, 0, 1, 1]);
        assert!(!channel.is_open());
        assert_eq!(channel.remaining(), 1);
    }

    #[test]
    fn test_timeouts_are_skipped() {
        let mut channel = MockChannel::from_lines(["1", "0"]).with_timeouts(3);
        let bits = collect_bits(&mut channel, &ChannelConfig::default(), 2).unwrap();
        assert_eq!(bits.len(), 2);
    }

    #[test]
    fn test_closed_on_early_failure() {
        let mut channel = MockChannel::from_lines(["1", "0", "junk"]);

        let result = collect_bits(&mut channel, &ChannelConfig::default(), 8);

        assert!(matches!(result, Err(ChannelError::Closed)));
        assert!(!channel.is_open());
    }

    #[test]
    fn test_unavailable_channel() {
        let mut channel = MockChannel::unavailable();
        let result = collect_bits(&mut channel, &ChannelConfig::default(), 8);
        assert!(matches!(result, Err(ChannelError::OpenFailed(_))));
    }
}
