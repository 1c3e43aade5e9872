//! Physical bit source.
//!
//! Bits arrive from an external device as ASCII lines over a
//! [`LineChannel`]. The channel is owned exclusively by one reader
//! and is opened and closed around every collection.

mod channel;
mod collector;
mod mock;
#[cfg(feature = "serial")]
mod serial;

pub use channel::{ChannelError, LineChannel, OpenChannel};
pub use collector::{collect_bits, BitAccumulator};
pub use mock::MockChannel;
#[cfg(feature = "serial")]
pub use serial::SerialChannel;

use super::{BitSource, SourceError, SourceKind};
use crate::bits::BitSequence;
use crate::config::ChannelConfig;

/// Raw bits read from a physical device.
pub struct PhysicalSource<C: LineChannel> {
    channel: C,
    config: ChannelConfig,
}

impl<C: LineChannel> PhysicalSource<C> {
    /// Wraps `channel`, opened with `config` on every collection.
    pub fn new(channel: C, config: ChannelConfig) -> Self {
        Self { channel, config }
    }

    /// Returns the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }
}

impl<C: LineChannel> BitSource for PhysicalSource<C> {
    fn kind(&self) -> SourceKind {
        SourceKind::PhysicalRaw
    }

    fn generate(&mut self, n: usize) -> Result<BitSequence, SourceError> {
        Ok(collect_bits(&mut self.channel, &self.config, n)?)
    }
}
