//! Line-oriented channel abstraction for the physical bit device.
//!
//! The device streams one ASCII line per sample. This trait allows
//! swapping between a real serial port and canned lines for testing.

use crate::config::ChannelConfig;
use thiserror::Error;

/// Errors that can occur during channel operations.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// Device missing, busy or misconfigured.
    #[error("failed to open channel: {0}")]
    OpenFailed(String),
    /// I/O error while reading a line.
    #[error("failed to read from channel: {0}")]
    ReadFailed(String),
    /// End of stream.
    #[error("channel closed before enough bits were collected")]
    Closed,
    /// Read attempted before `open`.
    #[error("channel not open")]
    NotOpen,
}

/// Trait for line-oriented bit channels.
pub trait LineChannel {
    /// Opens the channel with the given configuration.
    fn open(&mut self, config: &ChannelConfig) -> Result<(), ChannelError>;

    /// Reads one line.
    ///
    /// Returns `Ok(None)` when the read timed out without a line.
    fn read_line(&mut self) -> Result<Option<String>, ChannelError>;

    /// Checks if the channel is currently open.
    fn is_open(&self) -> bool;

    /// Closes the channel and releases the handle.
    fn close(&mut self);
}

/// An open channel, closed again when dropped.
pub struct OpenChannel<'a, C: LineChannel + ?Sized> {
    channel: &'a mut C,
}

impl<'a, C: LineChannel + ?Sized> OpenChannel<'a, C> {
    /// Opens `channel`, returning a guard that closes it on drop.
    pub fn open(channel: &'a mut C, config: &ChannelConfig) -> Result<Self, ChannelError> {
        channel.open(config)?;
        tracing::debug!(port = %config.port, baud = config.baud_rate, "Channel opened");
        Ok(Self { channel })
    }

    /// Reads one line from the underlying channel.
    pub fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        self.channel.read_line()
    }
}

impl<C: LineChannel + ?Sized> Drop for OpenChannel<'_, C> {
    fn drop(&mut self) {
        self.channel.close();
        tracing::debug!("Channel closed");
    }
}
