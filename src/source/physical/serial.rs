//! Serial-port channel for a microcontroller streaming `0`/`1` lines.

use super::channel::{ChannelError, LineChannel};
use crate::config::ChannelConfig;
use serialport::SerialPort;
use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

/// Serial port channel backed by the `serialport` crate.
#[derive(Default)]
pub struct SerialChannel {
    reader: Option<BufReader<Box<dyn SerialPort>>>,
}

impl SerialChannel {
    /// Creates a closed channel.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineChannel for SerialChannel {
    fn open(&mut self, config: &ChannelConfig) -> Result<(), ChannelError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()
            .map_err(|e| ChannelError::OpenFailed(format!("{}: {}", config.port, e)))?;

        self.reader = Some(BufReader::new(port));
        tracing::info!(port = %config.port, baud = config.baud_rate, "Serial port opened");
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        let reader = self.reader.as_mut().ok_or(ChannelError::NotOpen)?;

        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
            // A partial line read before the timeout is dropped; its tail
            // arrives as a malformed line and is filtered out.
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(ChannelError::ReadFailed(e.to_string())),
        }
    }

    fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            tracing::info!("Serial port closed");
        }
    }
}
