//! Experiment configuration.
//!
//! Defaults reproduce the reference run: seed 1234, 256 bits per
//! group, seed search over 20000 seeds and 100000 brute-force attempts.

use crate::bits::KEY_BITS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serial channel settings for the physical bit source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Serial device path or name (e.g. `/dev/ttyACM0`, `COM3`).
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Per-read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            timeout_ms: 1000,
        }
    }
}

/// Attack search bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Seeds tried by the seed search, `[0, max_seed)`.
    pub max_seed: u64,
    /// Keys tried by the bounded brute force.
    pub max_attempts: u64,
    /// Worker threads per attack (1 = sequential).
    pub workers: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            max_seed: 20_000,
            max_attempts: 100_000,
            workers: 1,
        }
    }
}

/// Full experiment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Message encrypted under every group's key.
    pub message: String,
    /// Seed of the deterministic group.
    pub seed: u64,
    /// Bits generated per group.
    pub bit_count: usize,
    /// Attack bounds.
    pub attack: AttackConfig,
    /// Physical device settings.
    pub channel: ChannelConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            message: String::new(),
            seed: 1234,
            bit_count: KEY_BITS,
            attack: AttackConfig::default(),
            channel: ChannelConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bit_count < KEY_BITS {
            return Err(ConfigError::InvalidBitCount(self.bit_count));
        }
        if self.attack.max_seed == 0 || self.attack.max_attempts == 0 {
            return Err(ConfigError::InvalidBounds);
        }
        if self.attack.workers == 0 {
            return Err(ConfigError::InvalidWorkers);
        }
        if self.channel.baud_rate == 0 || self.channel.timeout_ms == 0 {
            return Err(ConfigError::InvalidChannel);
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: ExperimentConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// `bit_count` below 256.
    #[error("bit count {0} is below the 256 bits key derivation needs")]
    InvalidBitCount(usize),
    /// Zero seed or attempt bound.
    #[error("attack bounds must be non-zero")]
    InvalidBounds,
    /// Zero workers.
    #[error("worker count must be at least 1")]
    InvalidWorkers,
    /// Zero baud rate or timeout.
    #[error("invalid channel settings (baud rate and timeout must be non-zero)")]
    InvalidChannel,
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 1234);
        assert_eq!(config.attack.max_seed, 20_000);
        assert_eq!(config.attack.max_attempts, 100_000);
        assert_eq!(config.channel.timeout_ms, 1000);
    }

    #[test]
    fn test_short_bit_count_invalid() {
        let config = ExperimentConfig {
            bit_count: 128,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBitCount(128))
        ));
    }

    #[test]
    fn test_zero_workers_invalid() {
        let mut config = ExperimentConfig::default();
        config.attack.workers = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorkers)));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ExperimentConfig = toml::from_str(
            r#"
            message = "hello"

            [attack]
            max_seed = 500

            [channel]
            port = "COM3"
            "#,
        )
        .unwrap();

        assert_eq!(config.message, "hello");
        assert_eq!(config.seed, 1234);
        assert_eq!(config.attack.max_seed, 500);
        assert_eq!(config.attack.max_attempts, 100_000);
        assert_eq!(config.channel.port, "COM3");
        assert_eq!(config.channel.baud_rate, 115_200);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ExperimentConfig::from_file("/nonexistent/keylab.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }
}
