//! Processor configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crunch_core::SignalProcessor;

use crate::error::ConfigError;

/// Most channels a configuration may request.
pub const MAX_CHANNELS: usize = 8;

/// How to build and initialize a [`SignalProcessor`].
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 44100.0
/// max_block_size = 256
/// channels = 2
/// ```
///
/// Missing fields take their defaults (48 kHz, 512 samples, stereo).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will pass to `process`.
    pub max_block_size: usize,
    /// Channel count.
    pub channels: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            max_block_size: 512,
            channels: 2,
        }
    }
}

impl ProcessorConfig {
    /// Parse a configuration from TOML and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidConfig(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_block_size must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_CHANNELS).contains(&self.channels) {
            return Err(ConfigError::InvalidConfig(format!(
                "channels must be between 1 and {MAX_CHANNELS}, got {}",
                self.channels
            )));
        }
        Ok(())
    }
}

/// Build a processor for `config` and initialize it.
pub fn build_processor(config: &ProcessorConfig) -> Result<SignalProcessor, ConfigError> {
    config.validate()?;
    let mut processor = SignalProcessor::new(config.channels);
    processor
        .initialize(config.sample_rate, config.max_block_size)
        .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
    tracing::debug!(
        sample_rate = config.sample_rate,
        max_block_size = config.max_block_size,
        channels = config.channels,
        "processor built"
    );
    Ok(processor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = ProcessorConfig::from_toml("channels = 1").unwrap();
        assert_eq!(config.channels, 1);
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.max_block_size, 512);
    }

    #[test]
    fn rejects_invalid_values() {
        for toml in [
            "sample_rate = 0.0",
            "sample_rate = -44100.0",
            "max_block_size = 0",
            "channels = 0",
            "channels = 9",
        ] {
            assert!(
                matches!(
                    ProcessorConfig::from_toml(toml),
                    Err(ConfigError::InvalidConfig(_))
                ),
                "{toml} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            ProcessorConfig::from_toml("channels = \"two\""),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let config = ProcessorConfig {
            sample_rate: 96000.0,
            max_block_size: 128,
            channels: 4,
        };
        let parsed = ProcessorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn build_processor_initializes() {
        let config = ProcessorConfig {
            sample_rate: 44100.0,
            max_block_size: 64,
            channels: 1,
        };
        let processor = build_processor(&config).unwrap();
        assert!(processor.is_initialized());
        assert_eq!(processor.max_channels(), 1);
        assert_eq!(processor.max_block_size(), 64);
    }
}
