//! Error types for preset and configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or validating presets and
/// processor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a file
    #[error("failed to remove file '{path}': {source}")]
    RemoveFile {
        /// Path of the file that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unencodable preset JSON
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unknown distortion type name
    #[error(transparent)]
    UnknownVariant(#[from] crunch_core::UnknownVariant),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Attempt to overwrite or delete a factory preset
    #[error("factory preset is read-only: {0}")]
    ReadOnlyPreset(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a remove file error.
    pub fn remove_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::RemoveFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display() {
        let err = ConfigError::read_file("/a/b.json", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/b.json"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn remove_file_factory_produces_correct_variant() {
        let err = ConfigError::remove_file("/x/y.json", mock_io_err());
        assert!(
            matches!(err, ConfigError::RemoveFile { ref path, .. } if path == std::path::Path::new("/x/y.json"))
        );
    }

    #[test]
    fn unknown_variant_is_transparent() {
        let err: ConfigError = crunch_core::UnknownVariant("wah".to_string()).into();
        assert_eq!(err.to_string(), "unknown distortion type: wah");
    }

    #[test]
    fn preset_not_found_display() {
        let err = ConfigError::PresetNotFound("Hot Mess".to_string());
        assert_eq!(err.to_string(), "preset not found: Hot Mess");
        assert!(err.source().is_none());
    }

    #[test]
    fn read_only_display() {
        let err = ConfigError::ReadOnlyPreset("Hard Rock".to_string());
        assert_eq!(err.to_string(), "factory preset is read-only: Hard Rock");
    }
}
