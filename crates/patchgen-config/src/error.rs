//! Error types for configuration and library operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading settings, reading a preset library,
/// or writing generated presets.
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

    /// Failed to list a directory
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        /// Path of the directory that could not be listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Malformed favorites file
    #[error("failed to parse favorites file '{path}': {source}")]
    FavoritesParse {
        /// Path of the favorites file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Settings that cannot drive a generation run
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
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

    /// Create a read directory error.
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Create a favorites parse error.
    pub fn favorites_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ConfigError::FavoritesParse {
            path: path.into(),
            source,
        }
    }
}
