//! Error types for generation.

use patchgen_config::ConfigError;
use patchgen_core::BinaryError;
use thiserror::Error;

/// Errors that abort a generation batch.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No presets left after filtering
    #[error("no presets available after filtering")]
    EmptyLibrary,

    /// A selector matched nothing
    #[error("no preset matches '{0}'")]
    PresetNotFound(String),

    /// Merge selectors resolved to fewer than two presets
    #[error("merging needs at least two presets, found {found}")]
    NotEnoughPresets {
        /// Number of distinct presets resolved.
        found: usize,
    },

    /// Merge sources share too few parameters
    #[error("presets are incompatible: only {percent:.0}% of parameters are shared", percent = .overlap * 100.0)]
    Incompatible {
        /// Shared fraction of the first preset's parameter ids.
        overlap: f64,
    },

    /// A drawn binary section could not be decoded
    #[error("binary section error: {0}")]
    Binary(#[from] BinaryError),

    /// Settings, library or output error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn incompatible_display() {
        let err = GenerateError::Incompatible { overlap: 0.25 };
        assert_eq!(
            err.to_string(),
            "presets are incompatible: only 25% of parameters are shared"
        );
    }

    #[test]
    fn wrapped_errors() {
        let err = GenerateError::from(BinaryError::Empty);
        assert!(err.to_string().starts_with("binary section error"));
        assert!(err.source().is_some());

        let err =
            GenerateError::from(ConfigError::InvalidConfig("amount must be at least 1".into()));
        assert_eq!(err.to_string(), "invalid configuration: amount must be at least 1");
    }

    #[test]
    fn not_found_display() {
        assert_eq!(
            GenerateError::PresetNotFound("Warm".to_string()).to_string(),
            "no preset matches 'Warm'"
        );
    }
}
