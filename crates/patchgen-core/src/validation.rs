//! Preset validation.
//!
//! Presets written by an older, broken serializer contain stringified
//! JavaScript artifacts in ids or values. Such presets, and presets without
//! parameters or metadata, are rejected before they enter a library.

use thiserror::Error;

use crate::preset::Preset;
use crate::value::ParamValue;

/// Substrings that mark a corrupted parameter.
pub const CORRUPTION_MARKERS: [&str; 2] = ["[object Object]", "undefined"];

/// Reason a preset was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The parameter section is empty.
    #[error("preset has no parameters")]
    NoParams,

    /// The metadata header is empty.
    #[error("preset has no metadata")]
    NoMeta,

    /// A parameter id or value carries a corruption marker.
    #[error("parameter '{id}' is corrupted")]
    CorruptedParam {
        /// Id of the offending parameter.
        id: String,
    },
}

/// Whether a string contains one of the [`CORRUPTION_MARKERS`].
pub fn is_corrupted(text: &str) -> bool {
    CORRUPTION_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Check a preset for the defects that keep it out of a library.
pub fn validate_preset(preset: &Preset) -> Result<(), ValidationError> {
    if preset.params.is_empty() {
        return Err(ValidationError::NoParams);
    }
    if preset.meta.is_empty() {
        return Err(ValidationError::NoMeta);
    }
    let corrupted = preset.params.iter().find(|p| {
        is_corrupted(&p.id) || matches!(&p.value, ParamValue::String(s) if is_corrupted(s))
    });
    match corrupted {
        Some(param) => Err(ValidationError::CorruptedParam {
            id: param.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Like [`validate_preset`], logging a warning for rejected presets.
pub fn is_valid_preset(preset: &Preset) -> bool {
    match validate_preset(preset) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %preset.file_path, reason = %e, "invalid preset");
            false
        }
    }
}
