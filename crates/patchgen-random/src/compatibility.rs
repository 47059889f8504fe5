//! Parameter overlap check for merge sources.

use std::collections::HashSet;

use patchgen_core::Preset;

use crate::error::GenerateError;

/// Overlap below this fraction refuses to merge.
pub const MIN_OVERLAP: f64 = 0.5;

/// Overlap below this fraction merges with a warning.
pub const WARN_OVERLAP: f64 = 0.8;

/// Outcome of a successful check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Compatibility {
    /// At least [`WARN_OVERLAP`] of the parameters are shared.
    Full,
    /// Mergeable, but a noticeable share of parameters is missing somewhere.
    Partial {
        /// Shared fraction.
        overlap: f64,
    },
}

/// Fraction of the first preset's ids present in every other preset.
///
/// A first preset without parameters has no overlap. A single preset
/// overlaps fully with itself.
pub fn param_overlap(presets: &[&Preset]) -> f64 {
    let Some((first, others)) = presets.split_first() else {
        return 1.0;
    };
    if first.params.is_empty() {
        return 0.0;
    }
    let other_ids: Vec<HashSet<&str>> = others.iter().map(|p| p.param_ids().collect()).collect();
    let shared = first
        .param_ids()
        .filter(|id| other_ids.iter().all(|ids| ids.contains(id)))
        .count();
    shared as f64 / first.params.len() as f64
}

/// Check that `presets` share enough parameters to be merged.
pub fn check_compatibility(presets: &[&Preset]) -> Result<Compatibility, GenerateError> {
    let overlap = param_overlap(presets);
    if overlap < MIN_OVERLAP {
        return Err(GenerateError::Incompatible { overlap });
    }
    if overlap < WARN_OVERLAP {
        tracing::warn!(
            overlap = format_args!("{:.0}%", overlap * 100.0),
            "merge sources share few parameters"
        );
        return Ok(Compatibility::Partial { overlap });
    }
    Ok(Compatibility::Full)
}
