//! Numeric helpers shared by the generators.

use patchgen_core::{ParamType, ParamValue};
use rand::Rng;
use rand::seq::SliceRandom;

/// Truncate toward zero to two decimal places.
///
/// A tiny bias in the direction of the sign keeps values such as `0.29`,
/// which are stored slightly below their decimal form, from dropping a
/// hundredth.
pub fn truncate_2(x: f64) -> f64 {
    (x * 100.0 + x.signum() * 1e-9).trunc() / 100.0
}

/// Linear blend `old * (1 - r) + drawn * r`.
pub fn blend(old: f64, drawn: f64, r: f64) -> f64 {
    old * (1.0 - r) + drawn * r
}

/// Convert a computed number back to a value of the model type.
///
/// Integers round to the nearest whole number; floats truncate to two
/// decimals. Returns `None` for the string type.
pub fn coerce(param_type: ParamType, x: f64) -> Option<ParamValue> {
    match param_type {
        ParamType::Integer => Some(ParamValue::Integer(x.round() as i64)),
        ParamType::Float => Some(ParamValue::Float(truncate_2(x))),
        ParamType::String => None,
    }
}

/// Uniform draw from a value pool.
pub fn draw<R: Rng + ?Sized>(pool: &[ParamValue], rng: &mut R) -> Option<ParamValue> {
    pool.choose(rng).cloned()
}

/// One merge weight per source: uniform draws in `(0, 1]` normalized to a
/// sum of one.
pub fn merge_weights<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    let raw: Vec<f64> = (0..count).map(|_| 1.0 - rng.r#gen::<f64>()).collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}
