//! Binary section swapping.
//!
//! Binary sections are never blended. A generated preset either keeps the
//! section of the preset its parameters came from or takes a whole section
//! from another source.

use patchgen_core::{BinaryError, Preset, parse_binary_section};
use rand::Rng;
use rand::seq::SliceRandom;

/// Binary sections of `presets`, in order.
pub fn binary_pool<'p>(presets: &[&'p Preset]) -> Vec<&'p str> {
    presets
        .iter()
        .filter_map(|p| p.binary.as_deref())
        .collect()
}

/// Replace the binary section of `preset` with a uniform draw from `pool`.
///
/// The drawn section must decode; a broken section aborts. An empty pool
/// leaves the preset unchanged.
pub fn swap_binary<R: Rng + ?Sized>(
    preset: &mut Preset,
    pool: &[&str],
    rng: &mut R,
) -> Result<(), BinaryError> {
    let Some(chosen) = pool.choose(rng) else {
        return Ok(());
    };
    parse_binary_section(chosen)?;
    preset.binary = Some((*chosen).to_string());
    Ok(())
}
