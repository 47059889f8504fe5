//! Parameter-level generators.
//!
//! Every generator works on a deep copy of a source preset and only touches
//! parameter values. Names, metadata and binary sections are handled by the
//! caller.

use std::collections::HashMap;

use patchgen_analysis::{ParamStats, ParamsModel};
use patchgen_core::{ParamType, Preset};
use patchgen_registry::is_excluded;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::values::{blend, coerce, draw, merge_weights};

/// Applies library statistics to presets.
#[derive(Debug, Clone, Copy)]
pub struct Randomizer<'a> {
    model: &'a ParamsModel,
    stable: bool,
}

impl<'a> Randomizer<'a> {
    /// Create a randomizer over `model`.
    ///
    /// With `stable` set, parameters tagged stable-mode-only are kept and
    /// coherence is preserved as described on each generator.
    pub fn new(model: &'a ParamsModel, stable: bool) -> Self {
        Self { model, stable }
    }

    /// Statistics for `id`, logging parameters the model does not know.
    fn stats(&self, id: &str) -> Option<&'a ParamStats> {
        let stats = self.model.get(id);
        if stats.is_none() {
            tracing::error!(id, "parameter missing from statistics model, keeping value");
        }
        stats
    }

    fn excluded(&self, stats: &ParamStats) -> bool {
        is_excluded(stats.keep_stable, self.stable)
    }

    /// Parameters stable mode leaves alone: strings and near-constant values.
    fn low_variety(stats: &ParamStats) -> bool {
        stats.param_type == ParamType::String || stats.distinct_count() <= 2
    }

    /// Build a fully random preset from a uniformly chosen source.
    ///
    /// Without stable mode every parameter not tagged `Always` gets a value
    /// drawn from its pool. In stable mode each section takes its values
    /// from one donor preset, chosen when the section is first seen; only
    /// untagged numeric parameters with more than two distinct values change,
    /// and a donor lacking the id falls back to a pool draw.
    ///
    /// Returns `None` if `sources` is empty.
    pub fn full_random<R: Rng + ?Sized>(
        &self,
        sources: &[&Preset],
        rng: &mut R,
    ) -> Option<Preset> {
        let mut preset = (*sources.choose(rng)?).clone();

        if !self.stable {
            for param in &mut preset.params {
                let Some(stats) = self.stats(&param.id) else {
                    continue;
                };
                if self.excluded(stats) {
                    continue;
                }
                if let Some(value) = draw(&stats.values, rng) {
                    param.value = value;
                }
            }
            return Some(preset);
        }

        let mut donors: HashMap<String, usize> = HashMap::new();
        for param in &mut preset.params {
            let donor = *donors
                .entry(param.section.clone())
                .or_insert_with(|| rng.gen_range(0..sources.len()));
            let Some(stats) = self.stats(&param.id) else {
                continue;
            };
            if stats.keep_stable.is_some() || Self::low_variety(stats) {
                continue;
            }
            let donated = sources[donor].param(&param.id).map(|p| p.value.clone());
            if let Some(value) = donated.or_else(|| draw(&stats.values, rng)) {
                param.value = value;
            }
        }
        Some(preset)
    }

    /// Vary a copy of `base`.
    ///
    /// `randomness` is a ratio in `0.0..=1.0`. Numeric parameters blend
    /// toward a pool draw, `old * (1 - r) + drawn * r`, then round (integer)
    /// or truncate to two decimals (float). String parameters switch to the
    /// drawn value with probability `r`. Stable mode additionally skips
    /// strings and parameters with two or fewer distinct values.
    pub fn randomize<R: Rng + ?Sized>(
        &self,
        base: &Preset,
        randomness: f64,
        rng: &mut R,
    ) -> Preset {
        let r = randomness.clamp(0.0, 1.0);
        let mut preset = base.clone();

        for param in &mut preset.params {
            let Some(stats) = self.stats(&param.id) else {
                continue;
            };
            if self.excluded(stats) || (self.stable && Self::low_variety(stats)) {
                continue;
            }
            let Some(drawn) = draw(&stats.values, rng) else {
                continue;
            };

            if stats.param_type == ParamType::String {
                if rng.r#gen::<f64>() < r {
                    param.value = drawn;
                }
                continue;
            }

            let blended = match (param.value.as_f64(), drawn.as_f64()) {
                (Some(old), Some(new)) => coerce(stats.param_type, blend(old, new, r)),
                _ => Some(drawn),
            };
            if let Some(value) = blended {
                param.value = value;
            }
        }
        preset
    }

    /// Blend `sources` into a copy of a uniformly chosen seed.
    ///
    /// One weight per source is drawn (see [`merge_weights`]). Numeric
    /// parameters become the weighted sum over all sources, using the seed's
    /// own value for sources lacking the id, then round or truncate by model
    /// type. String parameters copy the value of one randomly chosen source
    /// if it has the id.
    ///
    /// Returns `None` if `sources` is empty.
    pub fn merge<R: Rng + ?Sized>(&self, sources: &[&Preset], rng: &mut R) -> Option<Preset> {
        let mut preset = (*sources.choose(rng)?).clone();
        let weights = merge_weights(sources.len(), rng);

        for param in &mut preset.params {
            let Some(stats) = self.stats(&param.id) else {
                continue;
            };
            if self.excluded(stats) {
                continue;
            }

            if stats.param_type == ParamType::String {
                let chosen = sources[rng.gen_range(0..sources.len())];
                if let Some(other) = chosen.param(&param.id) {
                    param.value = other.value.clone();
                }
                continue;
            }

            let Some(own) = param.value.as_f64() else {
                continue;
            };
            let merged: f64 = sources
                .iter()
                .zip(&weights)
                .map(|(source, weight)| {
                    let value = source
                        .param(&param.id)
                        .and_then(|p| p.value.as_f64())
                        .unwrap_or(own);
                    value * weight
                })
                .sum();
            if let Some(value) = coerce(stats.param_type, merged) {
                param.value = value;
            }
        }
        Some(preset)
    }
}
