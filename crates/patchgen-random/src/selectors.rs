//! Preset selectors.
//!
//! | selector    | resolves to                                        |
//! |-------------|----------------------------------------------------|
//! | `text`      | first preset whose path contains `text`            |
//! | `?`         | one preset picked at random                        |
//! | `?text`     | one random pick among paths containing `text`      |
//! | `*`         | every preset                                       |
//! | `*text`     | every preset whose path contains `text`            |

use std::collections::HashSet;

use patchgen_core::Preset;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::GenerateError;

/// A parsed selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Path substring, first match.
    Literal(&'a str),
    /// Random pick, optionally among paths containing the text.
    PickOne(&'a str),
    /// Every preset, optionally only paths containing the text.
    All(&'a str),
}

impl<'a> Selector<'a> {
    /// Parse selector text.
    pub fn parse(text: &'a str) -> Self {
        if let Some(rest) = text.strip_prefix('?') {
            Selector::PickOne(rest)
        } else if let Some(rest) = text.strip_prefix('*') {
            Selector::All(rest)
        } else {
            Selector::Literal(text)
        }
    }
}

fn matching<'p>(presets: &[&'p Preset], filter: &str) -> Vec<&'p Preset> {
    presets
        .iter()
        .copied()
        .filter(|p| p.file_path.contains(filter))
        .collect()
}

/// Resolve a selector to a single preset.
///
/// `*` selectors resolve to their first match.
pub fn resolve_one<'p, R: Rng + ?Sized>(
    selector: &str,
    presets: &[&'p Preset],
    rng: &mut R,
) -> Result<&'p Preset, GenerateError> {
    let found = match Selector::parse(selector) {
        Selector::Literal(text) | Selector::All(text) => {
            presets.iter().copied().find(|p| p.file_path.contains(text))
        }
        Selector::PickOne(filter) => matching(presets, filter).choose(rng).copied(),
    };
    found.ok_or_else(|| GenerateError::PresetNotFound(selector.to_string()))
}

/// Resolve merge selectors to at least two distinct presets.
///
/// Results keep selector order; a preset selected twice appears once.
pub fn resolve_many<'p, R: Rng + ?Sized>(
    selectors: &[String],
    presets: &[&'p Preset],
    rng: &mut R,
) -> Result<Vec<&'p Preset>, GenerateError> {
    let mut resolved = Vec::new();
    for selector in selectors {
        match Selector::parse(selector) {
            Selector::All(filter) => {
                let found = matching(presets, filter);
                if found.is_empty() {
                    return Err(GenerateError::PresetNotFound(selector.clone()));
                }
                resolved.extend(found);
            }
            _ => resolved.push(resolve_one(selector, presets, rng)?),
        }
    }

    let mut seen = HashSet::new();
    resolved.retain(|p| seen.insert(p.file_path.clone()));
    if resolved.len() < 2 {
        return Err(GenerateError::NotEnoughPresets {
            found: resolved.len(),
        });
    }
    Ok(resolved)
}
