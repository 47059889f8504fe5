//! Parameter stability rules.
//!
//! Some parameters must not be randomized freely: transposition and fine
//! tuning detune a patch, structural `#` keys describe the file layout, and a
//! few synths store indices that point into their binary section. Each rule
//! tags every parameter whose id contains its substring.

use serde::{Deserialize, Serialize};

/// How strongly a parameter is protected from randomization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StabilityTag {
    /// Kept only when stable generation is requested.
    StableModeOnly,
    /// Never randomized.
    Always,
}

impl StabilityTag {
    /// Whether a parameter with this tag is excluded from randomization.
    pub const fn excludes(self, stable: bool) -> bool {
        match self {
            StabilityTag::Always => true,
            StabilityTag::StableModeOnly => stable,
        }
    }
}

/// Whether an optional tag excludes a parameter in the given mode.
pub fn is_excluded(tag: Option<StabilityTag>, stable: bool) -> bool {
    tag.is_some_and(|t| t.excludes(stable))
}

/// A single `{idSubstring, tag}` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityRule {
    /// Substring matched against parameter ids.
    pub id_substring: &'static str,
    /// Tag given to matching parameters.
    pub tag: StabilityTag,
}

impl StabilityRule {
    /// Rule tagging matches [`StabilityTag::Always`].
    pub const fn always(id_substring: &'static str) -> Self {
        Self {
            id_substring,
            tag: StabilityTag::Always,
        }
    }

    /// Rule tagging matches [`StabilityTag::StableModeOnly`].
    pub const fn stable_mode_only(id_substring: &'static str) -> Self {
        Self {
            id_substring,
            tag: StabilityTag::StableModeOnly,
        }
    }

    /// Whether the rule applies to a parameter id.
    pub fn matches(&self, id: &str) -> bool {
        id.contains(self.id_substring)
    }
}

/// Rules applied to every synth family.
pub static GLOBAL_RULES: &[StabilityRule] = &[
    // File structure keys (#cm, #ms, #mv, #nm, #AM, ...)
    StabilityRule::always("/#"),
    StabilityRule::always("/Trsp"),
    StabilityRule::always("/Transpose"),
    StabilityRule::stable_mode_only("/Tune"),
    StabilityRule::stable_mode_only("/FTun"),
    StabilityRule::stable_mode_only("/Detune"),
];

/// Resolved rule set for one synth family: the global rules plus the
/// family's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPolicy {
    rules: Vec<StabilityRule>,
}

impl Default for ParameterPolicy {
    fn default() -> Self {
        Self::global()
    }
}

impl ParameterPolicy {
    /// Policy holding only the global rules.
    pub fn global() -> Self {
        Self {
            rules: GLOBAL_RULES.to_vec(),
        }
    }

    /// Global rules extended with family-specific rules.
    pub fn with_family_rules(family_rules: &[StabilityRule]) -> Self {
        let mut policy = Self::global();
        policy.rules.extend_from_slice(family_rules);
        policy
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> &[StabilityRule] {
        &self.rules
    }

    /// Resolve the tag for a parameter id.
    ///
    /// `Always` wins over `StableModeOnly` when both match.
    pub fn resolve(&self, id: &str) -> Option<StabilityTag> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(id))
            .map(|rule| rule.tag)
            .max()
    }

    /// Whether `id` is excluded from randomization.
    pub fn is_excluded(&self, id: &str, stable: bool) -> bool {
        is_excluded(self.resolve(id), stable)
    }
}
