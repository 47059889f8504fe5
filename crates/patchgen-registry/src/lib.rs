//! Synth family registry for patchgen.
//!
//! Every supported synth family has a descriptor with its preset file
//! extension and the stability rules specific to it. The registry resolves a
//! family by name and hands out the combined [`ParameterPolicy`].
//!
//! # Example
//!
//! ```rust
//! use patchgen_registry::{SynthRegistry, StabilityTag};
//!
//! let registry = SynthRegistry::new();
//! let policy = registry.policy_for("Zebra2");
//!
//! assert_eq!(policy.resolve("OSC1/Tune"), Some(StabilityTag::StableModeOnly));
//! assert_eq!(policy.resolve("main/#cm"), Some(StabilityTag::Always));
//! ```

pub mod policy;

pub use policy::{GLOBAL_RULES, ParameterPolicy, StabilityRule, StabilityTag, is_excluded};

/// Default preset file extension.
pub const DEFAULT_PRESET_EXTENSION: &str = "h2p";

/// Kind of plugin a family belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthKind {
    /// Sound generating instrument.
    Instrument,
    /// Audio effect with presets in the same format.
    Effect,
}

/// Describes a synth family in the registry.
#[derive(Debug, Clone)]
pub struct SynthDescriptor {
    /// Family name as used in install folders (e.g. `"Zebra2"`).
    pub id: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Instrument or effect.
    pub kind: SynthKind,
    /// Preset file extension without the dot.
    pub preset_extension: &'static str,
    /// Rules added to [`GLOBAL_RULES`] for this family.
    pub rules: &'static [StabilityRule],
}

// Curve, geometry and wavetable slots index into the binary section.
static ZEBRA_RULES: &[StabilityRule] = &[
    StabilityRule::always("/Crv"),
    StabilityRule::always("/GeoMorph"),
    StabilityRule::always("/GMSlot"),
    StabilityRule::stable_mode_only("/WNum"),
];

static HIVE_RULES: &[StabilityRule] = &[
    StabilityRule::always("/WTSlot"),
    StabilityRule::stable_mode_only("/Wave"),
];

static DIVA_RULES: &[StabilityRule] = &[
    StabilityRule::always("/PresetMem"),
    StabilityRule::stable_mode_only("/Model"),
];

static REPRO_RULES: &[StabilityRule] = &[
    StabilityRule::always("/PresetMem"),
    StabilityRule::always("/SeqData"),
];

static NO_RULES: &[StabilityRule] = &[];

/// Registry of known synth families.
pub struct SynthRegistry {
    entries: Vec<SynthDescriptor>,
}

impl Default for SynthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthRegistry {
    /// Create a registry with all built-in families.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(16),
        };
        registry.register_builtin_synths();
        registry
    }

    fn register_builtin_synths(&mut self) {
        use SynthKind::{Effect, Instrument};

        let builtin: [(&'static str, &'static str, SynthKind, &'static [StabilityRule]); 16] = [
            ("Zebra2", "Modular wavetable synthesizer", Instrument, ZEBRA_RULES),
            ("ZebraHZ", "Zebra variant with extended oscillators", Instrument, ZEBRA_RULES),
            ("Zebralette3", "Single oscillator Zebra", Instrument, ZEBRA_RULES),
            ("Hive", "Wavetable synthesizer", Instrument, HIVE_RULES),
            ("Diva", "Analog modelling synthesizer", Instrument, DIVA_RULES),
            ("Repro-1", "Monophonic analog model", Instrument, REPRO_RULES),
            ("Repro-5", "Polyphonic analog model", Instrument, REPRO_RULES),
            ("Bazille", "Modular FM synthesizer", Instrument, NO_RULES),
            ("ACE", "Any Cable Everywhere semi-modular", Instrument, NO_RULES),
            ("Podolski", "Single oscillator virtual analog", Instrument, NO_RULES),
            ("TyrellN6", "Analog style synthesizer", Instrument, NO_RULES),
            ("Colour Copy", "Analog delay", Effect, NO_RULES),
            ("Filterscape", "Filter and delay effects", Effect, NO_RULES),
            ("Presswerk", "Dynamics processor", Effect, NO_RULES),
            ("Satin", "Tape emulation", Effect, NO_RULES),
            ("Twangstrom", "Spring reverb", Effect, NO_RULES),
        ];

        for (id, description, kind, rules) in builtin {
            self.register(SynthDescriptor {
                id,
                description,
                kind,
                preset_extension: DEFAULT_PRESET_EXTENSION,
                rules,
            });
        }
    }

    fn register(&mut self, descriptor: SynthDescriptor) {
        self.entries.push(descriptor);
    }

    /// Descriptors of all families.
    pub fn all_synths(&self) -> Vec<&SynthDescriptor> {
        self.entries.iter().collect()
    }

    /// Descriptors of all families of one kind.
    pub fn synths_of_kind(&self, kind: SynthKind) -> Vec<&SynthDescriptor> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    /// Look up a family by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&SynthDescriptor> {
        self.entries.iter().find(|e| e.id.eq_ignore_ascii_case(name))
    }

    /// Stability policy for a family.
    ///
    /// Unknown families get the global rules only.
    pub fn policy_for(&self, name: &str) -> ParameterPolicy {
        match self.get(name) {
            Some(descriptor) => ParameterPolicy::with_family_rules(descriptor.rules),
            None => ParameterPolicy::global(),
        }
    }

    /// Preset file extension for a family, defaulting to `h2p`.
    pub fn preset_extension(&self, name: &str) -> &'static str {
        self.get(name)
            .map_or(DEFAULT_PRESET_EXTENSION, |d| d.preset_extension)
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = SynthRegistry::new();
        assert_eq!(registry.len(), 16);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = SynthRegistry::new();
        assert_eq!(registry.get("hive").unwrap().id, "Hive");
        assert_eq!(registry.get("ZEBRA2").unwrap().id, "Zebra2");
        assert!(registry.get("Minimoog").is_none());
    }

    #[test]
    fn test_synths_by_kind() {
        let registry = SynthRegistry::new();
        assert_eq!(registry.synths_of_kind(SynthKind::Effect).len(), 5);
        assert_eq!(registry.synths_of_kind(SynthKind::Instrument).len(), 11);
    }

    #[test]
    fn test_family_policy_adds_rules() {
        let registry = SynthRegistry::new();
        let zebra = registry.policy_for("Zebra2");
        assert_eq!(zebra.resolve("MSEG1/Crv3"), Some(StabilityTag::Always));
        assert_eq!(zebra.resolve("OSC1/WNum"), Some(StabilityTag::StableModeOnly));

        let hive = registry.policy_for("Hive");
        assert_eq!(hive.resolve("MSEG1/Crv3"), None);
    }

    #[test]
    fn test_unknown_family_uses_global_rules() {
        let registry = SynthRegistry::new();
        let policy = registry.policy_for("Unknown");
        assert_eq!(policy, ParameterPolicy::global());
        assert_eq!(registry.preset_extension("Unknown"), "h2p");
    }
}
