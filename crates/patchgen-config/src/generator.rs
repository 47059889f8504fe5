//! Settings for one generation request.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::output::{FULLY_RANDOM_FOLDER, MERGED_PRESET_FOLDER, RANDOMIZED_PRESET_FOLDER};

/// Randomness used for single-preset variation when none is given.
pub const DEFAULT_RANDOMNESS: f64 = 50.0;

/// Settings for one generation request.
///
/// The value is immutable once built and passed explicitly to every
/// generation call. It loads from TOML with every field optional:
///
/// ```toml
/// synth = "Zebra2"
/// amount = 4
/// randomness = 35.0
/// stable = true
/// category = "Pads"
/// merge = ["Warm Cloud", "?Strings"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Synth family name (e.g. `"Zebra2"`).
    pub synth: String,
    /// Number of presets to generate.
    pub amount: usize,
    /// Randomness in percent; clamped to `0..=100` when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomness: Option<f64>,
    /// Keep coherence-critical parameters untouched.
    pub stable: bool,
    /// Swap binary sections between source presets.
    pub binary: bool,
    /// Name generated presets from words found in the library.
    pub dictionary: bool,
    /// Restrict sources to a category prefix and tag outputs with it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Restrict sources to an author (case-insensitive substring).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Restrict sources to paths containing this text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Restrict sources to the entries of one favorites file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<String>,
    /// Base preset selector for single-preset variation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Source selectors for merging.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merge: Vec<String>,
    /// Fixed name for generated presets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            synth: String::new(),
            amount: 1,
            randomness: None,
            stable: false,
            binary: false,
            dictionary: false,
            category: None,
            author: None,
            folder: None,
            favorites: None,
            preset: None,
            merge: Vec::new(),
            custom_name: None,
        }
    }
}

/// Which generator a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode<'a> {
    /// Fully random presets built from library statistics.
    FullRandom,
    /// Variations of one base preset.
    Single {
        /// Base preset selector.
        selector: &'a str,
    },
    /// Weighted blends of several presets.
    Merge {
        /// Source selectors.
        selectors: &'a [String],
    },
}

impl GenerationMode<'_> {
    /// Output subfolder under `RANDOM/`.
    pub const fn subfolder(&self) -> &'static str {
        match self {
            GenerationMode::FullRandom => FULLY_RANDOM_FOLDER,
            GenerationMode::Single { .. } => RANDOMIZED_PRESET_FOLDER,
            GenerationMode::Merge { .. } => MERGED_PRESET_FOLDER,
        }
    }

    /// Short label used in generated descriptions.
    pub const fn label(&self) -> &'static str {
        match self {
            GenerationMode::FullRandom => "fully random",
            GenerationMode::Single { .. } => "randomized",
            GenerationMode::Merge { .. } => "merged",
        }
    }
}

impl GeneratorConfig {
    /// Create settings for a synth family with everything else defaulted.
    pub fn new(synth: impl Into<String>) -> Self {
        Self {
            synth: synth.into(),
            ..Self::default()
        }
    }

    /// Set the number of presets to generate.
    pub fn with_amount(mut self, amount: usize) -> Self {
        self.amount = amount;
        self
    }

    /// Set the randomness percentage.
    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = Some(randomness);
        self
    }

    /// Select a base preset for single-preset variation.
    pub fn with_preset(mut self, selector: impl Into<String>) -> Self {
        self.preset = Some(selector.into());
        self
    }

    /// Select merge sources.
    pub fn with_merge(mut self, selectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.merge = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Turn stable mode on or off.
    pub fn with_stable(mut self, stable: bool) -> Self {
        self.stable = stable;
        self
    }

    /// Turn binary swapping on or off.
    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Mode selected by these settings.
    ///
    /// A non-empty merge list wins over a base preset selector.
    pub fn mode(&self) -> GenerationMode<'_> {
        if !self.merge.is_empty() {
            GenerationMode::Merge {
                selectors: &self.merge,
            }
        } else if let Some(selector) = &self.preset {
            GenerationMode::Single { selector }
        } else {
            GenerationMode::FullRandom
        }
    }

    /// Randomness as a ratio in `0.0..=1.0`, if set.
    pub fn randomness_ratio(&self) -> Option<f64> {
        self.randomness.map(|r| r.clamp(0.0, 100.0) / 100.0)
    }

    /// Check that the settings can drive a generation run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.amount == 0 {
            return Err(ConfigError::InvalidConfig(
                "amount must be at least 1".to_string(),
            ));
        }
        if let Some(r) = self.randomness
            && (!r.is_finite() || r < 0.0)
        {
            return Err(ConfigError::InvalidConfig(format!(
                "randomness must be a non-negative percentage, got {r}"
            )));
        }
        if let [only] = self.merge.as_slice()
            && !only.starts_with(['*', '?'])
        {
            return Err(ConfigError::InvalidConfig(format!(
                "merging needs at least two presets, got only '{only}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.amount, 1);
        assert!(config.randomness.is_none());
        assert_eq!(config.mode(), GenerationMode::FullRandom);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = GeneratorConfig::from_toml(
            r#"
            synth = "Hive"
            amount = 3
            randomness = 25.0
            stable = true
            preset = "?Pads"
            "#,
        )
        .unwrap();
        assert_eq!(config.synth, "Hive");
        assert_eq!(config.amount, 3);
        assert!(config.stable);
        assert!(!config.binary);
        assert_eq!(config.mode(), GenerationMode::Single { selector: "?Pads" });
        assert_eq!(config.randomness_ratio(), Some(0.25));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = GeneratorConfig::new("Diva")
            .with_amount(2)
            .with_merge(["Warm", "Cold"])
            .with_binary(true);
        let toml = config.to_toml().unwrap();
        assert!(!toml.contains("randomness"));
        assert_eq!(GeneratorConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_merge_wins_over_preset() {
        let config = GeneratorConfig::new("Zebra2")
            .with_preset("Warm")
            .with_merge(["*Pads"]);
        assert_eq!(config.mode().subfolder(), MERGED_PRESET_FOLDER);
        assert_eq!(config.mode().label(), "merged");
    }

    #[test]
    fn test_randomness_is_clamped() {
        assert_eq!(
            GeneratorConfig::new("Zebra2").with_randomness(250.0).randomness_ratio(),
            Some(1.0)
        );
    }

    #[test]
    fn test_validation() {
        assert!(GeneratorConfig::new("Zebra2").with_amount(0).validate().is_err());
        assert!(GeneratorConfig::new("Zebra2").with_randomness(-1.0).validate().is_err());
        assert!(GeneratorConfig::new("Zebra2").with_randomness(f64::NAN).validate().is_err());
        assert!(GeneratorConfig::new("Zebra2").with_randomness(150.0).validate().is_ok());
        assert!(GeneratorConfig::new("Zebra2").with_merge(["Warm"]).validate().is_err());
        assert!(GeneratorConfig::new("Zebra2").with_merge(["*Warm"]).validate().is_ok());
        assert!(GeneratorConfig::new("Zebra2").with_merge(["?Pads"]).validate().is_ok());
        assert!(
            GeneratorConfig::new("Zebra2")
                .with_merge(["Warm", "?"])
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("gen.toml");
        let config = GeneratorConfig::new("Repro-1").with_stable(true);
        config.save(&path).unwrap();
        assert_eq!(GeneratorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load("/nonexistent/patchgen.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
