//! Metadata stamped onto generated presets.

use chrono::Local;
use patchgen_core::{CATEGORIES_KEY, Preset};

/// Author written into every generated preset.
pub const GENERATOR_AUTHOR: &str = "Random Generator";

/// Provenance of a generated preset.
#[derive(Debug, Clone, Copy)]
pub struct Provenance<'a> {
    /// Generation mode label, e.g. `"merged"`.
    pub mode: &'a str,
    /// Names of the presets the result was built from.
    pub sources: &'a [&'a str],
    /// Category to tag the result with.
    pub category: Option<&'a str>,
}

impl Provenance<'_> {
    /// Description text: mode, sources and today's date.
    ///
    /// Sources are joined with `" + "` because `", "` would turn the value
    /// into a list when read back.
    pub fn description(&self) -> String {
        let date = Local::now().format("%Y-%m-%d");
        let mut mode = crate::naming::capitalize(self.mode);
        mode.push_str(" preset");
        if self.sources.is_empty() {
            format!("{mode} generated {date}")
        } else {
            format!("{mode} based on {} generated {date}", self.sources.join(" + "))
        }
    }
}

/// Replace the metadata of `preset` with generator metadata.
pub fn apply_generated_meta(preset: &mut Preset, provenance: &Provenance<'_>) {
    preset.meta.clear();
    preset.categories.clear();
    preset.set_meta("Author", GENERATOR_AUTHOR);
    preset.set_meta("Description", provenance.description());
    if let Some(category) = provenance.category {
        preset.set_meta(CATEGORIES_KEY, category);
    }
}
