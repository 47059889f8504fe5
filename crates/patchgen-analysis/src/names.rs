//! Word pool harvested from existing preset names.

use std::collections::HashSet;

use patchgen_core::Preset;

/// Words too generic to make an interesting name.
pub const STOPLIST: &[&str] = &[
    "bass", "lead", "pads", "synth", "drum", "drums", "pluck", "plucks", "keys", "init",
    "chord", "chords", "string", "strings", "brass", "bell", "bells", "organ", "piano", "perc",
    "poly", "mono", "sweep", "sound", "sounds", "patch", "preset", "default", "copy", "test",
    "with", "from", "the", "and",
];

/// Whether a token from a preset name qualifies as a name word.
///
/// Tokens must be longer than three characters, not entirely uppercase,
/// free of `-`, `(` and `)`, and not in [`STOPLIST`].
pub fn is_name_word(token: &str) -> bool {
    token.chars().count() > 3
        && token != token.to_uppercase()
        && !token.contains(['-', '(', ')'])
        && !STOPLIST.iter().any(|w| w.eq_ignore_ascii_case(token))
}

/// Collect the name pool of a library.
///
/// Preset names are split on `_` and spaces. Words keep their first-seen
/// order and appear once.
pub fn dictionary_of_names<'a>(presets: impl IntoIterator<Item = &'a Preset>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for preset in presets {
        for token in preset.preset_name.split(['_', ' ']) {
            if is_name_word(token) && seen.insert(token.to_lowercase()) {
                words.push(token.to_string());
            }
        }
    }
    tracing::debug!(words = words.len(), "collected name dictionary");
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_filter() {
        assert!(is_name_word("Glassy"));
        assert!(!is_name_word("Pad"));
        assert!(!is_name_word("Bass"));
        assert!(!is_name_word("BASS2"));
        assert!(!is_name_word("Lo-Fi"));
        assert!(!is_name_word("(copy)"));
        assert!(!is_name_word("1234"));
        assert!(is_name_word("Nebula7"));
    }

    #[test]
    fn dictionary_from_names() {
        let presets = [
            Preset::new("/Local/Pads/Glassy Nebula Pad.h2p"),
            Preset::new("/Local/Bass/FM_Growler_Bass.h2p"),
            Preset::new("/User/glassy_DRONE.h2p"),
        ];
        assert_eq!(
            dictionary_of_names(&presets),
            vec!["Glassy", "Nebula", "Growler"]
        );
    }

    #[test]
    fn empty_library_gives_empty_pool() {
        assert!(dictionary_of_names(&Vec::<Preset>::new()).is_empty());
    }
}
