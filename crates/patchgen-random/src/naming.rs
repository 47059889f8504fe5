//! Names for generated presets.

use rand::Rng;
use rand::seq::SliceRandom;

static ADJECTIVES: &[&str] = &[
    "Ancient", "Bitter", "Bright", "Broken", "Calm", "Cosmic", "Crooked", "Distant", "Dusty",
    "Electric", "Empty", "Fading", "Frozen", "Gentle", "Golden", "Hidden", "Hollow", "Lazy",
    "Liquid", "Lonely", "Lucid", "Molten", "Nervous", "Quiet", "Restless", "Rusty", "Silent",
    "Sleepy", "Strange", "Velvet", "Wild", "Wooden",
];

static COLORS: &[&str] = &[
    "Amber", "Azure", "Black", "Blue", "Copper", "Crimson", "Cyan", "Emerald", "Grey",
    "Indigo", "Ivory", "Jade", "Magenta", "Ochre", "Orange", "Purple", "Red", "Scarlet",
    "Silver", "Teal", "Violet", "White",
];

static NAMES: &[&str] = &[
    "Anchor", "Bloom", "Canyon", "Circuit", "Comet", "Current", "Drift", "Echo", "Ember",
    "Engine", "Falcon", "Forest", "Garden", "Glacier", "Harbor", "Horizon", "Lantern",
    "Machine", "Meadow", "Mirror", "Nebula", "Orbit", "Pulse", "River", "Signal", "Spiral",
    "Storm", "Temple", "Tide", "Voyage", "Whisper", "Window",
];

fn pick<'w, R: Rng + ?Sized>(words: &[&'w str], rng: &mut R) -> &'w str {
    words.choose(rng).copied().unwrap_or_default()
}

/// `<Adjective> <Color> <Name>` from built-in word tables.
pub fn generic_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(ADJECTIVES, rng),
        pick(COLORS, rng),
        pick(NAMES, rng)
    )
}

/// Three capitalised words drawn from `pool`.
///
/// Falls back to [`generic_name`] when the pool is empty.
pub fn dictionary_name<R: Rng + ?Sized>(pool: &[String], rng: &mut R) -> String {
    if pool.is_empty() {
        return generic_name(rng);
    }
    (0..3)
        .filter_map(|_| pool.choose(rng))
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
