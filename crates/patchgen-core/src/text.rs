//! Text format codec for preset files.
//!
//! A preset file has three parts:
//!
//! ```text
//! /*@Meta
//!
//! Author:
//! 'Howard Scarr'
//!
//! Categories:
//! 'Bass:Sub, Lead'
//!
//! */
//!
//! #AM=Zebra2
//! #cm=main
//! CcOp=92.00
//! #cm=VCF1
//! Cut=67.50
//!
//! // Section for ugly compressed binary Data
//! // DON'T TOUCH THIS
//!
//! [[[[...]]]]
//! ```
//!
//! The metadata header runs up to the first `*/`. Parameter lines follow, with
//! `#cm=<section>` switching the current section. Everything from the
//! `// Section` marker on is the footer, optionally carrying the binary
//! section.
//!
//! Parsing never fails: malformed input degrades to empty metadata or an
//! empty parameter list.

use std::collections::HashMap;

use crate::preset::{CATEGORIES_KEY, MetaEntry, MetaValue, Preset, PresetParam};
use crate::value::ParamValue;

/// Marker opening the metadata header.
pub const META_MARKERS: [&str; 2] = ["/*@Meta", "/*@meta"];

/// Marker closing the metadata header.
pub const META_END: &str = "*/";

/// Prefix of the footer that ends the parameter body.
pub const FOOTER_PREFIX: &str = "// Section";

/// First line of the binary section marker.
pub const BINARY_MARKER: &str = "// Section for ugly compressed binary Data";

/// Second line of the binary section marker.
pub const BINARY_MARKER_GUARD: &str = "// DON'T TOUCH THIS";

/// Key that switches the current section.
pub const SECTION_KEY: &str = "#cm";

/// Section of every line before the first `#cm`.
pub const DEFAULT_SECTION: &str = "HEAD";

/// Keys that legitimately repeat inside a section.
pub const REPEATING_MARKER_KEYS: [&str; 2] = ["#ms", "#mv"];

/// Whether `key` may appear more than once in a section without a warning.
pub fn is_repeating_marker_key(key: &str) -> bool {
    REPEATING_MARKER_KEYS.contains(&key)
}

/// Parse a whole preset file.
///
/// `file_path` is the virtual path the preset is known by; the preset name is
/// derived from it and categories are taken from the `Categories` entry.
pub fn parse_preset(file_path: &str, text: &str) -> Preset {
    let mut preset = Preset::new(file_path);
    preset.meta = parse_meta(text);
    preset.categories = preset
        .meta_value(CATEGORIES_KEY)
        .map(|v| v.values().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    preset.params = parse_params(text);
    let binary = preset_binary_section(text);
    if !binary.is_empty() {
        preset.binary = Some(binary);
    }
    preset
}

/// Parse the metadata header.
///
/// Non-empty lines are read in pairs: a `Key:` line followed by a quoted
/// value line. Values containing `", "` become lists. A trailing unpaired
/// line is ignored.
pub fn parse_meta(text: &str) -> Vec<MetaEntry> {
    let Some((header, _)) = text.split_once(META_END) else {
        return Vec::new();
    };
    let header = header.trim_start();
    let header = META_MARKERS
        .iter()
        .find_map(|marker| header.strip_prefix(marker))
        .unwrap_or(header);

    let lines: Vec<&str> = header
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .chunks_exact(2)
        .map(|pair| {
            let key = pair[0].strip_suffix(':').unwrap_or(pair[0]).trim();
            let raw = pair[1];
            let raw = raw.strip_prefix('\'').unwrap_or(raw);
            let raw = raw.strip_suffix('\'').unwrap_or(raw);
            let value = if raw.contains(", ") {
                MetaValue::List(raw.split(", ").map(str::to_string).collect())
            } else {
                MetaValue::Single(raw.to_string())
            };
            MetaEntry {
                key: key.to_string(),
                value,
            }
        })
        .collect()
}

/// Parse the parameter body.
pub fn parse_params(text: &str) -> Vec<PresetParam> {
    let body = text.split_once(META_END).map_or(text, |(_, body)| body);
    let body = body.split_once(FOOTER_PREFIX).map_or(body, |(body, _)| body);

    let scanner = body
        .lines()
        .fold(ParamScanner::default(), ParamScanner::push_line);
    for id in &scanner.unexpected_repeats {
        tracing::warn!(id = %id, "duplicate parameter key in section");
    }
    scanner.params
}

/// Id bookkeeping for one `section/key` pair.
struct Repeat {
    /// Position of the first occurrence in the output.
    first: usize,
    /// Occurrences seen so far.
    count: usize,
}

/// Accumulator threaded through the parameter lines.
struct ParamScanner {
    section: String,
    repeats: HashMap<String, Repeat>,
    params: Vec<PresetParam>,
    /// Repeated ids whose key is not a marker key, in order of first repeat.
    unexpected_repeats: Vec<String>,
}

impl Default for ParamScanner {
    fn default() -> Self {
        Self {
            section: DEFAULT_SECTION.to_string(),
            repeats: HashMap::new(),
            params: Vec::new(),
            unexpected_repeats: Vec::new(),
        }
    }
}

impl ParamScanner {
    fn push_line(mut self, line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some((key, raw)) = line.split_once('=') else {
            return self;
        };
        let key = key.trim();
        if key.is_empty() {
            return self;
        }
        if key == SECTION_KEY {
            self.section = raw.trim().to_string();
        }

        let base_id = format!("{}/{}", self.section, key);
        let index = self.params.len();
        let id = match self.repeats.get_mut(&base_id) {
            None => {
                self.repeats.insert(
                    base_id.clone(),
                    Repeat {
                        first: index,
                        count: 1,
                    },
                );
                base_id
            }
            Some(repeat) => {
                if repeat.count == 1 {
                    self.params[repeat.first].id = format!("{base_id}/0");
                    if !is_repeating_marker_key(key) {
                        self.unexpected_repeats.push(base_id.clone());
                    }
                }
                let id = format!("{base_id}/{}", repeat.count);
                repeat.count += 1;
                id
            }
        };

        self.params.push(PresetParam {
            id,
            key: key.to_string(),
            section: self.section.clone(),
            value: ParamValue::parse(raw),
            index,
        });
        self
    }
}

/// Extract the encoded binary section.
///
/// Returns everything after the two marker lines, trimmed, or an empty string
/// if the file carries no binary section.
pub fn preset_binary_section(text: &str) -> String {
    let mut rest = text;
    while let Some(start) = rest.find(BINARY_MARKER) {
        let after = &rest[start + BINARY_MARKER.len()..];
        if let Some(tail) = after.trim_start().strip_prefix(BINARY_MARKER_GUARD) {
            return tail.trim().to_string();
        }
        rest = after;
    }
    String::new()
}

/// Serialize a preset back to the text format.
///
/// Re-parsing the output reproduces every parameter key, value, type and
/// order and every metadata entry; whitespace of hand-written files is not
/// preserved.
pub fn serialize_preset(preset: &Preset) -> String {
    let mut out = String::new();

    out.push_str(META_MARKERS[0]);
    out.push_str("\n\n");
    for entry in &preset.meta {
        out.push_str(&format!("{}:\n'{}'\n\n", entry.key, entry.value));
    }
    out.push_str(META_END);
    out.push_str("\n\n");

    for param in &preset.params {
        out.push_str(&format!("{}={}\n", param.key, param.value));
    }

    out.push_str(&format!("\n\n\n{BINARY_MARKER}\n{BINARY_MARKER_GUARD}\n\n"));
    if let Some(binary) = &preset.binary {
        out.push_str(binary);
        out.push('\n');
    }
    out
}
