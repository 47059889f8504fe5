//! Where and how generated presets are written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use patchgen_core::{Preset, serialize_preset};

/// Folder under the user presets folder that receives generated presets.
pub const RANDOM_FOLDER: &str = "RANDOM";

/// Subfolder for fully random presets.
pub const FULLY_RANDOM_FOLDER: &str = "Fully Random";

/// Subfolder for variations of a single preset.
pub const RANDOMIZED_PRESET_FOLDER: &str = "Randomized Preset";

/// Subfolder for merged presets.
pub const MERGED_PRESET_FOLDER: &str = "Merged Preset";

/// Write root for a generation mode: `<user>/RANDOM/<subfolder>`.
pub fn output_folder(user_presets_folder: impl AsRef<Path>, subfolder: &str) -> PathBuf {
    user_presets_folder
        .as_ref()
        .join(RANDOM_FOLDER)
        .join(subfolder)
}

/// Replace characters that are not allowed in file names with `_`.
///
/// Leading and trailing whitespace and dots are removed; an empty result
/// becomes `"Untitled"`.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        "Untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitized, batch-unique file stems for `names`.
///
/// Repeated names get ` 2`, ` 3`, ... appended, compared case-insensitively.
pub fn unique_file_stems<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let base = sanitize_file_name(name);
            let mut stem = base.clone();
            let mut n = 2;
            while !taken.insert(stem.to_lowercase()) {
                stem = format!("{base} {n}");
                n += 1;
            }
            stem
        })
        .collect()
}

/// Serialize `presets` into `folder`, one file per preset named after it.
///
/// The folder is created if needed. Existing files with the same name are
/// overwritten. Returns the absolute paths written, in order.
pub fn write_presets(
    folder: impl AsRef<Path>,
    presets: &[Preset],
    extension: &str,
) -> Result<Vec<PathBuf>, ConfigError> {
    let folder = folder.as_ref();
    std::fs::create_dir_all(folder).map_err(|e| ConfigError::create_dir(folder, e))?;

    let stems = unique_file_stems(presets.iter().map(|p| p.preset_name.as_str()));
    let mut written = Vec::with_capacity(presets.len());
    for (preset, stem) in presets.iter().zip(stems) {
        let path = folder.join(format!("{stem}.{extension}"));
        std::fs::write(&path, serialize_preset(preset))
            .map_err(|e| ConfigError::write_file(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote preset");
        written.push(std::path::absolute(&path).unwrap_or(path));
    }
    Ok(written)
}
