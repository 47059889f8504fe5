//! Favorites files.
//!
//! A favorites file is a JSON document grouping preset references by
//! category:
//!
//! ```json
//! { "tag-category-fav": { "Leads": [ { "name": "Bright Saw", "db_path": "Leads/Bright Saw.h2p" } ] } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use patchgen_core::Preset;

/// Extension of favorites files.
pub const FAVORITES_EXTENSION: &str = "uhe-fav";

/// One preset reference inside a favorites group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Preset name.
    pub name: String,
    /// Path of the preset relative to its library folder.
    #[serde(default)]
    pub db_path: String,
}

impl FavoriteEntry {
    /// Whether the entry refers to `preset`.
    ///
    /// A preset matches when its path ends with the entry's `db_path` or its
    /// name equals the entry's name.
    pub fn matches(&self, preset: &Preset) -> bool {
        (!self.db_path.is_empty() && preset.file_path.ends_with(&self.db_path))
            || preset.preset_name == self.name
    }
}

#[derive(Deserialize)]
struct FavoritesDocument {
    #[serde(rename = "tag-category-fav", default)]
    groups: BTreeMap<String, Vec<FavoriteEntry>>,
}

/// A parsed favorites file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesFile {
    /// File stem, used to select the file.
    pub name: String,
    /// Entries by group.
    pub groups: BTreeMap<String, Vec<FavoriteEntry>>,
}

impl FavoritesFile {
    /// Parse a favorites document.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, serde_json::Error> {
        let document: FavoritesDocument = serde_json::from_str(json)?;
        Ok(Self {
            name: name.into(),
            groups: document.groups,
        })
    }

    /// Read a favorites file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_json(name, &content).map_err(|e| ConfigError::favorites_parse(path, e))
    }

    /// All entries across groups.
    pub fn entries(&self) -> impl Iterator<Item = &FavoriteEntry> {
        self.groups.values().flatten()
    }

    /// Whether any entry refers to `preset`.
    pub fn contains(&self, preset: &Preset) -> bool {
        self.entries().any(|entry| entry.matches(preset))
    }
}

/// Read every favorites file in `dir`, sorted by file name.
///
/// A missing directory yields an empty list. Unreadable or malformed files
/// are skipped with a warning.
pub fn load_favorites_dir(dir: impl AsRef<Path>) -> Vec<FavoritesFile> {
    let dir = dir.as_ref();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == FAVORITES_EXTENSION)
        })
        .collect();
    paths.sort();

    paths
        .iter()
        .filter_map(|path| match FavoritesFile::load(path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(error = %e, "skipping favorites file");
                None
            }
        })
        .collect()
}
