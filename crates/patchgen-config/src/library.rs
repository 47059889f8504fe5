//! Preset library loading and filtering.
//!
//! Presets are read through a [`PresetSource`], which yields virtual paths
//! (`/Local/...` for factory presets, `/User/...` for user presets) paired
//! with raw file text. Every file is parsed and validated; invalid presets
//! are dropped with a warning and never reach generation.

use std::path::{Path, PathBuf};

use patchgen_core::{LOCAL_PREFIX, Preset, USER_PREFIX, parse_preset, validate_preset};
use patchgen_registry::SynthRegistry;

use crate::error::ConfigError;
use crate::favorites::{FavoritesFile, load_favorites_dir};
use crate::generator::GeneratorConfig;
use crate::output::RANDOM_FOLDER;

/// One preset file as delivered by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFile {
    /// Virtual path with origin prefix, e.g. `/Local/Pads/Warm.h2p`.
    pub virtual_path: String,
    /// Raw file text.
    pub text: String,
}

impl PresetFile {
    /// Pair a virtual path with file text.
    pub fn new(virtual_path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            virtual_path: virtual_path.into(),
            text: text.into(),
        }
    }
}

/// Supplies preset files in a stable order.
pub trait PresetSource {
    /// All preset files of the library.
    fn preset_files(&self) -> Result<Vec<PresetFile>, ConfigError>;
}

/// Folders making up an installed library.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LibraryRoots {
    /// Install root of the synth's data.
    pub root_folder: PathBuf,
    /// Factory presets.
    pub presets_folder: PathBuf,
    /// User presets, also the parent of the generated output.
    pub user_presets_folder: PathBuf,
    /// Favorites files read by [`PresetLibrary::load_from_disk`].
    pub favorites_folder: PathBuf,
}

impl LibraryRoots {
    /// Roots with `Presets`, `UserPresets` and `Favorites` below `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root_folder = root.into();
        Self {
            presets_folder: root_folder.join("Presets"),
            user_presets_folder: root_folder.join("UserPresets"),
            favorites_folder: root_folder.join("Favorites"),
            root_folder,
        }
    }
}

/// Reads preset files from the library folders on disk.
///
/// Subfolders are visited in sorted order. The generated `RANDOM` subtree
/// is skipped. Missing folders contribute nothing.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    presets_folder: PathBuf,
    user_presets_folder: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Source over `roots` accepting files with `extension`.
    pub fn new(roots: &LibraryRoots, extension: impl Into<String>) -> Self {
        Self {
            presets_folder: roots.presets_folder.clone(),
            user_presets_folder: roots.user_presets_folder.clone(),
            extension: extension.into(),
        }
    }

    fn collect(
        &self,
        dir: &Path,
        prefix: &str,
        out: &mut Vec<PresetFile>,
    ) -> Result<(), ConfigError> {
        if !dir.is_dir() {
            return Ok(());
        }
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| ConfigError::read_dir(dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        paths.sort();

        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if path.is_dir() {
                if name == RANDOM_FOLDER {
                    continue;
                }
                self.collect(&path, &format!("{prefix}/{name}"), out)?;
            } else if path.extension().is_some_and(|ext| ext == self.extension.as_str()) {
                let bytes = std::fs::read(&path).map_err(|e| ConfigError::read_file(&path, e))?;
                out.push(PresetFile::new(
                    format!("{prefix}/{name}"),
                    String::from_utf8_lossy(&bytes),
                ));
            }
        }
        Ok(())
    }
}

impl PresetSource for DirectorySource {
    fn preset_files(&self) -> Result<Vec<PresetFile>, ConfigError> {
        let mut files = Vec::new();
        self.collect(&self.presets_folder, LOCAL_PREFIX, &mut files)?;
        self.collect(&self.user_presets_folder, USER_PREFIX, &mut files)?;
        Ok(files)
    }
}

/// Preset files held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: Vec<PresetFile>,
}

impl MemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    pub fn with_file(mut self, virtual_path: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.push(PresetFile::new(virtual_path, text));
        self
    }
}

impl FromIterator<(String, String)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(path, text)| PresetFile::new(path, text))
                .collect(),
        }
    }
}

impl PresetSource for MemorySource {
    fn preset_files(&self) -> Result<Vec<PresetFile>, ConfigError> {
        Ok(self.files.clone())
    }
}

/// Source restrictions applied before statistics are built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    /// Category prefix; `"Bass"` matches `"Bass:Sub"`.
    pub category: Option<String>,
    /// Author substring, case-insensitive.
    pub author: Option<String>,
    /// Substring of the virtual path.
    pub folder: Option<String>,
    /// Name of a favorites file.
    pub favorites: Option<String>,
}

impl LibraryFilter {
    /// Filter described by generation settings.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            category: config.category.clone(),
            author: config.author.clone(),
            folder: config.folder.clone(),
            favorites: config.favorites.clone(),
        }
    }

    /// Whether the filter restricts anything.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.author.is_none()
            && self.folder.is_none()
            && self.favorites.is_none()
    }
}

fn matches_category(preset: &Preset, category: &str) -> bool {
    let category = category.to_lowercase();
    preset
        .categories
        .iter()
        .any(|c| c.to_lowercase().starts_with(&category))
}

fn matches_author(preset: &Preset, author: &str) -> bool {
    preset
        .meta_value("Author")
        .is_some_and(|a| a.to_string().to_lowercase().contains(&author.to_lowercase()))
}

/// A parsed, validated preset library for one synth.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    /// Synth family name.
    pub synth: String,
    /// Install root.
    pub root_folder: PathBuf,
    /// Factory presets folder.
    pub presets_folder: PathBuf,
    /// User presets folder.
    pub user_presets_folder: PathBuf,
    /// Valid presets in source order.
    pub presets: Vec<Preset>,
    /// Favorites files available for filtering.
    pub favorites: Vec<FavoritesFile>,
}

impl PresetLibrary {
    /// Parse and validate every file of `source`.
    ///
    /// Malformed text never fails the load; only I/O errors from the source
    /// do.
    pub fn load(
        synth: impl Into<String>,
        roots: LibraryRoots,
        source: &impl PresetSource,
    ) -> Result<Self, ConfigError> {
        let files = source.preset_files()?;
        let total = files.len();
        let presets = files
            .iter()
            .map(|file| parse_preset(&file.virtual_path, &file.text))
            .collect();
        let library = Self::from_presets(synth, roots, presets);
        tracing::info!(
            synth = %library.synth,
            loaded = library.presets.len(),
            skipped = total - library.presets.len(),
            "loaded preset library"
        );
        Ok(library)
    }

    /// Load from disk using the synth family's preset extension.
    ///
    /// Favorites files in `roots.favorites_folder` are attached; a missing
    /// folder leaves the library without favorites.
    pub fn load_from_disk(
        synth: impl Into<String>,
        roots: LibraryRoots,
    ) -> Result<Self, ConfigError> {
        let synth = synth.into();
        let extension = SynthRegistry::new().preset_extension(&synth);
        let source = DirectorySource::new(&roots, extension);
        let favorites = load_favorites_dir(&roots.favorites_folder);
        Ok(Self::load(synth, roots, &source)?.with_favorites(favorites))
    }

    /// Build a library from already parsed presets, dropping invalid ones.
    pub fn from_presets(
        synth: impl Into<String>,
        roots: LibraryRoots,
        presets: Vec<Preset>,
    ) -> Self {
        let presets = presets
            .into_iter()
            .filter(|preset| match validate_preset(preset) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        path = %preset.file_path,
                        reason = %e,
                        "excluding invalid preset"
                    );
                    false
                }
            })
            .collect();
        Self {
            synth: synth.into(),
            root_folder: roots.root_folder,
            presets_folder: roots.presets_folder,
            user_presets_folder: roots.user_presets_folder,
            presets,
            favorites: Vec::new(),
        }
    }

    /// Attach favorites files.
    pub fn with_favorites(mut self, favorites: Vec<FavoritesFile>) -> Self {
        self.favorites = favorites;
        self
    }

    /// Read favorites files from `dir` and attach them.
    pub fn load_favorites(&mut self, dir: impl AsRef<Path>) {
        self.favorites = load_favorites_dir(dir);
    }

    /// Preset file extension of the library's synth family.
    pub fn preset_extension(&self) -> &'static str {
        SynthRegistry::new().preset_extension(&self.synth)
    }

    /// Favorites file by name.
    pub fn favorites_file(&self, name: &str) -> Option<&FavoritesFile> {
        self.favorites.iter().find(|f| f.name == name)
    }

    /// Presets passing every restriction of `filter`, in library order.
    ///
    /// An unknown favorites file name matches nothing.
    pub fn filter(&self, filter: &LibraryFilter) -> Vec<&Preset> {
        let favorites = filter.favorites.as_deref().map(|name| {
            let file = self.favorites_file(name);
            if file.is_none() {
                tracing::warn!(favorites = name, "unknown favorites file");
            }
            file
        });

        self.presets
            .iter()
            .filter(|p| filter.category.as_deref().is_none_or(|c| matches_category(p, c)))
            .filter(|p| filter.author.as_deref().is_none_or(|a| matches_author(p, a)))
            .filter(|p| filter.folder.as_deref().is_none_or(|f| p.file_path.contains(f)))
            .filter(|p| favorites.is_none_or(|file| file.is_some_and(|f| f.contains(p))))
            .collect()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the library holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
