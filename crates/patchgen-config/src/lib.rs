//! Settings, library access and output for patchgen.
//!
//! # Features
//!
//! - **Generation settings**: [`GeneratorConfig`] loaded from and saved to TOML
//! - **Library loading**: [`PresetLibrary`] over any [`PresetSource`], with
//!   invalid presets excluded
//! - **Filters**: category, author, folder and favorites restrictions
//! - **Favorites**: JSON favorites files grouping presets by category
//! - **Output**: `RANDOM/<mode>` folders, safe file names, preset writing
//!
//! # Example
//!
//! ```rust
//! use patchgen_config::{GeneratorConfig, LibraryRoots, MemorySource, PresetLibrary};
//!
//! let config = GeneratorConfig::from_toml("synth = \"Zebra2\"\namount = 2").unwrap();
//! assert!(config.validate().is_ok());
//!
//! let source = MemorySource::new()
//!     .with_file("/Local/Pads/Warm.h2p", "/*@Meta\nAuthor:\n'Me'\n*/\n#cm=main\nVol=1\n");
//! let library = PresetLibrary::load("Zebra2", LibraryRoots::from_root("/synths/Zebra2"), &source).unwrap();
//! assert_eq!(library.len(), 1);
//! ```

mod error;
mod favorites;
mod generator;
mod library;

/// Output folders and preset writing.
pub mod output;

pub use error::ConfigError;
pub use favorites::{FAVORITES_EXTENSION, FavoriteEntry, FavoritesFile, load_favorites_dir};
pub use generator::{DEFAULT_RANDOMNESS, GenerationMode, GeneratorConfig};
pub use library::{
    DirectorySource, LibraryFilter, LibraryRoots, MemorySource, PresetFile, PresetLibrary,
    PresetSource,
};
pub use output::{
    FULLY_RANDOM_FOLDER, MERGED_PRESET_FOLDER, RANDOM_FOLDER, RANDOMIZED_PRESET_FOLDER,
    output_folder, sanitize_file_name, unique_file_stems, write_presets,
};
