//! Preset generation for patchgen.
//!
//! Three generators share one statistics model built from the (filtered)
//! library:
//!
//! - **Fully random**: every free parameter drawn from its library-wide pool,
//!   or, in stable mode, whole sections copied from donor presets
//! - **Single preset**: a base preset blended toward random pool values by a
//!   randomness percentage
//! - **Merge**: a weighted blend of several presets, checked for parameter
//!   overlap first
//!
//! Binary sections are never decoded into parameters; binary mode swaps
//! whole sections between sources.
//!
//! # Example
//!
//! ```rust
//! use patchgen_config::{GeneratorConfig, LibraryRoots, MemorySource, PresetLibrary};
//! use patchgen_random::generate_presets;
//!
//! let text = |cut: u32| format!("/*@Meta\nAuthor:\n'Me'\n*/\n#cm=VCF1\nCut={cut}\n");
//! let source = MemorySource::new()
//!     .with_file("/Local/a.h2p", text(10))
//!     .with_file("/Local/b.h2p", text(90));
//! let library = PresetLibrary::load("Zebra2", LibraryRoots::from_root("/synths/Zebra2"), &source).unwrap();
//!
//! let config = GeneratorConfig::new("Zebra2").with_merge(["*"]).with_amount(2);
//! let batch = generate_presets(&config, &library, &mut rand::thread_rng()).unwrap();
//! assert_eq!(batch.presets.len(), 2);
//! ```

pub mod binary;
pub mod compatibility;
pub mod engine;
pub mod metadata;
pub mod naming;
pub mod selectors;
pub mod values;

mod error;
mod generate;

pub use compatibility::{
    Compatibility, MIN_OVERLAP, WARN_OVERLAP, check_compatibility, param_overlap,
};
pub use engine::Randomizer;
pub use error::GenerateError;
pub use generate::{GeneratedBatch, GenerationResult, generate, generate_presets};
pub use metadata::{GENERATOR_AUTHOR, Provenance, apply_generated_meta};
pub use naming::{dictionary_name, generic_name};
pub use selectors::{Selector, resolve_many, resolve_one};
pub use values::merge_weights;
