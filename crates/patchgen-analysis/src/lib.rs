//! Library-wide analysis for patchgen.
//!
//! - [`model`] - per-parameter statistics, the [`ParamsModel`]
//! - [`names`] - word pool for naming generated presets
//!
//! # Example
//!
//! ```rust
//! use patchgen_analysis::ParamsModel;
//! use patchgen_core::{ParamType, Preset};
//! use patchgen_registry::ParameterPolicy;
//!
//! let presets = [
//!     Preset::new("/Local/a.h2p").with_param("VCF1", "Cut", 10),
//!     Preset::new("/Local/b.h2p").with_param("VCF1", "Cut", 20.5),
//! ];
//! let model = ParamsModel::build(&presets, &ParameterPolicy::global());
//! let cutoff = model.get("VCF1/Cut").unwrap();
//!
//! assert_eq!(cutoff.param_type, ParamType::Float);
//! assert_eq!(cutoff.stats.unwrap().max_value, 20.5);
//! ```

pub mod model;
pub mod names;

pub use model::{NumericStats, ParamStats, ParamsModel, average};
pub use names::{STOPLIST, dictionary_of_names, is_name_word};
