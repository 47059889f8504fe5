//! Preset data model and file codecs for patchgen.
//!
//! This crate reads and writes synthesizer preset files in their hybrid
//! text/binary format:
//!
//! - [`value`] - typed parameter values and the `Integer < Float < String` lattice
//! - [`preset`] - preset records: metadata, ordered parameters, binary section
//! - [`text`] - parser and serializer for the metadata header and parameter body
//! - [`validation`] - rejection rules for empty or corrupted presets
//! - [`binary`] - decoder for the compressed binary section
//! - [`inspect`] - diagnostic JSON view of a decoded binary section
//!
//! # Example
//!
//! ```rust
//! use patchgen_core::{parse_preset, serialize_preset, ParamValue};
//!
//! let text = "/*@Meta\nAuthor:\n'Me'\n*/\n#cm=main\nVol=0.5\n";
//! let preset = parse_preset("/User/Test.h2p", text);
//!
//! assert_eq!(preset.preset_name, "Test");
//! assert_eq!(preset.param("main/Vol").unwrap().value, ParamValue::Float(0.5));
//!
//! let again = parse_preset("/User/Test.h2p", &serialize_preset(&preset));
//! assert_eq!(again.params, preset.params);
//! ```

pub mod binary;
pub mod inspect;
pub mod preset;
pub mod text;
pub mod validation;
pub mod value;

pub use binary::{BinaryError, HeaderField, ParsedBinarySection, parse_binary_section};
pub use inspect::{
    BinaryReport, HeaderFieldReport, InspectOptions, PayloadReport, PayloadWords, WordFormat,
    inspect_binary_section,
};
pub use preset::{
    CATEGORIES_KEY, LOCAL_PREFIX, MetaEntry, MetaValue, Preset, PresetOrigin, PresetParam,
    USER_PREFIX, preset_name_from_path,
};
pub use text::{
    is_repeating_marker_key, parse_meta, parse_params, parse_preset, preset_binary_section,
    serialize_preset,
};
pub use validation::{ValidationError, is_corrupted, is_valid_preset, validate_preset};
pub use value::{ParamType, ParamValue, widen};
