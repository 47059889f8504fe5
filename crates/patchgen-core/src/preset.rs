//! Preset records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{ParamType, ParamValue};

/// Virtual path prefix of factory presets.
pub const LOCAL_PREFIX: &str = "/Local";

/// Virtual path prefix of user presets.
pub const USER_PREFIX: &str = "/User";

/// Meta key holding the preset categories.
pub const CATEGORIES_KEY: &str = "Categories";

/// Library a preset was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetOrigin {
    /// Factory library (`/Local/...`).
    Local,
    /// User library (`/User/...`).
    User,
}

/// Value of a metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Plain value.
    Single(String),
    /// Comma separated list, stored split.
    List(Vec<String>),
}

impl MetaValue {
    /// All values as a flat list of string slices.
    pub fn values(&self) -> Vec<&str> {
        match self {
            MetaValue::Single(value) => vec![value.as_str()],
            MetaValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Single(value) => f.write_str(value),
            MetaValue::List(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Single(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Single(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(values: Vec<String>) -> Self {
        MetaValue::List(values)
    }
}

/// A `Key: 'value'` entry of the metadata header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    /// Key without the trailing colon.
    pub key: String,
    /// Value without the surrounding quotes.
    pub value: MetaValue,
}

impl MetaEntry {
    /// Create a metadata entry.
    pub fn new(key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single `key=value` line of the parameter section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetParam {
    /// Unique id within the preset: `section/key`, suffixed `/n` for repeats.
    pub id: String,
    /// Key as written in the file.
    pub key: String,
    /// Section (`#cm` context) the line belongs to.
    pub section: String,
    /// Parsed value.
    pub value: ParamValue,
    /// Position in the original file order.
    pub index: usize,
}

impl PresetParam {
    /// Create a parameter with an id derived from section and key.
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
        index: usize,
    ) -> Self {
        let section = section.into();
        let key = key.into();
        Self {
            id: format!("{section}/{key}"),
            key,
            section,
            value: value.into(),
            index,
        }
    }

    /// Type of the current value.
    pub fn param_type(&self) -> ParamType {
        self.value.param_type()
    }
}

/// One synthesizer preset: metadata, ordered parameters and an optional
/// opaque binary section.
///
/// A preset is a self-contained value. Generated presets are deep clones of a
/// library preset, mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Virtual path, `/Local/...` or `/User/...`.
    pub file_path: String,
    /// Display name, derived from the file name.
    pub preset_name: String,
    /// Categories from the `Categories` meta entry.
    pub categories: Vec<String>,
    /// Metadata header entries in file order.
    pub meta: Vec<MetaEntry>,
    /// Parameters in file order.
    pub params: Vec<PresetParam>,
    /// Encoded binary section, never interpreted by the generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
}

impl Preset {
    /// Create an empty preset at a virtual path.
    pub fn new(file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        Self {
            preset_name: preset_name_from_path(&file_path),
            file_path,
            categories: Vec::new(),
            meta: Vec::new(),
            params: Vec::new(),
            binary: None,
        }
    }

    /// Add a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.set_meta(key, value);
        self
    }

    /// Append a parameter in `section` with the next index.
    pub fn with_param(
        mut self,
        section: &str,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Self {
        let index = self.params.len();
        self.params.push(PresetParam::new(section, key, value, index));
        self
    }

    /// Set the binary section.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    /// Library this preset belongs to, judged by its virtual path.
    pub fn origin(&self) -> Option<PresetOrigin> {
        if self.file_path.starts_with(LOCAL_PREFIX) {
            Some(PresetOrigin::Local)
        } else if self.file_path.starts_with(USER_PREFIX) {
            Some(PresetOrigin::User)
        } else {
            None
        }
    }

    /// Look up a parameter by id.
    pub fn param(&self, id: &str) -> Option<&PresetParam> {
        self.params.iter().find(|p| p.id == id)
    }

    /// Look up a parameter by id, mutably.
    pub fn param_mut(&mut self, id: &str) -> Option<&mut PresetParam> {
        self.params.iter_mut().find(|p| p.id == id)
    }

    /// Whether a parameter with this id exists.
    pub fn has_param(&self, id: &str) -> bool {
        self.param(id).is_some()
    }

    /// Iterate over parameter ids in file order.
    pub fn param_ids(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.id.as_str())
    }

    /// Look up a metadata value by key.
    pub fn meta_value(&self, key: &str) -> Option<&MetaValue> {
        self.meta.iter().find(|m| m.key == key).map(|m| &m.value)
    }

    /// Replace a metadata value, appending the entry if the key is new.
    ///
    /// Setting `Categories` also refreshes [`Preset::categories`].
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        if key == CATEGORIES_KEY {
            self.categories = value.values().into_iter().map(str::to_string).collect();
        }
        match self.meta.iter_mut().find(|m| m.key == key) {
            Some(entry) => entry.value = value,
            None => self.meta.push(MetaEntry { key, value }),
        }
    }

    /// Remove a metadata entry. Returns the removed value.
    pub fn remove_meta(&mut self, key: &str) -> Option<MetaValue> {
        let position = self.meta.iter().position(|m| m.key == key)?;
        if key == CATEGORIES_KEY {
            self.categories.clear();
        }
        Some(self.meta.remove(position).value)
    }

    /// Move the preset to a new virtual path, renaming it accordingly.
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
        self.preset_name = preset_name_from_path(&self.file_path);
    }
}

/// Derive a preset name from a virtual or filesystem path.
///
/// Takes the last path component and drops its extension.
///
/// ```rust
/// use patchgen_core::preset_name_from_path;
///
/// assert_eq!(preset_name_from_path("/Local/Bass/Deep Sub.h2p"), "Deep Sub");
/// assert_eq!(preset_name_from_path("Plain"), "Plain");
/// ```
pub fn preset_name_from_path(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name[..dot].to_string(),
        _ => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_new_derives_name() {
        let preset = Preset::new("/User/Leads/Glass Lead.h2p");
        assert_eq!(preset.preset_name, "Glass Lead");
        assert_eq!(preset.origin(), Some(PresetOrigin::User));
        assert!(preset.params.is_empty());
        assert!(preset.binary.is_none());
    }

    #[test]
    fn test_origin() {
        assert_eq!(Preset::new("/Local/a.h2p").origin(), Some(PresetOrigin::Local));
        assert_eq!(Preset::new("elsewhere/a.h2p").origin(), None);
    }

    #[test]
    fn test_builder_assigns_ids_and_indices() {
        let preset = Preset::new("/Local/p.h2p")
            .with_param("HEAD", "#AM", "Zebra2")
            .with_param("main", "CcOp", 92)
            .with_param("main", "Mix", 0.5);

        let ids: Vec<_> = preset.param_ids().collect();
        assert_eq!(ids, vec!["HEAD/#AM", "main/CcOp", "main/Mix"]);
        assert_eq!(preset.params[2].index, 2);
        assert_eq!(preset.param("main/CcOp").unwrap().param_type(), ParamType::Integer);
    }

    #[test]
    fn test_set_meta_replaces_existing() {
        let mut preset = Preset::new("/Local/p.h2p").with_meta("Author", "Someone");
        preset.set_meta("Author", "Another");
        assert_eq!(preset.meta.len(), 1);
        assert_eq!(preset.meta_value("Author"), Some(&MetaValue::from("Another")));
    }

    #[test]
    fn test_categories_follow_meta() {
        let mut preset = Preset::new("/Local/p.h2p");
        preset.set_meta(
            CATEGORIES_KEY,
            vec!["Bass:Sub".to_string(), "Lead".to_string()],
        );
        assert_eq!(preset.categories, vec!["Bass:Sub", "Lead"]);

        preset.remove_meta(CATEGORIES_KEY);
        assert!(preset.categories.is_empty());
        assert!(preset.meta.is_empty());
    }

    #[test]
    fn test_meta_value_display() {
        let list = MetaValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(list.to_string(), "a, b");
        assert_eq!(list.values(), vec!["a", "b"]);
    }

    #[test]
    fn test_preset_name_from_path() {
        assert_eq!(preset_name_from_path("/User/RANDOM/Fully Random/X.h2p"), "X");
        assert_eq!(preset_name_from_path("C:\\presets\\Y.h2p"), "Y");
        assert_eq!(preset_name_from_path(".hidden"), ".hidden");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let preset = Preset::new("/Local/p.h2p").with_meta("Author", "A");
        let json = serde_json::to_string(&preset).unwrap();
        assert!(json.contains("\"filePath\""));
        assert!(json.contains("\"presetName\""));
        assert!(!json.contains("binary"));
    }
}
