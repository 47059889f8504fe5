//! Per-parameter statistics across a preset library.

use std::collections::{BTreeMap, HashSet};

use patchgen_core::{ParamType, ParamValue, Preset, is_corrupted};
use patchgen_registry::{ParameterPolicy, StabilityTag};
use serde::Serialize;

/// Minimum, maximum and mean of a numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    /// Smallest observed value.
    pub min_value: f64,
    /// Largest observed value.
    pub max_value: f64,
    /// Arithmetic mean of all observed values.
    pub avg_value: f64,
}

/// Everything observed about one parameter id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamStats {
    /// Widened type over all observations.
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Value pool for random draws. Every observation, or the single value
    /// if all observations are identical.
    pub values: Vec<ParamValue>,
    /// Deduplicated observations in first-seen order.
    pub distinct_values: Vec<ParamValue>,
    /// Range and mean, present for numeric types only.
    #[serde(flatten)]
    pub stats: Option<NumericStats>,
    /// Stability tag from the parameter policy.
    pub keep_stable: Option<StabilityTag>,
}

impl ParamStats {
    fn new(value: ParamValue, keep_stable: Option<StabilityTag>) -> Self {
        Self {
            param_type: value.param_type(),
            values: vec![value],
            distinct_values: Vec::new(),
            stats: None,
            keep_stable,
        }
    }

    fn observe(&mut self, value: ParamValue) {
        self.param_type = self.param_type.widen(value.param_type());
        self.values.push(value);
    }

    fn finish(&mut self) {
        let mut seen = HashSet::new();
        self.distinct_values = self
            .values
            .iter()
            .filter(|v| seen.insert(ValueKey::of(v)))
            .cloned()
            .collect();
        if self.distinct_values.len() == 1 {
            self.values.clone_from(&self.distinct_values);
        }

        if self.param_type.is_numeric() {
            let numbers: Vec<f64> = self.values.iter().filter_map(ParamValue::as_f64).collect();
            self.stats = Some(NumericStats {
                min_value: numbers.iter().copied().fold(f64::INFINITY, f64::min),
                max_value: numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                avg_value: average(&numbers),
            });
        }
    }

    /// Number of distinct observed values.
    pub fn distinct_count(&self) -> usize {
        self.distinct_values.len()
    }
}

/// Hashable identity of a value, used for deduplication.
#[derive(PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Integer(i64),
    Float(u64),
    String(&'a str),
}

impl<'a> ValueKey<'a> {
    fn of(value: &'a ParamValue) -> Self {
        match value {
            ParamValue::Integer(v) => ValueKey::Integer(*v),
            ParamValue::Float(v) => ValueKey::Float(v.to_bits()),
            ParamValue::String(s) => ValueKey::String(s),
        }
    }
}

/// Statistics for every parameter id seen in a library.
///
/// Built fresh for each generation request and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamsModel {
    params: BTreeMap<String, ParamStats>,
}

impl ParamsModel {
    /// Aggregate statistics over `presets`.
    ///
    /// Types widen along `Integer < Float < String`. Ids carrying a
    /// corruption marker are skipped. Stability tags are resolved from
    /// `policy` when an id is first seen.
    pub fn build<'a>(
        presets: impl IntoIterator<Item = &'a Preset>,
        policy: &ParameterPolicy,
    ) -> Self {
        let mut params: BTreeMap<String, ParamStats> = BTreeMap::new();
        let mut preset_count = 0usize;

        for preset in presets {
            preset_count += 1;
            for param in &preset.params {
                if is_corrupted(&param.id) {
                    continue;
                }
                match params.get_mut(&param.id) {
                    Some(stats) => stats.observe(param.value.clone()),
                    None => {
                        let tag = policy.resolve(&param.id);
                        params.insert(param.id.clone(), ParamStats::new(param.value.clone(), tag));
                    }
                }
            }
        }

        for stats in params.values_mut() {
            stats.finish();
        }
        tracing::debug!(presets = preset_count, params = params.len(), "built params model");
        Self { params }
    }

    /// Statistics for one id.
    pub fn get(&self, id: &str) -> Option<&ParamStats> {
        self.params.get(id)
    }

    /// Whether the model knows an id.
    pub fn contains(&self, id: &str) -> bool {
        self.params.contains_key(id)
    }

    /// Iterate over `(id, stats)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamStats)> {
        self.params.iter().map(|(id, stats)| (id.as_str(), stats))
    }

    /// Number of parameter ids.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the model is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Group ids by section, the part of the id before the first `/`.
    ///
    /// Ids with an empty section are left out.
    pub fn group_by_section(&self) -> BTreeMap<&str, BTreeMap<&str, &ParamStats>> {
        let mut groups: BTreeMap<&str, BTreeMap<&str, &ParamStats>> = BTreeMap::new();
        for (id, stats) in self.iter() {
            let section = id.split('/').next().unwrap_or_default();
            if section.is_empty() {
                continue;
            }
            groups.entry(section).or_default().insert(id, stats);
        }
        groups
    }

    /// Pretty-printed JSON of the whole model.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(path: &str, params: &[(&str, &str, ParamValue)]) -> Preset {
        params
            .iter()
            .fold(Preset::new(path).with_meta("Author", "T"), |p, (section, key, value)| {
                p.with_param(section, key, value.clone())
            })
    }

    #[test]
    fn average_edge_cases() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[4.5]), 4.5);
        assert_eq!(average(&[-3.0, -1.0, 1.0, 3.0]), 0.0);
        assert_eq!(average(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn type_widens_to_string() {
        let presets = [
            preset("/Local/a.h2p", &[("main", "X", ParamValue::Integer(1))]),
            preset("/Local/b.h2p", &[("main", "X", ParamValue::Float(1.5))]),
            preset("/Local/c.h2p", &[("main", "X", ParamValue::from("Saw"))]),
        ];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        let stats = model.get("main/X").unwrap();
        assert_eq!(stats.param_type, ParamType::String);
        assert!(stats.stats.is_none());
        assert_eq!(stats.values.len(), 3);
    }

    #[test]
    fn float_does_not_narrow_back() {
        let presets = [
            preset("/Local/a.h2p", &[("main", "X", ParamValue::Float(0.5))]),
            preset("/Local/b.h2p", &[("main", "X", ParamValue::Integer(2))]),
        ];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        let stats = model.get("main/X").unwrap();
        assert_eq!(stats.param_type, ParamType::Float);
        let numeric = stats.stats.unwrap();
        assert_eq!(numeric.min_value, 0.5);
        assert_eq!(numeric.max_value, 2.0);
        assert_eq!(numeric.avg_value, 1.25);
    }

    #[test]
    fn identical_values_are_compacted() {
        let presets: Vec<_> = (0..5)
            .map(|i| preset(&format!("/Local/{i}.h2p"), &[("main", "V", ParamValue::Integer(7))]))
            .collect();
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        let stats = model.get("main/V").unwrap();
        assert_eq!(stats.values, vec![ParamValue::Integer(7)]);
        assert_eq!(stats.distinct_values, vec![ParamValue::Integer(7)]);
        assert_eq!(stats.stats.unwrap().avg_value, 7.0);
    }

    #[test]
    fn pool_keeps_duplicates_when_values_differ() {
        let presets = [
            preset("/Local/a.h2p", &[("main", "V", ParamValue::Integer(1))]),
            preset("/Local/b.h2p", &[("main", "V", ParamValue::Integer(1))]),
            preset("/Local/c.h2p", &[("main", "V", ParamValue::Integer(3))]),
        ];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        let stats = model.get("main/V").unwrap();
        assert_eq!(stats.values.len(), 3);
        assert_eq!(
            stats.distinct_values,
            vec![ParamValue::Integer(1), ParamValue::Integer(3)]
        );
        assert_eq!(stats.distinct_count(), 2);
    }

    #[test]
    fn corrupted_ids_are_skipped() {
        let presets = [preset(
            "/Local/a.h2p",
            &[
                ("undefined", "V", ParamValue::Integer(1)),
                ("main", "V", ParamValue::Integer(1)),
            ],
        )];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        assert_eq!(model.len(), 1);
        assert!(model.contains("main/V"));
    }

    #[test]
    fn keep_stable_from_policy() {
        let presets = [preset(
            "/Local/a.h2p",
            &[
                ("OSC1", "Tune", ParamValue::Integer(0)),
                ("main", "#cm", ParamValue::from("main")),
                ("VCF1", "Cut", ParamValue::Float(50.5)),
            ],
        )];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        assert_eq!(
            model.get("OSC1/Tune").unwrap().keep_stable,
            Some(StabilityTag::StableModeOnly)
        );
        assert_eq!(model.get("main/#cm").unwrap().keep_stable, Some(StabilityTag::Always));
        assert_eq!(model.get("VCF1/Cut").unwrap().keep_stable, None);
    }

    #[test]
    fn grouping_by_section() {
        let presets = [preset(
            "/Local/a.h2p",
            &[
                ("OSC1", "Tune", ParamValue::Integer(0)),
                ("OSC1", "Wave", ParamValue::Integer(2)),
                ("VCF1", "Cut", ParamValue::Float(50.5)),
                ("", "Odd", ParamValue::Integer(1)),
            ],
        )];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        let groups = model.group_by_section();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["OSC1"].len(), 2);
        assert!(groups["VCF1"].contains_key("VCF1/Cut"));
    }

    #[test]
    fn json_view() {
        let presets = [preset("/Local/a.h2p", &[("VCF1", "Cut", ParamValue::Float(50.5))])];
        let model = ParamsModel::build(&presets, &ParameterPolicy::global());
        let json = model.to_json().unwrap();
        assert!(json.contains("\"VCF1/Cut\""));
        assert!(json.contains("\"type\": \"float\""));
        assert!(json.contains("\"avgValue\": 50.5"));
    }
}
