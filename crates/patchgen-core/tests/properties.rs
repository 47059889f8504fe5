//! Property-based tests for the preset text and binary codecs.

use patchgen_core::{parse_binary_section, parse_preset, serialize_preset};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|v| v.to_string()),
        (-1000.0f64..1000.0).prop_map(|v| format!("{v:.3}")),
        (-1.0e12f64..1.0e12).prop_map(|v| v.to_string()),
        "[A-Za-z][A-Za-z0-9 ]{0,10}",
    ]
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => "[A-Za-z][A-Za-z0-9]{0,5}".prop_map(|section| format!("#cm={section}")),
        6 => ("[A-Za-z#][A-Za-z0-9]{0,6}", value_strategy())
            .prop_map(|(key, value)| format!("{key}={value}")),
    ]
}

fn meta_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            "[A-Z][a-z]{2,8}",
            prop_oneof![
                "[A-Za-z][A-Za-z0-9]{0,10}",
                prop::collection::vec("[A-Za-z][A-Za-z:]{0,6}", 2..4).prop_map(|v| v.join(", ")),
            ],
        ),
        0..5,
    )
}

fn preset_text(meta: &[(String, String)], lines: &[String], binary: Option<&str>) -> String {
    let mut text = String::from("/*@Meta\n\n");
    for (key, value) in meta {
        text.push_str(&format!("{key}:\n'{value}'\n\n"));
    }
    text.push_str("*/\n\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    if let Some(binary) = binary {
        text.push_str("\n// Section for ugly compressed binary Data\n// DON'T TOUCH THIS\n\n");
        text.push_str(binary);
    }
    text
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Parse, serialize and parse again keeps params and metadata intact.
    #[test]
    fn text_roundtrip(
        meta in meta_strategy(),
        lines in prop::collection::vec(line_strategy(), 0..40),
        binary in prop::option::of("[a-p]{2,8}:[!0-9=A-Za-z]{4,32}"),
    ) {
        let text = preset_text(&meta, &lines, binary.as_deref());
        let first = parse_preset("/User/Prop.h2p", &text);
        let second = parse_preset("/User/Prop.h2p", &serialize_preset(&first));

        prop_assert_eq!(&second.params, &first.params);
        prop_assert_eq!(&second.meta, &first.meta);
        prop_assert_eq!(&second.binary, &first.binary);
        prop_assert_eq!(&second.categories, &first.categories);
    }

    /// Parameter ids are unique within a preset.
    #[test]
    fn param_ids_unique(lines in prop::collection::vec(line_strategy(), 0..60)) {
        let preset = parse_preset("/User/Prop.h2p", &preset_text(&[], &lines, None));
        let mut ids: Vec<&str> = preset.param_ids().collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }

    /// Header and payload lengths always add up to the combined length.
    #[test]
    fn binary_lengths_add_up(
        tokens in prop::collection::vec("[a-p]{1,12}", 0..8),
        separator in prop::sample::select(vec![":", "\n"]),
        size in prop::option::of(0u32..100_000),
        payload in "[!0-9=A-Za-z]{1,96}",
    ) {
        let mut header = tokens.join(separator);
        if let Some(size) = size {
            header = format!("$$$${size}\n{header}");
        }
        let section = format!("{header}:{payload}");
        let parsed = parse_binary_section(&section).unwrap();

        prop_assert_eq!(
            parsed.header_bytes.len() + parsed.payload_bytes.len(),
            parsed.combined_bytes.len()
        );
        prop_assert_eq!(parsed.payload_bytes.len(), payload.len() * 6 / 8);
        prop_assert_eq!(parsed.declared_uncompressed_size, size.map(u64::from));
        prop_assert!(parsed.undecoded_tokens.is_empty());
    }
}
