//! Model building over parsed preset text.

use patchgen_analysis::{ParamsModel, dictionary_of_names};
use patchgen_core::{ParamType, ParamValue, parse_preset};
use patchgen_registry::{SynthRegistry, StabilityTag};
use proptest::prelude::*;

fn preset_text(author: &str, cutoff: &str, wave: &str) -> String {
    format!(
        "/*@Meta\n\nAuthor:\n'{author}'\n\n*/\n\n#AM=Zebra2\n#cm=VCF1\nCut={cutoff}\nRes=20.00\n#cm=OSC1\nWave={wave}\nTune=0\nWNum=1\n"
    )
}

#[test]
fn model_over_parsed_library() {
    let library = [
        parse_preset("/Local/Pads/Warm Cloud.h2p", &preset_text("A", "50", "1")),
        parse_preset("/Local/Pads/Frozen Lake.h2p", &preset_text("B", "72.50", "2")),
        parse_preset("/User/Mine/Night_Drive.h2p", &preset_text("C", "64", "Saw")),
    ];
    let policy = SynthRegistry::new().policy_for("Zebra2");
    let model = ParamsModel::build(&library, &policy);

    let cut = model.get("VCF1/Cut").unwrap();
    assert_eq!(cut.param_type, ParamType::Float);
    assert_eq!(cut.values.len(), 3);
    let stats = cut.stats.unwrap();
    assert_eq!(stats.min_value, 50.0);
    assert_eq!(stats.max_value, 72.5);

    let res = model.get("VCF1/Res").unwrap();
    assert_eq!(res.values, vec![ParamValue::Integer(20)]);

    let wave = model.get("OSC1/Wave").unwrap();
    assert_eq!(wave.param_type, ParamType::String);
    assert!(wave.stats.is_none());

    assert_eq!(model.get("HEAD/#AM").unwrap().keep_stable, Some(StabilityTag::Always));
    assert_eq!(
        model.get("OSC1/WNum").unwrap().keep_stable,
        Some(StabilityTag::StableModeOnly)
    );

    let sections = model.group_by_section();
    assert_eq!(sections.keys().copied().collect::<Vec<_>>(), ["HEAD", "OSC1", "VCF1"]);

    assert_eq!(
        dictionary_of_names(&library),
        vec!["Warm", "Cloud", "Frozen", "Lake", "Night", "Drive"]
    );
}

proptest! {
    #[test]
    fn pool_is_compacted_only_when_uniform(values in prop::collection::vec(-5i64..5, 1..20)) {
        let library: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                patchgen_core::Preset::new(format!("/Local/{i}.h2p")).with_param("main", "V", *v)
            })
            .collect();
        let model = ParamsModel::build(&library, &Default::default());
        let stats = model.get("main/V").unwrap();

        let uniform = values.iter().all(|v| *v == values[0]);
        if uniform {
            prop_assert_eq!(stats.values.len(), 1);
        } else {
            prop_assert_eq!(stats.values.len(), values.len());
        }
        let numeric = stats.stats.unwrap();
        prop_assert!(numeric.min_value <= numeric.avg_value + 1e-9);
        prop_assert!(numeric.avg_value <= numeric.max_value + 1e-9);
    }
}
