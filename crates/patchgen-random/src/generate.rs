//! End-to-end generation requests.

use std::path::PathBuf;

use patchgen_analysis::{ParamsModel, dictionary_of_names};
use patchgen_config::{
    DEFAULT_RANDOMNESS, GenerationMode, GeneratorConfig, LibraryFilter, PresetLibrary,
    RANDOM_FOLDER, output_folder, sanitize_file_name, write_presets,
};
use patchgen_core::{Preset, USER_PREFIX};
use patchgen_registry::SynthRegistry;
use rand::Rng;

use crate::binary::{binary_pool, swap_binary};
use crate::compatibility::check_compatibility;
use crate::engine::Randomizer;
use crate::error::GenerateError;
use crate::metadata::{Provenance, apply_generated_meta};
use crate::naming::{dictionary_name, generic_name};
use crate::selectors::{resolve_many, resolve_one};

/// Generated presets, not yet written.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    /// Generated presets with names, metadata and virtual paths set.
    pub presets: Vec<Preset>,
    /// Folder the presets belong in.
    pub output_folder: PathBuf,
}

/// Outcome of [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Absolute paths of the files written.
    pub written_files: Vec<PathBuf>,
    /// Folder the files were written to.
    pub output_folder: PathBuf,
    /// Number of presets generated.
    pub preset_count: usize,
}

/// A generated preset with the names of the presets it came from.
struct Draft {
    preset: Preset,
    sources: Vec<String>,
}

impl Draft {
    fn new(preset: Preset, sources: Vec<String>) -> Self {
        Self { preset, sources }
    }
}

fn names_of(presets: &[&Preset]) -> Vec<String> {
    presets.iter().map(|p| p.preset_name.clone()).collect()
}

/// Generate presets in memory.
///
/// Validates `config`, filters the library, builds the statistics model
/// with the synth family's policy, and runs the selected mode `amount`
/// times. Any error aborts the whole batch.
pub fn generate_presets<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    library: &PresetLibrary,
    rng: &mut R,
) -> Result<GeneratedBatch, GenerateError> {
    config.validate()?;

    let working = library.filter(&LibraryFilter::from_config(config));
    if working.is_empty() {
        return Err(GenerateError::EmptyLibrary);
    }
    let policy = SynthRegistry::new().policy_for(&library.synth);
    let model = ParamsModel::build(working.iter().copied(), &policy);
    let randomizer = Randomizer::new(&model, config.stable);
    let mode = config.mode();

    let mut drafts = Vec::with_capacity(config.amount);
    let binary_sources: Vec<&Preset> = match mode {
        GenerationMode::FullRandom => {
            for _ in 0..config.amount {
                let preset = randomizer
                    .full_random(&working, rng)
                    .ok_or(GenerateError::EmptyLibrary)?;
                let sources = vec![preset.preset_name.clone()];
                drafts.push(Draft::new(preset, sources));
            }
            working.clone()
        }
        GenerationMode::Single { selector } => {
            let base = resolve_one(selector, &working, rng)?;
            let r = config
                .randomness_ratio()
                .unwrap_or(DEFAULT_RANDOMNESS / 100.0);
            for _ in 0..config.amount {
                let preset = randomizer.randomize(base, r, rng);
                drafts.push(Draft::new(preset, vec![base.preset_name.clone()]));
            }
            working.clone()
        }
        GenerationMode::Merge { selectors } => {
            let sources = resolve_many(selectors, &working, rng)?;
            check_compatibility(&sources)?;
            for _ in 0..config.amount {
                let mut preset = randomizer
                    .merge(&sources, rng)
                    .ok_or(GenerateError::NotEnoughPresets { found: 0 })?;
                if let Some(r) = config.randomness_ratio() {
                    preset = randomizer.randomize(&preset, r, rng);
                }
                drafts.push(Draft::new(preset, names_of(&sources)));
            }
            sources
        }
    };

    let binaries = binary_pool(&binary_sources);
    let words = if config.dictionary && config.custom_name.is_none() {
        dictionary_of_names(working.iter().copied())
    } else {
        Vec::new()
    };
    let extension = library.preset_extension();

    let mut presets = Vec::with_capacity(drafts.len());
    for (i, draft) in drafts.into_iter().enumerate() {
        let Draft {
            mut preset,
            sources,
        } = draft;
        if config.binary {
            swap_binary(&mut preset, &binaries, rng)?;
        }

        let name = match &config.custom_name {
            Some(name) if config.amount == 1 => name.clone(),
            Some(name) => format!("{name} {}", i + 1),
            None if config.dictionary => dictionary_name(&words, rng),
            None => generic_name(rng),
        };
        let source_names: Vec<&str> = sources.iter().map(String::as_str).collect();
        apply_generated_meta(
            &mut preset,
            &Provenance {
                mode: mode.label(),
                sources: &source_names,
                category: config.category.as_deref(),
            },
        );
        preset.set_file_path(format!(
            "{USER_PREFIX}/{RANDOM_FOLDER}/{}/{}.{extension}",
            mode.subfolder(),
            sanitize_file_name(&name)
        ));
        presets.push(preset);
    }

    Ok(GeneratedBatch {
        presets,
        output_folder: output_folder(&library.user_presets_folder, mode.subfolder()),
    })
}

/// Generate presets and write them to the library's `RANDOM` folder.
pub fn generate(
    config: &GeneratorConfig,
    library: &PresetLibrary,
) -> Result<GenerationResult, GenerateError> {
    let mut rng = rand::thread_rng();
    let batch = generate_presets(config, library, &mut rng)?;
    let written_files = write_presets(
        &batch.output_folder,
        &batch.presets,
        library.preset_extension(),
    )?;
    tracing::info!(
        synth = %library.synth,
        mode = config.mode().label(),
        count = written_files.len(),
        folder = %batch.output_folder.display(),
        "generated presets"
    );
    Ok(GenerationResult {
        preset_count: written_files.len(),
        written_files,
        output_folder: batch.output_folder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchgen_config::{LibraryRoots, MemorySource};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn text(cutoff: i32, binary: Option<&str>) -> String {
        let mut text = format!(
            "/*@Meta\nAuthor:\n'Tester'\nCategories:\n'Pads'\n*/\n#AM=Zebra2\n#cm=VCF1\nCut={cutoff}\nRes=0.50\n"
        );
        if let Some(binary) = binary {
            text.push_str("\n\n// Section for ugly compressed binary Data\n// DON'T TOUCH THIS\n\n");
            text.push_str(binary);
            text.push('\n');
        }
        text
    }

    fn library() -> PresetLibrary {
        let source = MemorySource::new()
            .with_file("/Local/Pads/Warm Cloud.h2p", text(10, Some("ab:AAAA")))
            .with_file("/Local/Pads/Cold Cloud.h2p", text(20, None))
            .with_file("/User/Mine/Night.h2p", text(30, Some("cd:BBBB")));
        PresetLibrary::load("Zebra2", LibraryRoots::from_root("/synths/Zebra2"), &source).unwrap()
    }

    #[test]
    fn full_random_batch() {
        let library = library();
        let config = GeneratorConfig::new("Zebra2").with_amount(3);
        let mut rng = StdRng::seed_from_u64(1);

        let batch = generate_presets(&config, &library, &mut rng).unwrap();
        assert_eq!(batch.presets.len(), 3);
        assert_eq!(
            batch.output_folder,
            PathBuf::from("/synths/Zebra2/UserPresets/RANDOM/Fully Random")
        );
        for preset in &batch.presets {
            assert!(preset.file_path.starts_with("/User/RANDOM/Fully Random/"));
            assert!(preset.file_path.ends_with(".h2p"));
            assert_eq!(preset.meta_value("Author").unwrap().to_string(), "Random Generator");
            assert_eq!(preset.param("HEAD/#AM").unwrap().value.to_string(), "Zebra2");
        }
    }

    #[test]
    fn single_mode_with_custom_name() {
        let library = library();
        let mut config = GeneratorConfig::new("Zebra2")
            .with_preset("Night")
            .with_randomness(0.0)
            .with_amount(2);
        config.custom_name = Some("Night Variant".to_string());
        let mut rng = StdRng::seed_from_u64(2);

        let batch = generate_presets(&config, &library, &mut rng).unwrap();
        let names: Vec<_> = batch.presets.iter().map(|p| p.preset_name.as_str()).collect();
        assert_eq!(names, ["Night Variant 1", "Night Variant 2"]);
        for preset in &batch.presets {
            assert_eq!(preset.param("VCF1/Cut").unwrap().value.to_string(), "30");
            let description = preset.meta_value("Description").unwrap().to_string();
            assert!(description.contains("based on Night"));
        }
        assert!(batch.output_folder.ends_with("RANDOM/Randomized Preset"));
    }

    #[test]
    fn merge_mode_lists_sources() {
        let library = library();
        let mut config = GeneratorConfig::new("Zebra2").with_merge(["Warm", "Cold"]);
        config.category = Some("Pads".to_string());
        let mut rng = StdRng::seed_from_u64(3);

        let batch = generate_presets(&config, &library, &mut rng).unwrap();
        let preset = &batch.presets[0];
        let cut = preset.param("VCF1/Cut").unwrap().value.as_f64().unwrap();
        assert!((10.0..=20.0).contains(&cut));
        let description = preset.meta_value("Description").unwrap().to_string();
        assert!(description.contains("Warm Cloud + Cold Cloud"));
        assert_eq!(preset.categories, vec!["Pads"]);
    }

    #[test]
    fn binary_mode_draws_from_sources() {
        let library = library();
        let config = GeneratorConfig::new("Zebra2").with_amount(10).with_binary(true);
        let mut rng = StdRng::seed_from_u64(4);

        let batch = generate_presets(&config, &library, &mut rng).unwrap();
        for preset in &batch.presets {
            let binary = preset.binary.as_deref().unwrap();
            assert!(binary == "ab:AAAA" || binary == "cd:BBBB");
        }
    }

    #[test]
    fn errors_abort() {
        let library = library();
        let mut rng = StdRng::seed_from_u64(5);

        let config = GeneratorConfig::new("Zebra2").with_preset("Missing");
        assert!(matches!(
            generate_presets(&config, &library, &mut rng),
            Err(GenerateError::PresetNotFound(_))
        ));

        let mut config = GeneratorConfig::new("Zebra2");
        config.author = Some("Nobody".to_string());
        assert!(matches!(
            generate_presets(&config, &library, &mut rng),
            Err(GenerateError::EmptyLibrary)
        ));

        let config = GeneratorConfig::new("Zebra2").with_merge(["?Cloud"]);
        assert!(matches!(
            generate_presets(&config, &library, &mut rng),
            Err(GenerateError::NotEnoughPresets { found: 1 })
        ));

        let config = GeneratorConfig::new("Zebra2").with_amount(0);
        assert!(matches!(
            generate_presets(&config, &library, &mut rng),
            Err(GenerateError::Config(_))
        ));
    }
}
