use std::{path::PathBuf, sync::Arc};

use beacon_types::{BeaconState, FixtureObject, SignedBeaconBlock};
use dynamic_codec::{DynamicCodec, Reference};
use generator::Generator;
use harness::{
    BenchmarkSuite, Codec, Comparison, Driver, MeasureConfig, SuiteBuilder, ports::clock::Clock,
};
use lighthouse_codec::{MainnetBlockCodec, MainnetStateCodec, MinimalBlockCodec, MinimalStateCodec};
use presets::{Preset, PresetName};
use ssz_rs_codec::{mainnet, minimal};
use storage::{Digest, Fixture, FixtureId, FixtureStore, ObjectKind};
use tracing::{info, warn};

use crate::{
    config::{GenerateConfig, Library, RunConfig},
    errors::{Error, Result},
};

/// Writes a block and a state fixture for every preset, plus the preset files.
pub fn generate(config: &GenerateConfig) -> Result<Vec<FixtureId>> {
    config.generator.validate()?;
    let store = FixtureStore::create(&config.output)?;

    let mut written = Vec::with_capacity(FixtureId::all().count());
    for name in PresetName::ALL {
        let preset = Preset::of(name);
        let generator = Generator::new(config.generator, preset)?;
        let reference = Reference::new(preset);

        let id = FixtureId::new(ObjectKind::Block, name);
        persist(&store, &reference, id, &generator.block())?;
        written.push(id);

        let id = FixtureId::new(ObjectKind::State, name);
        persist(&store, &reference, id, &generator.state())?;
        written.push(id);

        let path = store.store_preset(&preset)?;
        info!("wrote {name} preset to {}", path.display());
    }

    Ok(written)
}

fn persist<T: FixtureObject>(
    store: &FixtureStore,
    reference: &Reference,
    id: FixtureId,
    object: &T,
) -> Result<()> {
    let encoding_err = |e| Error::Other(format!("failed to encode {id}: {e}"));

    let bytes = reference.encode(object).map_err(encoding_err)?;
    let digest = Digest::new(reference.digest(object).map_err(encoding_err)?);
    store.store(id, &bytes, digest)?;

    info!(
        "generated {id}: {} bytes, htr {digest}, written to {}",
        bytes.len(),
        store.data_path(id).display()
    );

    Ok(())
}

/// Verifies and measures every selected library against the stored fixtures, writing one
/// `{library}.json` per library.
pub fn run(config: &RunConfig, clock: &impl Clock) -> Result<Vec<PathBuf>> {
    if !harness::alloc::is_installed() {
        warn!("counting allocator is not installed, allocation columns will be zero");
    }

    let store = FixtureStore::new(&config.fixtures);
    let mut written = Vec::with_capacity(config.libraries.len());

    for library in &config.libraries {
        let mut suite = SuiteBuilder::new();

        for &name in &config.presets {
            for &kind in &config.kinds {
                let fixture = Arc::new(store.load(FixtureId::new(kind, name))?);
                bench(*library, &store, fixture, &config.measure, &mut suite)?;
            }
        }

        let path = config
            .results
            .join(BenchmarkSuite::file_name(library.name()));
        suite.finalize(library.name(), clock).write(&path)?;
        written.push(path);
    }

    Ok(written)
}

fn bench(
    library: Library,
    store: &FixtureStore,
    fixture: Arc<Fixture>,
    measure: &MeasureConfig,
    suite: &mut SuiteBuilder,
) -> Result<()> {
    let FixtureId { kind, preset } = fixture.id;

    match library {
        Library::Dynamic => {
            let preset = load_preset(store, preset)?;
            match kind {
                ObjectKind::Block => {
                    drive(DynamicCodec::<SignedBeaconBlock>::new(preset), fixture, measure, suite)
                }
                ObjectKind::State => {
                    drive(DynamicCodec::<BeaconState>::new(preset), fixture, measure, suite)
                }
            }
        }
        Library::Lighthouse => match (preset, kind) {
            (PresetName::Mainnet, ObjectKind::Block) => {
                drive(MainnetBlockCodec::new(), fixture, measure, suite)
            }
            (PresetName::Mainnet, ObjectKind::State) => {
                drive(MainnetStateCodec::new(), fixture, measure, suite)
            }
            (PresetName::Minimal, ObjectKind::Block) => {
                drive(MinimalBlockCodec::new(), fixture, measure, suite)
            }
            (PresetName::Minimal, ObjectKind::State) => {
                drive(MinimalStateCodec::new(), fixture, measure, suite)
            }
        },
        Library::SszRs => match (preset, kind) {
            (PresetName::Mainnet, ObjectKind::Block) => {
                drive(mainnet::BlockCodec::new(), fixture, measure, suite)
            }
            (PresetName::Mainnet, ObjectKind::State) => {
                drive(mainnet::StateCodec::new(), fixture, measure, suite)
            }
            (PresetName::Minimal, ObjectKind::Block) => {
                drive(minimal::BlockCodec::new(), fixture, measure, suite)
            }
            (PresetName::Minimal, ObjectKind::State) => {
                drive(minimal::StateCodec::new(), fixture, measure, suite)
            }
        },
    }
}

fn drive<C: Codec>(
    codec: C,
    fixture: Arc<Fixture>,
    measure: &MeasureConfig,
    suite: &mut SuiteBuilder,
) -> Result<()> {
    Driver::new(codec)
        .load(fixture)
        .verify()?
        .measure(measure, suite)?;
    Ok(())
}

/// The preset file stored next to the fixtures, or the built-in preset when there is none.
fn load_preset(store: &FixtureStore, name: PresetName) -> Result<Preset> {
    match store.load_preset(name) {
        Ok(preset) => Ok(preset),
        Err(storage::Error::NotFound { path }) => {
            warn!(
                "no preset file at {}, using the built-in {name} preset",
                path.display()
            );
            Ok(Preset::of(name))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn compare(files: &[PathBuf]) -> Result<Comparison> {
    let suites = files
        .iter()
        .map(|path| BenchmarkSuite::load(path))
        .collect::<harness::Result<Vec<_>>>()?;

    Ok(Comparison::new(&suites))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use beacon_types::Ssz;
    use clock::TestClock;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn generate_config(output: PathBuf) -> GenerateConfig {
        GenerateConfig {
            output,
            generator: generator::Config {
                validators: 10,
                transactions: 4,
                attestations: 8,
                seed: 42,
                ..generator::Config::default()
            },
        }
    }

    fn run_config(fixtures: PathBuf, results: PathBuf, libraries: Vec<Library>) -> RunConfig {
        RunConfig {
            fixtures,
            results,
            libraries,
            presets: PresetName::ALL.to_vec(),
            kinds: ObjectKind::ALL.to_vec(),
            measure: MeasureConfig {
                target_time: Duration::ZERO,
                min_iterations: 1,
                max_iterations: 1,
            },
        }
    }

    #[test]
    fn generate_writes_every_fixture_and_preset() {
        // given
        let dir = tempfile::tempdir().unwrap();

        // when
        let written = generate(&generate_config(dir.path().to_path_buf())).unwrap();

        // then
        assert_eq!(written, FixtureId::all().collect::<Vec<_>>());
        let mut files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(
            files,
            vec![
                "block-mainnet-meta.json",
                "block-mainnet.ssz",
                "block-minimal-meta.json",
                "block-minimal.ssz",
                "mainnet-preset.yaml",
                "minimal-preset.yaml",
                "state-mainnet-meta.json",
                "state-mainnet.ssz",
                "state-minimal-meta.json",
                "state-minimal.ssz",
            ]
        );
    }

    #[test]
    fn minimal_state_follows_the_requested_size() {
        // given
        let dir = tempfile::tempdir().unwrap();
        generate(&generate_config(dir.path().to_path_buf())).unwrap();
        let store = FixtureStore::new(dir.path());

        // when
        let fixture = store
            .load(FixtureId::new(ObjectKind::State, PresetName::Minimal))
            .unwrap();
        let state = BeaconState::decode(&fixture.bytes, &Preset::MINIMAL).unwrap();

        // then
        assert_eq!(state.validators.len(), 10);
        assert_eq!(state.balances.len(), 10);
        assert_eq!(state.block_roots.len(), 64);
        assert_eq!(state.randao_mixes.len(), 64);
        assert_eq!(fixture.digest.to_string().len(), 64);
        assert_eq!(
            fixture.digest.as_bytes(),
            &state.hash_tree_root(&Preset::MINIMAL).unwrap()
        );
    }

    #[test]
    fn invalid_generation_config_writes_nothing() {
        // given
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("fixtures");
        let mut config = generate_config(output.clone());
        config.generator.validators = 0;

        // when
        let result = generate(&config);

        // then
        assert!(matches!(result, Err(Error::Config(_))));
        assert!(!output.exists());
    }

    #[test]
    fn run_writes_one_suite_per_library() {
        // given
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("fixtures");
        let results = dir.path().join("results");
        generate(&generate_config(fixtures.clone())).unwrap();
        let clock = TestClock::default();
        clock.advance_time(Duration::from_secs(1_700_000_000));

        // when
        let written = run(
            &run_config(
                fixtures,
                results.clone(),
                vec![Library::Dynamic, Library::Lighthouse, Library::SszRs],
            ),
            &clock,
        )
        .unwrap();

        // then
        assert_eq!(
            written,
            vec![
                results.join("dynamic.json"),
                results.join("lighthouse.json"),
                results.join("ssz_rs.json"),
            ]
        );

        let dynamic = BenchmarkSuite::load(&written[0]).unwrap();
        assert_eq!(dynamic.library, "dynamic");
        assert_eq!(dynamic.timestamp, clock.now());
        assert_eq!(dynamic.results.len(), 4 * 6);
        assert!(dynamic.result("StateMinimal_UnmarshalReader").is_some());

        let lighthouse = BenchmarkSuite::load(&written[1]).unwrap();
        assert_eq!(lighthouse.results.len(), 4 * 4);
        assert!(lighthouse.result("BlockMainnet_MarshalStreamBuffer").is_some());
        assert!(lighthouse.result("BlockMainnet_MarshalWriter").is_none());

        let ssz_rs = BenchmarkSuite::load(&written[2]).unwrap();
        assert_eq!(ssz_rs.library, "ssz_rs");
        assert_eq!(ssz_rs.results.len(), 4 * 4);
        assert!(ssz_rs.result("StateMainnet_HashTreeRoot").is_some());
        assert!(ssz_rs.result("StateMainnet_UnmarshalReader").is_none());
    }

    #[test]
    fn missing_preset_file_falls_back_to_builtin() {
        // given
        let dir = tempfile::tempdir().unwrap();
        generate(&generate_config(dir.path().to_path_buf())).unwrap();
        std::fs::remove_file(dir.path().join("minimal-preset.yaml")).unwrap();
        let store = FixtureStore::new(dir.path());

        // when
        let preset = load_preset(&store, PresetName::Minimal).unwrap();

        // then
        assert_eq!(preset, Preset::MINIMAL);
    }

    #[test]
    fn tampered_fixture_aborts_the_run() {
        // given
        let dir = tempfile::tempdir().unwrap();
        generate(&generate_config(dir.path().to_path_buf())).unwrap();
        let store = FixtureStore::new(dir.path());
        let id = FixtureId::new(ObjectKind::Block, PresetName::Mainnet);
        let fixture = store.load(id).unwrap();
        let mut digest: [u8; 32] = fixture.digest.into();
        digest[31] ^= 0x01;
        store.store(id, &fixture.bytes, Digest::new(digest)).unwrap();

        // when
        let result = run(
            &run_config(
                dir.path().to_path_buf(),
                dir.path().join("results"),
                vec![Library::Lighthouse],
            ),
            &TestClock::default(),
        );

        // then
        assert!(matches!(
            result,
            Err(Error::Harness(harness::Error::Verification { .. }))
        ));
        assert!(!dir.path().join("results").join("lighthouse.json").exists());
    }

    #[test_case(Library::Dynamic; "dynamic")]
    #[test_case(Library::Lighthouse; "lighthouse")]
    #[test_case(Library::SszRs; "ssz_rs")]
    fn missing_fixtures_are_reported(library: Library) {
        // given
        let dir = tempfile::tempdir().unwrap();

        // when
        let result = run(
            &run_config(dir.path().to_path_buf(), dir.path().join("results"), vec![library]),
            &TestClock::default(),
        );

        // then
        assert!(matches!(
            result,
            Err(Error::Storage(storage::Error::NotFound { .. }))
        ));
    }

    #[test]
    fn compare_lines_up_libraries() {
        // given
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("fixtures");
        generate(&generate_config(fixtures.clone())).unwrap();
        let mut config = run_config(
            fixtures,
            dir.path().join("results"),
            vec![Library::Dynamic, Library::Lighthouse, Library::SszRs],
        );
        config.presets = vec![PresetName::Minimal];
        config.kinds = vec![ObjectKind::Block];
        let files = run(&config, &TestClock::default()).unwrap();

        // when
        let comparison = compare(&files).unwrap();

        // then
        assert_eq!(comparison.libraries(), ["dynamic", "lighthouse", "ssz_rs"]);
        assert!(comparison
            .ns_per_op("BlockMinimal_Unmarshal", "lighthouse")
            .is_some());
        assert!(comparison
            .ns_per_op("BlockMinimal_MarshalWriter", "lighthouse")
            .is_none());
        assert!(comparison
            .ns_per_op("BlockMinimal_MarshalStreamBuffer", "ssz_rs")
            .is_some());
        let table = comparison.to_string();
        assert!(table.contains("BlockMinimal_HashTreeRoot"));
    }
}
