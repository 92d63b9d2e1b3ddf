use std::{sync::Arc, time::Duration};

use beacon_types::{BeaconState, SignedBeaconBlock};
use clock::TestClock;
use dynamic_codec::{DynamicCodec, Reference};
use generator::{Config, Generator};
use harness::{Driver, Error, MeasureConfig, SuiteBuilder, VerificationError};
use presets::{Preset, PresetName};
use storage::{Digest, FixtureId, FixtureStore, ObjectKind};
use test_case::test_case;

fn measure_config() -> MeasureConfig {
    MeasureConfig {
        target_time: Duration::ZERO,
        min_iterations: 1,
        max_iterations: 1,
    }
}

fn generator(preset: Preset) -> Generator {
    let config = Config {
        validators: 16,
        transactions: 3,
        seed: 11,
        ..Config::default()
    };
    Generator::new(config, preset).unwrap()
}

#[test_case(PresetName::Mainnet; "mainnet")]
#[test_case(PresetName::Minimal; "minimal")]
fn stored_fixtures_verify_and_measure(name: PresetName) {
    // given
    let dir = tempfile::tempdir().unwrap();
    let store = FixtureStore::new(dir.path());
    let preset = Preset::of(name);
    let reference = Reference::new(preset);
    let generator = generator(preset);

    let block = generator.block();
    let block_id = FixtureId::new(ObjectKind::Block, name);
    store
        .store(
            block_id,
            &reference.encode(&block).unwrap(),
            Digest::new(reference.digest(&block).unwrap()),
        )
        .unwrap();

    let state = generator.state();
    let state_id = FixtureId::new(ObjectKind::State, name);
    store
        .store(
            state_id,
            &reference.encode(&state).unwrap(),
            Digest::new(reference.digest(&state).unwrap()),
        )
        .unwrap();

    let mut suite = SuiteBuilder::new();

    // when
    let block_driver = Driver::new(DynamicCodec::<SignedBeaconBlock>::new(preset))
        .load(Arc::new(store.load(block_id).unwrap()))
        .verify()
        .unwrap();
    assert_eq!(block_driver.object(), &block);
    block_driver.measure(&measure_config(), &mut suite).unwrap();

    Driver::new(DynamicCodec::<BeaconState>::new(preset))
        .load(Arc::new(store.load(state_id).unwrap()))
        .verify()
        .unwrap()
        .measure(&measure_config(), &mut suite)
        .unwrap();

    // then
    let suite = suite.finalize(dynamic_codec::NAME, &TestClock::default());
    assert_eq!(suite.results.len(), 12);
    assert!(
        suite
            .results
            .iter()
            .all(|result| result.name.contains(name.title()))
    );
}

#[test]
fn fixture_generated_for_another_preset_fails_verification() {
    // given
    let preset = Preset::MAINNET;
    let reference = Reference::new(preset);
    let state = generator(preset).state();
    let fixture = storage::Fixture {
        id: FixtureId::new(ObjectKind::State, PresetName::Minimal),
        bytes: reference.encode(&state).unwrap(),
        digest: Digest::new(reference.digest(&state).unwrap()),
    };

    // when
    let err = Driver::new(DynamicCodec::<BeaconState>::new(Preset::MINIMAL))
        .load(Arc::new(fixture))
        .verify()
        .err()
        .unwrap();

    // then
    assert!(matches!(err, Error::Codec { .. }), "{err}");
}

#[test]
fn tampered_digest_is_rejected() {
    // given
    let preset = Preset::MINIMAL;
    let reference = Reference::new(preset);
    let block = generator(preset).block();
    let mut digest = reference.digest(&block).unwrap();
    digest[0] ^= 1;
    let fixture = storage::Fixture {
        id: FixtureId::new(ObjectKind::Block, PresetName::Minimal),
        bytes: reference.encode(&block).unwrap(),
        digest: Digest::new(digest),
    };

    // when
    let err = Driver::new(DynamicCodec::<SignedBeaconBlock>::new(preset))
        .load(Arc::new(fixture))
        .verify()
        .err()
        .unwrap();

    // then
    assert!(matches!(
        err,
        Error::Verification {
            source: VerificationError::DigestMismatch { .. },
            ..
        }
    ));
}
