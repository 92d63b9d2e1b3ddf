#![deny(unused_crate_dependencies)]

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use clock::TestClock;
use dynamic_codec::Reference;
use generator::{Config, Generator};
use harness::MeasureConfig;
use presets::{Preset, PresetName};
use storage::{Digest, Fixture, FixtureId, FixtureStore, ObjectKind};
use tempfile::TempDir;

/// A generation config small enough for unit tests under either preset.
pub fn small_config(seed: u64) -> Config {
    Config {
        validators: 8,
        transactions: 3,
        tx_min_size: 16,
        tx_max_size: 64,
        attestations: 4,
        deposits: 2,
        proposer_slashings: 2,
        attester_slashings: 1,
        voluntary_exits: 2,
        bls_changes: 2,
        withdrawals: 2,
        blob_commitments: 3,
        seed,
        ..Config::default()
    }
}

/// One measured batch of a single iteration.
pub fn single_iteration() -> MeasureConfig {
    MeasureConfig {
        target_time: Duration::ZERO,
        min_iterations: 1,
        max_iterations: 1,
    }
}

pub fn clock_at(rfc3339: &str) -> TestClock {
    let clock = TestClock::default();
    let time: DateTime<Utc> = rfc3339.parse().expect("valid RFC 3339 timestamp");
    clock.set_time(time);
    clock
}

/// Encodes `id`'s object the way the generate command does.
pub fn fixture(id: FixtureId, config: Config) -> Fixture {
    let preset = Preset::of(id.preset);
    let generator = Generator::new(config, preset).expect("valid generation config");
    let reference = Reference::new(preset);

    let (bytes, digest) = match id.kind {
        ObjectKind::Block => {
            let block = generator.block();
            (reference.encode(&block), reference.digest(&block))
        }
        ObjectKind::State => {
            let state = generator.state();
            (reference.encode(&state), reference.digest(&state))
        }
    };

    Fixture {
        id,
        bytes: bytes.expect("generated objects encode"),
        digest: Digest::new(digest.expect("generated objects hash")),
    }
}

/// Every fixture plus both preset files, written into a temporary directory.
pub struct FixtureSet {
    _dir: TempDir,
    store: FixtureStore,
}

impl FixtureSet {
    pub fn generate(config: Config) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let store = FixtureStore::new(dir.path());

        for id in FixtureId::all() {
            let fixture = fixture(id, config);
            store
                .store(id, &fixture.bytes, fixture.digest)
                .expect("fixture stored");
        }
        for name in PresetName::ALL {
            store
                .store_preset(&Preset::of(name))
                .expect("preset stored");
        }

        Self { _dir: dir, store }
    }

    pub fn store(&self) -> &FixtureStore {
        &self.store
    }

    pub fn load(&self, id: FixtureId) -> Arc<Fixture> {
        Arc::new(self.store.load(id).expect("fixture present"))
    }
}
