use beacon_types::{BeaconState, FixtureObject, SignedBeaconBlock, Ssz};
use generator::{Config, Generator};
use presets::Preset;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn small(seed: u64) -> Config {
    Config {
        validators: 10,
        transactions: 5,
        seed,
        ..Config::default()
    }
}

#[test]
fn same_seed_gives_the_same_objects() {
    // given
    let first = Generator::new(small(42), Preset::MINIMAL).unwrap();
    let second = Generator::new(small(42), Preset::MINIMAL).unwrap();

    // then
    assert_eq!(first.block(), second.block());
    assert_eq!(first.state(), second.state());
}

#[test]
fn different_seeds_give_different_objects() {
    // given
    let first = Generator::new(small(1), Preset::MINIMAL).unwrap();
    let second = Generator::new(small(2), Preset::MINIMAL).unwrap();

    // then
    assert_ne!(first.block(), second.block());
}

/// List counts and vector lengths, everything that does not depend on the random draws.
fn block_shape(block: &SignedBeaconBlock) -> Vec<usize> {
    let body = &block.message.body;
    vec![
        body.proposer_slashings.len(),
        body.attester_slashings.len(),
        body.attestations.len(),
        body.deposits.len(),
        body.voluntary_exits.len(),
        body.bls_to_execution_changes.len(),
        body.blob_kzg_commitments.len(),
        body.sync_aggregate.sync_committee_bits.len(),
        body.execution_payload.transactions.len(),
        body.execution_payload.withdrawals.len(),
    ]
}

fn state_shape(state: &BeaconState) -> Vec<usize> {
    vec![
        state.validators.len(),
        state.balances.len(),
        state.block_roots.len(),
        state.state_roots.len(),
        state.historical_roots.len(),
        state.eth1_data_votes.len(),
        state.randao_mixes.len(),
        state.slashings.len(),
        state.previous_epoch_participation.len(),
        state.current_epoch_participation.len(),
        state.inactivity_scores.len(),
        state.current_sync_committee.pubkeys.len(),
        state.next_sync_committee.pubkeys.len(),
        state.historical_summaries.len(),
    ]
}

#[test]
fn unseeded_runs_share_the_same_structure() {
    // given
    let config = Config {
        attestations: 6,
        deposits: 3,
        withdrawals: 9,
        blob_commitments: 5,
        ..small(0)
    };

    // when
    let first = Generator::new(config, Preset::MINIMAL).unwrap();
    let second = Generator::new(config, Preset::MINIMAL).unwrap();
    let (first_block, second_block) = (first.block(), second.block());
    let (first_state, second_state) = (first.state(), second.state());

    // then
    assert_eq!(block_shape(&first_block), block_shape(&second_block));
    assert_eq!(block_shape(&first_block), vec![16, 2, 6, 3, 16, 16, 5, 32, 5, 4]);
    assert_eq!(state_shape(&first_state), state_shape(&second_state));
    assert_eq!(
        state_shape(&first_state),
        vec![10, 10, 64, 64, 0, 32, 64, 64, 10, 10, 10, 32, 32, 0]
    );
    assert!(first_block.encode(&Preset::MINIMAL).is_ok());
    assert!(first_state.encode(&Preset::MINIMAL).is_ok());
}

#[test]
fn five_hundred_attestations_are_capped_at_128() {
    // given
    let config = Config {
        attestations: 500,
        ..small(7)
    };

    // when
    let block = Generator::new(config, Preset::MAINNET).unwrap().block();

    // then
    assert_eq!(block.message.body.attestations.len(), 128);
}

#[test]
fn minimal_state_with_ten_validators() {
    // given
    let generator = Generator::new(small(9), Preset::MINIMAL).unwrap();

    // when
    let state = generator.state();
    let bytes = state.encode(&Preset::MINIMAL).unwrap();
    let digest = state.digest(&Preset::MINIMAL).unwrap();

    // then
    assert_eq!(state.validators.len(), 10);
    assert_eq!(state.balances.len(), 10);
    assert_eq!(state.block_roots.len(), 64);
    assert_eq!(state.randao_mixes.len(), 64);
    assert_eq!(digest.len(), 32);
    assert_eq!(BeaconState::decode(&bytes, &Preset::MINIMAL).unwrap(), state);
}

#[test]
fn block_digest_is_the_message_root() {
    // given
    let block = Generator::new(small(9), Preset::MINIMAL).unwrap().block();

    // when
    let digest = block.digest(&Preset::MINIMAL).unwrap();

    // then
    assert_eq!(digest, block.message.hash_tree_root(&Preset::MINIMAL).unwrap());
    assert_ne!(digest, block.hash_tree_root(&Preset::MINIMAL).unwrap());
}

proptest::proptest! {
    #![proptest_config(ProptestConfig { cases: 10, .. ProptestConfig::default() })]

    #[test]
    fn generated_objects_are_valid_under_their_preset(
        seed in 1u64..u64::MAX,
        validators in 1usize..40,
        attestations in 0usize..300,
        minimal in any::<bool>(),
    ) {
        // given
        let preset = if minimal { Preset::MINIMAL } else { Preset::MAINNET };
        let config = Config { validators, attestations, transactions: 3, seed, ..Config::default() };
        let generator = Generator::new(config, preset).unwrap();

        // when
        let block = generator.block();
        let state = generator.state();

        // then
        let block_bytes = block.encode(&preset).unwrap();
        proptest::prop_assert_eq!(SignedBeaconBlock::decode(&block_bytes, &preset).unwrap(), block);
        proptest::prop_assert!(state.hash_tree_root(&preset).is_ok());
        proptest::prop_assert_eq!(state.validators.len(), validators);
        proptest::prop_assert!(state.validators.iter().all(|validator| !validator.slashed));
    }

    #[test]
    fn attester_slashings_always_overlap(seed in 1u64..u64::MAX, validators in 1usize..1000) {
        // given
        let config = Config { validators, attester_slashings: 2, transactions: 0, ..small(seed) };

        // when
        let block = Generator::new(config, Preset::MINIMAL).unwrap().block();

        // then
        for slashing in block.message.body.attester_slashings.iter() {
            let indices = &slashing.attestation_1.attesting_indices;
            proptest::prop_assert!(!indices.is_empty());
            proptest::prop_assert_eq!(indices, &slashing.attestation_2.attesting_indices);
            proptest::prop_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
            proptest::prop_assert!(indices.iter().all(|index| *index < validators as u64));
        }
    }
}
