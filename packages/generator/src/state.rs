use beacon_types::{
    BeaconState, BitVector, Checkpoint, DENEB_FORK_VERSION, Epoch, ExecutionPayloadHeader,
    Fork, SyncCommittee, Validator,
    bounds::{JUSTIFICATION_BITS_LENGTH, JustificationBitsLength},
};
use presets::Preset;
use sha2::{Digest, Sha256};

use crate::{
    Config,
    block::{GWEI_PER_ETH, MAX_EFFECTIVE_BALANCE, block_header, eth1_data},
    random::Random,
    set_two_thirds,
};

const GENESIS_TIME: u64 = 1_606_824_023;
const FAR_FUTURE_EPOCH: Epoch = u64::MAX;

pub(crate) fn beacon_state(config: &Config, preset: &Preset, random: &mut Random) -> BeaconState {
    let validator_count = config.validators;
    let current_epoch = config.slot / preset.slots_per_epoch as u64;

    let validators = (0..validator_count).map(|_| validator(random)).collect();
    let balances = (0..validator_count)
        .map(|_| MAX_EFFECTIVE_BALANCE + random.below(GWEI_PER_ETH))
        .collect();
    let previous_epoch_participation = (0..validator_count)
        .map(|_| random.participation_flags())
        .collect();
    let current_epoch_participation = (0..validator_count)
        .map(|_| random.participation_flags())
        .collect();
    let inactivity_scores = (0..validator_count).map(|_| random.below(100)).collect();

    let block_roots = (0..preset.slots_per_historical_root)
        .map(|_| random.array())
        .collect();
    let state_roots = (0..preset.slots_per_historical_root)
        .map(|_| random.array())
        .collect();
    let randao_mixes = (0..preset.epochs_per_historical_vector)
        .map(|_| random.array())
        .collect();
    let slashings = (0..preset.epochs_per_slashings_vector)
        .map(|_| random.below(MAX_EFFECTIVE_BALANCE))
        .collect();
    let eth1_data_votes = (0..preset.eth1_data_votes_limit())
        .map(|_| eth1_data(random))
        .collect();

    let mut justification_bits: BitVector<JustificationBitsLength> =
        BitVector::with_len(JUSTIFICATION_BITS_LENGTH);
    set_two_thirds(&mut justification_bits);

    BeaconState {
        genesis_time: GENESIS_TIME,
        genesis_validators_root: random.array(),
        slot: config.slot,
        fork: Fork {
            previous_version: DENEB_FORK_VERSION,
            current_version: DENEB_FORK_VERSION,
            epoch: current_epoch,
        },
        latest_block_header: block_header(config.slot.saturating_sub(1), validator_count, random),
        block_roots,
        state_roots,
        historical_roots: Default::default(),
        eth1_data: eth1_data(random),
        eth1_data_votes,
        eth1_deposit_index: validator_count as u64,
        validators,
        balances,
        randao_mixes,
        slashings,
        previous_epoch_participation,
        current_epoch_participation,
        justification_bits,
        previous_justified_checkpoint: checkpoint(current_epoch.saturating_sub(2), random),
        current_justified_checkpoint: checkpoint(current_epoch.saturating_sub(1), random),
        finalized_checkpoint: checkpoint(current_epoch.saturating_sub(2), random),
        inactivity_scores,
        current_sync_committee: sync_committee(preset, random),
        next_sync_committee: sync_committee(preset, random),
        latest_execution_payload_header: execution_payload_header(random),
        next_withdrawal_index: random.below(1_000_000),
        next_withdrawal_validator_index: random.index(validator_count),
        historical_summaries: Default::default(),
    }
}

fn validator(random: &mut Random) -> Validator {
    Validator {
        pubkey: random.array(),
        withdrawal_credentials: random.array(),
        effective_balance: MAX_EFFECTIVE_BALANCE,
        slashed: false,
        activation_eligibility_epoch: 0,
        activation_epoch: 0,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
    }
}

fn checkpoint(epoch: Epoch, random: &mut Random) -> Checkpoint {
    Checkpoint {
        epoch,
        root: random.array(),
    }
}

fn sync_committee(preset: &Preset, random: &mut Random) -> SyncCommittee {
    SyncCommittee {
        pubkeys: (0..preset.sync_committee_size)
            .map(|_| random.array())
            .collect(),
        aggregate_pubkey: random.array(),
    }
}

fn execution_payload_header(random: &mut Random) -> ExecutionPayloadHeader {
    let transactions_root = Sha256::digest(random.array::<32>()).into();
    let withdrawals_root = Sha256::digest(random.array::<32>()).into();

    ExecutionPayloadHeader {
        parent_hash: random.array(),
        fee_recipient: random.array(),
        state_root: random.array(),
        receipts_root: random.array(),
        logs_bloom: random.array(),
        prev_randao: random.array(),
        block_number: random.below(10_000_000),
        gas_limit: 30_000_000,
        gas_used: 15_000_000 + random.below(10_000_000),
        timestamp: 1_700_000_000 + random.below(10_000_000),
        extra_data: random.bytes(32).into(),
        base_fee_per_gas: random.array(),
        block_hash: random.array(),
        transactions_root,
        withdrawals_root,
        blob_gas_used: random.below(1_000_000),
        excess_blob_gas: random.below(1_000_000),
    }
}
