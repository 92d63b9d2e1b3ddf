use beacon_types::{
    Attestation, AttestationData, AttesterSlashing, BeaconBlock, BeaconBlockBody,
    BeaconBlockHeader, BitList, BitVector, BlsToExecutionChange, Checkpoint, Deposit,
    DepositData, Eth1Data, ExecutionPayload, IndexedAttestation, ProposerSlashing,
    SignedBeaconBlock, SignedBeaconBlockHeader, SignedBlsToExecutionChange, SignedVoluntaryExit,
    Slot, SyncAggregate, Transaction, VoluntaryExit, Withdrawal,
    bounds::{
        DEPOSIT_CONTRACT_TREE_DEPTH, MAX_ATTESTATIONS, MAX_ATTESTER_SLASHINGS,
        MAX_BLS_TO_EXECUTION_CHANGES, MAX_DEPOSITS, MAX_PROPOSER_SLASHINGS, MAX_VOLUNTARY_EXITS,
        MaxValidatorsPerCommittee, SyncCommitteeSize,
    },
};
use presets::Preset;

use crate::{Config, random::Random, set_two_thirds};

pub(crate) const GWEI_PER_ETH: u64 = 1_000_000_000;
pub(crate) const MAX_EFFECTIVE_BALANCE: u64 = 32 * GWEI_PER_ETH;

const MIN_AGGREGATION_BITS: u64 = 64;
const AGGREGATION_BITS_SPREAD: u64 = 200;
const MIN_SLASHED_INDICES: u64 = 10;
const SLASHED_INDICES_SPREAD: u64 = 50;
const RANDOM_SLOT_RANGE: u64 = 1000;

pub(crate) fn signed_block(
    config: &Config,
    preset: &Preset,
    random: &mut Random,
) -> SignedBeaconBlock {
    let message = BeaconBlock {
        slot: config.slot,
        proposer_index: random.index(config.validators),
        parent_root: random.array(),
        state_root: random.array(),
        body: body(config, preset, random),
    };

    SignedBeaconBlock {
        message,
        signature: random.array(),
    }
}

fn body(config: &Config, preset: &Preset, random: &mut Random) -> BeaconBlockBody {
    let validators = config.validators;

    let proposer_slashings = (0..config.proposer_slashings.min(MAX_PROPOSER_SLASHINGS))
        .map(|_| proposer_slashing(validators, random))
        .collect();
    let attester_slashings = (0..config.attester_slashings.min(MAX_ATTESTER_SLASHINGS))
        .map(|_| attester_slashing(validators, preset, random))
        .collect();
    let attestations = (0..config.attestations.min(MAX_ATTESTATIONS))
        .map(|_| attestation(config.slot, preset, random))
        .collect();
    let deposits = (0..config.deposits.min(MAX_DEPOSITS))
        .map(|_| deposit(random))
        .collect();
    let voluntary_exits = (0..config.voluntary_exits.min(MAX_VOLUNTARY_EXITS))
        .map(|_| voluntary_exit(validators, random))
        .collect();
    let bls_to_execution_changes = (0..config.bls_changes.min(MAX_BLS_TO_EXECUTION_CHANGES))
        .map(|_| bls_change(validators, random))
        .collect();
    let blob_kzg_commitments = (0..config
        .blob_commitments
        .min(preset.max_blob_commitments_per_block))
        .map(|_| random.array())
        .collect();

    BeaconBlockBody {
        randao_reveal: random.array(),
        eth1_data: eth1_data(random),
        graffiti: random.array(),
        proposer_slashings,
        attester_slashings,
        attestations,
        deposits,
        voluntary_exits,
        sync_aggregate: sync_aggregate(preset, random),
        execution_payload: execution_payload(config, preset, random),
        bls_to_execution_changes,
        blob_kzg_commitments,
    }
}

pub(crate) fn eth1_data(random: &mut Random) -> Eth1Data {
    Eth1Data {
        deposit_root: random.array(),
        deposit_count: random.below(1_000_000),
        block_hash: random.array(),
    }
}

pub(crate) fn block_header(slot: Slot, validators: usize, random: &mut Random) -> BeaconBlockHeader {
    BeaconBlockHeader {
        slot,
        proposer_index: random.index(validators),
        parent_root: random.array(),
        state_root: random.array(),
        body_root: random.array(),
    }
}

fn proposer_slashing(validators: usize, random: &mut Random) -> ProposerSlashing {
    let proposer = random.index(validators);
    let signed_header = |random: &mut Random| {
        let mut message = block_header(random.below(RANDOM_SLOT_RANGE), validators, random);
        message.proposer_index = proposer;
        SignedBeaconBlockHeader {
            message,
            signature: random.array(),
        }
    };

    ProposerSlashing {
        signed_header_1: signed_header(random),
        signed_header_2: signed_header(random),
    }
}

/// Two indexed attestations over the same sorted index set, voting at different slots.
fn attester_slashing(validators: usize, preset: &Preset, random: &mut Random) -> AttesterSlashing {
    let count = MIN_SLASHED_INDICES + random.below(SLASHED_INDICES_SPREAD);
    let mut indices: Vec<u64> = (0..count).map(|_| random.index(validators)).collect();
    indices.sort_unstable();
    indices.dedup();

    let first_slot = random.below(RANDOM_SLOT_RANGE);
    let second_slot = (first_slot + 1 + random.below(RANDOM_SLOT_RANGE - 1)) % RANDOM_SLOT_RANGE;

    let indexed = |slot: Slot, random: &mut Random| IndexedAttestation {
        attesting_indices: indices.clone().into(),
        data: attestation_data(slot, preset, random),
        signature: random.array(),
    };

    AttesterSlashing {
        attestation_1: indexed(first_slot, random),
        attestation_2: indexed(second_slot, random),
    }
}

fn attestation_data(slot: Slot, preset: &Preset, random: &mut Random) -> AttestationData {
    let epoch = slot / preset.slots_per_epoch as u64;
    AttestationData {
        slot,
        index: random.below(64),
        beacon_block_root: random.array(),
        source: Checkpoint {
            epoch: epoch.saturating_sub(1),
            root: random.array(),
        },
        target: Checkpoint {
            epoch,
            root: random.array(),
        },
    }
}

fn attestation(slot: Slot, preset: &Preset, random: &mut Random) -> Attestation {
    let len = MIN_AGGREGATION_BITS + random.below(AGGREGATION_BITS_SPREAD);
    let mut aggregation_bits: BitList<MaxValidatorsPerCommittee> = BitList::with_len(len as usize);
    set_two_thirds(&mut aggregation_bits);

    Attestation {
        aggregation_bits,
        data: attestation_data(slot.saturating_sub(1), preset, random),
        signature: random.array(),
    }
}

fn deposit(random: &mut Random) -> Deposit {
    let proof = (0..=DEPOSIT_CONTRACT_TREE_DEPTH)
        .map(|_| random.array())
        .collect();

    Deposit {
        proof,
        data: DepositData {
            pubkey: random.array(),
            withdrawal_credentials: random.array(),
            amount: MAX_EFFECTIVE_BALANCE,
            signature: random.array(),
        },
    }
}

fn voluntary_exit(validators: usize, random: &mut Random) -> SignedVoluntaryExit {
    SignedVoluntaryExit {
        message: VoluntaryExit {
            epoch: random.below(RANDOM_SLOT_RANGE),
            validator_index: random.index(validators),
        },
        signature: random.array(),
    }
}

fn bls_change(validators: usize, random: &mut Random) -> SignedBlsToExecutionChange {
    SignedBlsToExecutionChange {
        message: BlsToExecutionChange {
            validator_index: random.index(validators),
            from_bls_pubkey: random.array(),
            to_execution_address: random.array(),
        },
        signature: random.array(),
    }
}

fn sync_aggregate(preset: &Preset, random: &mut Random) -> SyncAggregate {
    let mut sync_committee_bits: BitVector<SyncCommitteeSize> =
        BitVector::with_len(preset.sync_committee_size);
    set_two_thirds(&mut sync_committee_bits);

    SyncAggregate {
        sync_committee_bits,
        sync_committee_signature: random.array(),
    }
}

fn execution_payload(config: &Config, preset: &Preset, random: &mut Random) -> ExecutionPayload {
    let transactions = (0..config.transaction_count())
        .map(|_| {
            let size = random.size(config.tx_min_size..=config.tx_max_size);
            Transaction::from(random.bytes(size))
        })
        .collect();

    let withdrawals = (0..config.withdrawals.min(preset.max_withdrawals_per_payload))
        .map(|index| Withdrawal {
            index: index as u64,
            validator_index: random.index(config.validators),
            address: random.array(),
            amount: random.below(MAX_EFFECTIVE_BALANCE),
        })
        .collect();

    ExecutionPayload {
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
        transactions,
        withdrawals,
        blob_gas_used: random.below(1_000_000),
        excess_blob_gas: random.below(1_000_000),
    }
}

#[cfg(test)]
mod tests {
    use beacon_types::Ssz;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> Config {
        Config {
            validators: 50,
            transactions: 3,
            seed: 11,
            ..Config::default()
        }
    }

    #[test]
    fn requested_counts_are_clamped_to_protocol_maxima() {
        // given
        let config = Config {
            attestations: 500,
            deposits: 100,
            proposer_slashings: 17,
            attester_slashings: 3,
            voluntary_exits: 99,
            bls_changes: 1000,
            ..config()
        };

        // when
        let block = signed_block(&config, &Preset::MINIMAL, &mut Random::for_stream(1, 0));

        // then
        let body = &block.message.body;
        assert_eq!(body.attestations.len(), 128);
        assert_eq!(body.deposits.len(), 16);
        assert_eq!(body.proposer_slashings.len(), 16);
        assert_eq!(body.attester_slashings.len(), 2);
        assert_eq!(body.voluntary_exits.len(), 16);
        assert_eq!(body.bls_to_execution_changes.len(), 16);
    }

    #[test]
    fn preset_lists_are_clamped_to_the_preset() {
        // given
        let config = Config {
            withdrawals: 100,
            blob_commitments: 100,
            ..config()
        };

        // when
        let minimal = signed_block(&config, &Preset::MINIMAL, &mut Random::for_stream(1, 0));
        let mainnet = signed_block(&config, &Preset::MAINNET, &mut Random::for_stream(1, 0));

        // then
        assert_eq!(minimal.message.body.execution_payload.withdrawals.len(), 4);
        assert_eq!(minimal.message.body.blob_kzg_commitments.len(), 32);
        assert_eq!(mainnet.message.body.execution_payload.withdrawals.len(), 16);
        assert_eq!(mainnet.message.body.blob_kzg_commitments.len(), 100);
    }

    #[test]
    fn attester_slashings_share_sorted_unique_indices() {
        // when
        let block = signed_block(&config(), &Preset::MAINNET, &mut Random::for_stream(5, 0));

        // then
        for slashing in block.message.body.attester_slashings.iter() {
            let first = &slashing.attestation_1;
            let second = &slashing.attestation_2;

            assert!(!first.attesting_indices.is_empty());
            assert_eq!(first.attesting_indices, second.attesting_indices);
            assert!(first.attesting_indices.iter().tuple_windows().all(|(a, b)| a < b));
            assert_ne!(first.data.slot, second.data.slot);
        }
    }

    #[test]
    fn proposer_slashings_name_one_proposer() {
        // when
        let block = signed_block(&config(), &Preset::MINIMAL, &mut Random::for_stream(5, 0));

        // then
        for slashing in block.message.body.proposer_slashings.iter() {
            assert_eq!(
                slashing.signed_header_1.message.proposer_index,
                slashing.signed_header_2.message.proposer_index
            );
        }
    }

    #[test]
    fn aggregation_bits_are_two_thirds_set() {
        // when
        let block = signed_block(&config(), &Preset::MINIMAL, &mut Random::for_stream(9, 0));

        // then
        for attestation in block.message.body.attestations.iter() {
            let bits = &attestation.aggregation_bits;
            assert!((64..264).contains(&bits.len()));
            assert_eq!(bits.count_ones(), bits.len() * 2 / 3);
            assert_eq!(attestation.data.slot, config().slot - 1);
        }
    }

    #[test]
    fn transaction_sizes_stay_in_range() {
        // given
        let config = Config {
            transactions: 40,
            tx_min_size: 10,
            tx_max_size: 12,
            ..config()
        };

        // when
        let block = signed_block(&config, &Preset::MINIMAL, &mut Random::for_stream(2, 0));

        // then
        let transactions = &block.message.body.execution_payload.transactions;
        assert_eq!(transactions.len(), 40);
        assert!(transactions.iter().all(|tx| (10..=12).contains(&tx.len())));
    }

    #[test]
    fn generated_block_encodes_under_its_preset() {
        // given
        let block = signed_block(&config(), &Preset::MINIMAL, &mut Random::for_stream(4, 0));

        // when
        let bytes = block.encode(&Preset::MINIMAL).unwrap();

        // then
        assert_eq!(SignedBeaconBlock::decode(&bytes, &Preset::MINIMAL).unwrap(), block);
        assert!(block.encode(&Preset::MAINNET).is_err());
    }
}
