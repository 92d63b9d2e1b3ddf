use ssz_bench_encoding::{BitVector, List, Root, Vector, container};

use crate::{
    BeaconBlockHeader, Bytes32, Checkpoint, Eth1Data, ExecutionPayloadHeader, Fork, Gwei,
    HistoricalSummary, Slot, SyncCommittee, Validator, WithdrawalIndex, ValidatorIndex,
    bounds::{
        EpochsPerHistoricalVector, EpochsPerSlashingsVector, Eth1DataVotesLimit,
        HistoricalRootsLimit, JustificationBitsLength, SlotsPerHistoricalRoot,
        ValidatorRegistryLimit,
    },
};

container! {
    pub struct BeaconState {
        pub genesis_time: u64,
        pub genesis_validators_root: Root,
        pub slot: Slot,
        pub fork: Fork,
        pub latest_block_header: BeaconBlockHeader,
        pub block_roots: Vector<Root, SlotsPerHistoricalRoot>,
        pub state_roots: Vector<Root, SlotsPerHistoricalRoot>,
        pub historical_roots: List<Root, HistoricalRootsLimit>,
        pub eth1_data: Eth1Data,
        pub eth1_data_votes: List<Eth1Data, Eth1DataVotesLimit>,
        pub eth1_deposit_index: u64,
        pub validators: List<Validator, ValidatorRegistryLimit>,
        pub balances: List<Gwei, ValidatorRegistryLimit>,
        pub randao_mixes: Vector<Bytes32, EpochsPerHistoricalVector>,
        pub slashings: Vector<Gwei, EpochsPerSlashingsVector>,
        pub previous_epoch_participation: List<u8, ValidatorRegistryLimit>,
        pub current_epoch_participation: List<u8, ValidatorRegistryLimit>,
        pub justification_bits: BitVector<JustificationBitsLength>,
        pub previous_justified_checkpoint: Checkpoint,
        pub current_justified_checkpoint: Checkpoint,
        pub finalized_checkpoint: Checkpoint,
        pub inactivity_scores: List<u64, ValidatorRegistryLimit>,
        pub current_sync_committee: SyncCommittee,
        pub next_sync_committee: SyncCommittee,
        pub latest_execution_payload_header: ExecutionPayloadHeader,
        pub next_withdrawal_index: WithdrawalIndex,
        pub next_withdrawal_validator_index: ValidatorIndex,
        pub historical_summaries: List<HistoricalSummary, HistoricalRootsLimit>,
    }
}
