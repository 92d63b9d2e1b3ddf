//! Deneb containers for the `ssz_rs` derive.
//!
//! Preset-dependent sizes are const generic parameters; the per-preset aliases live in
//! [`crate::mainnet`] and [`crate::minimal`].

use ssz_rs::prelude::*;

pub type Root = Node;
pub type Bytes32 = Vector<u8, 32>;
pub type Hash32 = Bytes32;
pub type Version = Vector<u8, 4>;
pub type BlsPubkey = Vector<u8, 48>;
pub type BlsSignature = Vector<u8, 96>;
pub type KzgCommitment = Vector<u8, 48>;
pub type ExecutionAddress = Vector<u8, 20>;
pub type LogsBloom = Vector<u8, 256>;
/// Little-endian, so the bytes and the packed chunk are the same as a 32-byte vector.
pub type Uint256 = Vector<u8, 32>;
pub type Transaction = List<u8, MAX_BYTES_PER_TRANSACTION>;

pub const MAX_VALIDATORS_PER_COMMITTEE: usize = 2048;
pub const HISTORICAL_ROOTS_LIMIT: usize = 16_777_216;
pub const VALIDATOR_REGISTRY_LIMIT: usize = 1_099_511_627_776;
pub const MAX_BYTES_PER_TRANSACTION: usize = 1_073_741_824;
pub const MAX_TRANSACTIONS_PER_PAYLOAD: usize = 1_048_576;
pub const MAX_EXTRA_DATA_BYTES: usize = 32;
pub const MAX_PROPOSER_SLASHINGS: usize = 16;
pub const MAX_ATTESTER_SLASHINGS: usize = 2;
pub const MAX_ATTESTATIONS: usize = 128;
pub const MAX_DEPOSITS: usize = 16;
pub const MAX_VOLUNTARY_EXITS: usize = 16;
pub const MAX_BLS_TO_EXECUTION_CHANGES: usize = 16;
pub const JUSTIFICATION_BITS_LENGTH: usize = 4;
/// Deposit contract tree depth plus the length mix-in.
pub const DEPOSIT_PROOF_LENGTH: usize = 33;

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Checkpoint {
    pub epoch: u64,
    pub root: Root,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct BeaconBlockHeader {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Eth1Data {
    pub deposit_root: Root,
    pub deposit_count: u64,
    pub block_hash: Hash32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Validator {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: Bytes32,
    pub effective_balance: u64,
    pub slashed: bool,
    pub activation_eligibility_epoch: u64,
    pub activation_epoch: u64,
    pub exit_epoch: u64,
    pub withdrawable_epoch: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SyncCommittee<const SYNC_COMMITTEE_SIZE: usize> {
    pub pubkeys: Vector<BlsPubkey, SYNC_COMMITTEE_SIZE>,
    pub aggregate_pubkey: BlsPubkey,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct HistoricalSummary {
    pub block_summary_root: Root,
    pub state_summary_root: Root,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct AttestationData {
    pub slot: u64,
    pub index: u64,
    pub beacon_block_root: Root,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Attestation {
    pub aggregation_bits: Bitlist<MAX_VALIDATORS_PER_COMMITTEE>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct IndexedAttestation {
    pub attesting_indices: List<u64, MAX_VALIDATORS_PER_COMMITTEE>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct DepositData {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: Bytes32,
    pub amount: u64,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Deposit {
    pub proof: Vector<Bytes32, DEPOSIT_PROOF_LENGTH>,
    pub data: DepositData,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct VoluntaryExit {
    pub epoch: u64,
    pub validator_index: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SyncAggregate<const SYNC_COMMITTEE_SIZE: usize> {
    pub sync_committee_bits: Bitvector<SYNC_COMMITTEE_SIZE>,
    pub sync_committee_signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct BlsToExecutionChange {
    pub validator_index: u64,
    pub from_bls_pubkey: BlsPubkey,
    pub to_execution_address: ExecutionAddress,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SignedBlsToExecutionChange {
    pub message: BlsToExecutionChange,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct Withdrawal {
    pub index: u64,
    pub validator_index: u64,
    pub address: ExecutionAddress,
    pub amount: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct ExecutionPayload<const MAX_WITHDRAWALS_PER_PAYLOAD: usize> {
    pub parent_hash: Hash32,
    pub fee_recipient: ExecutionAddress,
    pub state_root: Bytes32,
    pub receipts_root: Bytes32,
    pub logs_bloom: LogsBloom,
    pub prev_randao: Bytes32,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: List<u8, MAX_EXTRA_DATA_BYTES>,
    pub base_fee_per_gas: Uint256,
    pub block_hash: Hash32,
    pub transactions: List<Transaction, MAX_TRANSACTIONS_PER_PAYLOAD>,
    pub withdrawals: List<Withdrawal, MAX_WITHDRAWALS_PER_PAYLOAD>,
    pub blob_gas_used: u64,
    pub excess_blob_gas: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct ExecutionPayloadHeader {
    pub parent_hash: Hash32,
    pub fee_recipient: ExecutionAddress,
    pub state_root: Bytes32,
    pub receipts_root: Bytes32,
    pub logs_bloom: LogsBloom,
    pub prev_randao: Bytes32,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: List<u8, MAX_EXTRA_DATA_BYTES>,
    pub base_fee_per_gas: Uint256,
    pub block_hash: Hash32,
    pub transactions_root: Root,
    pub withdrawals_root: Root,
    pub blob_gas_used: u64,
    pub excess_blob_gas: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct BeaconBlockBody<
    const SYNC_COMMITTEE_SIZE: usize,
    const MAX_WITHDRAWALS_PER_PAYLOAD: usize,
    const MAX_BLOB_COMMITMENTS_PER_BLOCK: usize,
> {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Bytes32,
    pub proposer_slashings: List<ProposerSlashing, MAX_PROPOSER_SLASHINGS>,
    pub attester_slashings: List<AttesterSlashing, MAX_ATTESTER_SLASHINGS>,
    pub attestations: List<Attestation, MAX_ATTESTATIONS>,
    pub deposits: List<Deposit, MAX_DEPOSITS>,
    pub voluntary_exits: List<SignedVoluntaryExit, MAX_VOLUNTARY_EXITS>,
    pub sync_aggregate: SyncAggregate<SYNC_COMMITTEE_SIZE>,
    pub execution_payload: ExecutionPayload<MAX_WITHDRAWALS_PER_PAYLOAD>,
    pub bls_to_execution_changes: List<SignedBlsToExecutionChange, MAX_BLS_TO_EXECUTION_CHANGES>,
    pub blob_kzg_commitments: List<KzgCommitment, MAX_BLOB_COMMITMENTS_PER_BLOCK>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct BeaconBlock<
    const SYNC_COMMITTEE_SIZE: usize,
    const MAX_WITHDRAWALS_PER_PAYLOAD: usize,
    const MAX_BLOB_COMMITMENTS_PER_BLOCK: usize,
> {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Root,
    pub state_root: Root,
    pub body:
        BeaconBlockBody<SYNC_COMMITTEE_SIZE, MAX_WITHDRAWALS_PER_PAYLOAD, MAX_BLOB_COMMITMENTS_PER_BLOCK>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SignedBeaconBlock<
    const SYNC_COMMITTEE_SIZE: usize,
    const MAX_WITHDRAWALS_PER_PAYLOAD: usize,
    const MAX_BLOB_COMMITMENTS_PER_BLOCK: usize,
> {
    pub message:
        BeaconBlock<SYNC_COMMITTEE_SIZE, MAX_WITHDRAWALS_PER_PAYLOAD, MAX_BLOB_COMMITMENTS_PER_BLOCK>,
    pub signature: BlsSignature,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct BeaconState<
    const SLOTS_PER_HISTORICAL_ROOT: usize,
    const EPOCHS_PER_HISTORICAL_VECTOR: usize,
    const EPOCHS_PER_SLASHINGS_VECTOR: usize,
    const ETH1_DATA_VOTES_BOUND: usize,
    const SYNC_COMMITTEE_SIZE: usize,
> {
    pub genesis_time: u64,
    pub genesis_validators_root: Root,
    pub slot: u64,
    pub fork: Fork,
    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: Vector<Root, SLOTS_PER_HISTORICAL_ROOT>,
    pub state_roots: Vector<Root, SLOTS_PER_HISTORICAL_ROOT>,
    pub historical_roots: List<Root, HISTORICAL_ROOTS_LIMIT>,
    pub eth1_data: Eth1Data,
    pub eth1_data_votes: List<Eth1Data, ETH1_DATA_VOTES_BOUND>,
    pub eth1_deposit_index: u64,
    pub validators: List<Validator, VALIDATOR_REGISTRY_LIMIT>,
    pub balances: List<u64, VALIDATOR_REGISTRY_LIMIT>,
    pub randao_mixes: Vector<Bytes32, EPOCHS_PER_HISTORICAL_VECTOR>,
    pub slashings: Vector<u64, EPOCHS_PER_SLASHINGS_VECTOR>,
    pub previous_epoch_participation: List<u8, VALIDATOR_REGISTRY_LIMIT>,
    pub current_epoch_participation: List<u8, VALIDATOR_REGISTRY_LIMIT>,
    pub justification_bits: Bitvector<JUSTIFICATION_BITS_LENGTH>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
    pub inactivity_scores: List<u64, VALIDATOR_REGISTRY_LIMIT>,
    pub current_sync_committee: SyncCommittee<SYNC_COMMITTEE_SIZE>,
    pub next_sync_committee: SyncCommittee<SYNC_COMMITTEE_SIZE>,
    pub latest_execution_payload_header: ExecutionPayloadHeader,
    pub next_withdrawal_index: u64,
    pub next_withdrawal_validator_index: u64,
    pub historical_summaries: List<HistoricalSummary, HISTORICAL_ROOTS_LIMIT>,
}
