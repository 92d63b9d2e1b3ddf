//! Deneb containers in the shape the sigp derives expect.
//!
//! Preset-dependent sizes come from the `E: Spec` parameter, everything else is a fixed
//! protocol bound.

use ssz_derive::{Decode, Encode};
use ssz_types::{
    BitList, BitVector, FixedVector, VariableList,
    typenum::{
        U2, U4, U16, U20, U32, U33, U48, U96, U128, U256, U2048, U1048576, U16777216,
        U1073741824, U1099511627776,
    },
};
use tree_hash::Hash256;
use tree_hash_derive::TreeHash;

use crate::Spec;

pub type Root = Hash256;
pub type Hash32 = Hash256;
pub type Bytes32 = Hash256;
pub type Version = FixedVector<u8, U4>;
pub type BlsPubkey = FixedVector<u8, U48>;
pub type BlsSignature = FixedVector<u8, U96>;
pub type KzgCommitment = FixedVector<u8, U48>;
pub type ExecutionAddress = FixedVector<u8, U20>;
pub type LogsBloom = FixedVector<u8, U256>;
/// Little-endian, so the bytes and the packed chunk are the same as a 32-byte vector.
pub type Uint256 = FixedVector<u8, U32>;
pub type Transaction = VariableList<u8, U1073741824>;

type MaxValidatorsPerCommittee = U2048;
type HistoricalRootsLimit = U16777216;
type ValidatorRegistryLimit = U1099511627776;
type MaxTransactionsPerPayload = U1048576;
type MaxExtraDataBytes = U32;
/// Deposit contract tree depth plus the length mix-in.
type DepositProofLength = U33;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct Checkpoint {
    pub epoch: u64,
    pub root: Root,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct BeaconBlockHeader {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct Eth1Data {
    pub deposit_root: Root,
    pub deposit_count: u64,
    pub block_hash: Hash32,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
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

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct SyncCommittee<E: Spec> {
    pub pubkeys: FixedVector<BlsPubkey, E::SyncCommitteeSize>,
    pub aggregate_pubkey: BlsPubkey,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct HistoricalSummary {
    pub block_summary_root: Root,
    pub state_summary_root: Root,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct AttestationData {
    pub slot: u64,
    pub index: u64,
    pub beacon_block_root: Root,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct Attestation {
    pub aggregation_bits: BitList<MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct IndexedAttestation {
    pub attesting_indices: VariableList<u64, MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct DepositData {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: Bytes32,
    pub amount: u64,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct Deposit {
    pub proof: FixedVector<Bytes32, DepositProofLength>,
    pub data: DepositData,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct VoluntaryExit {
    pub epoch: u64,
    pub validator_index: u64,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct SyncAggregate<E: Spec> {
    pub sync_committee_bits: BitVector<E::SyncCommitteeSize>,
    pub sync_committee_signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct BlsToExecutionChange {
    pub validator_index: u64,
    pub from_bls_pubkey: BlsPubkey,
    pub to_execution_address: ExecutionAddress,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct SignedBlsToExecutionChange {
    pub message: BlsToExecutionChange,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct Withdrawal {
    pub index: u64,
    pub validator_index: u64,
    pub address: ExecutionAddress,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct ExecutionPayload<E: Spec> {
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
    pub extra_data: VariableList<u8, MaxExtraDataBytes>,
    pub base_fee_per_gas: Uint256,
    pub block_hash: Hash32,
    pub transactions: VariableList<Transaction, MaxTransactionsPerPayload>,
    pub withdrawals: VariableList<Withdrawal, E::MaxWithdrawalsPerPayload>,
    pub blob_gas_used: u64,
    pub excess_blob_gas: u64,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
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
    pub extra_data: VariableList<u8, MaxExtraDataBytes>,
    pub base_fee_per_gas: Uint256,
    pub block_hash: Hash32,
    pub transactions_root: Root,
    pub withdrawals_root: Root,
    pub blob_gas_used: u64,
    pub excess_blob_gas: u64,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct BeaconBlockBody<E: Spec> {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Bytes32,
    pub proposer_slashings: VariableList<ProposerSlashing, U16>,
    pub attester_slashings: VariableList<AttesterSlashing, U2>,
    pub attestations: VariableList<Attestation, U128>,
    pub deposits: VariableList<Deposit, U16>,
    pub voluntary_exits: VariableList<SignedVoluntaryExit, U16>,
    pub sync_aggregate: SyncAggregate<E>,
    pub execution_payload: ExecutionPayload<E>,
    pub bls_to_execution_changes: VariableList<SignedBlsToExecutionChange, U16>,
    pub blob_kzg_commitments: VariableList<KzgCommitment, E::MaxBlobCommitmentsPerBlock>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct BeaconBlock<E: Spec> {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Root,
    pub state_root: Root,
    pub body: BeaconBlockBody<E>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct SignedBeaconBlock<E: Spec> {
    pub message: BeaconBlock<E>,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash)]
pub struct BeaconState<E: Spec> {
    pub genesis_time: u64,
    pub genesis_validators_root: Root,
    pub slot: u64,
    pub fork: Fork,
    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: FixedVector<Root, E::SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<Root, E::SlotsPerHistoricalRoot>,
    pub historical_roots: VariableList<Root, HistoricalRootsLimit>,
    pub eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1Data, E::SlotsPerEth1VotingPeriod>,
    pub eth1_deposit_index: u64,
    pub validators: VariableList<Validator, ValidatorRegistryLimit>,
    pub balances: VariableList<u64, ValidatorRegistryLimit>,
    pub randao_mixes: FixedVector<Bytes32, E::EpochsPerHistoricalVector>,
    pub slashings: FixedVector<u64, E::EpochsPerSlashingsVector>,
    pub previous_epoch_participation: VariableList<u8, ValidatorRegistryLimit>,
    pub current_epoch_participation: VariableList<u8, ValidatorRegistryLimit>,
    pub justification_bits: BitVector<U4>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
    pub inactivity_scores: VariableList<u64, ValidatorRegistryLimit>,
    pub current_sync_committee: SyncCommittee<E>,
    pub next_sync_committee: SyncCommittee<E>,
    pub latest_execution_payload_header: ExecutionPayloadHeader,
    pub next_withdrawal_index: u64,
    pub next_withdrawal_validator_index: u64,
    pub historical_summaries: VariableList<HistoricalSummary, HistoricalRootsLimit>,
}
