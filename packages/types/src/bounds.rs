//! Vector lengths and list limits of the object graph.

use presets::Preset;
use ssz_bench_encoding::{Const, Length};

pub const MAX_PROPOSER_SLASHINGS: usize = 16;
pub const MAX_ATTESTER_SLASHINGS: usize = 2;
pub const MAX_ATTESTATIONS: usize = 128;
pub const MAX_DEPOSITS: usize = 16;
pub const MAX_VOLUNTARY_EXITS: usize = 16;
pub const MAX_BLS_TO_EXECUTION_CHANGES: usize = 16;

pub const MAX_VALIDATORS_PER_COMMITTEE: usize = 2048;
pub const DEPOSIT_CONTRACT_TREE_DEPTH: usize = 32;
pub const JUSTIFICATION_BITS_LENGTH: usize = 4;

pub const HISTORICAL_ROOTS_LIMIT: usize = 1 << 24;
pub const VALIDATOR_REGISTRY_LIMIT: usize = 1 << 40;

pub const MAX_BYTES_PER_TRANSACTION: usize = 1 << 30;
pub const MAX_TRANSACTIONS_PER_PAYLOAD: usize = 1 << 20;
pub const MAX_EXTRA_DATA_BYTES: usize = 32;

pub type MaxProposerSlashings = Const<MAX_PROPOSER_SLASHINGS>;
pub type MaxAttesterSlashings = Const<MAX_ATTESTER_SLASHINGS>;
pub type MaxAttestations = Const<MAX_ATTESTATIONS>;
pub type MaxDeposits = Const<MAX_DEPOSITS>;
pub type MaxVoluntaryExits = Const<MAX_VOLUNTARY_EXITS>;
pub type MaxBlsToExecutionChanges = Const<MAX_BLS_TO_EXECUTION_CHANGES>;
pub type MaxValidatorsPerCommittee = Const<MAX_VALIDATORS_PER_COMMITTEE>;
/// Merkle branch of a deposit, one extra node for the mixed in deposit count.
pub type DepositProofLength = Const<{ DEPOSIT_CONTRACT_TREE_DEPTH + 1 }>;
pub type JustificationBitsLength = Const<JUSTIFICATION_BITS_LENGTH>;
pub type HistoricalRootsLimit = Const<HISTORICAL_ROOTS_LIMIT>;
pub type ValidatorRegistryLimit = Const<VALIDATOR_REGISTRY_LIMIT>;
pub type MaxBytesPerTransaction = Const<MAX_BYTES_PER_TRANSACTION>;
pub type MaxTransactionsPerPayload = Const<MAX_TRANSACTIONS_PER_PAYLOAD>;
pub type MaxExtraDataBytes = Const<MAX_EXTRA_DATA_BYTES>;

macro_rules! preset_bounds {
    ($($(#[$meta:meta])* $name:ident => $field:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $name;

            impl Length for $name {
                fn length(preset: &Preset) -> usize {
                    preset.$field
                }
            }
        )*
    };
}

preset_bounds! {
    SlotsPerHistoricalRoot => slots_per_historical_root;
    EpochsPerHistoricalVector => epochs_per_historical_vector;
    EpochsPerSlashingsVector => epochs_per_slashings_vector;
    SyncCommitteeSize => sync_committee_size;
    MaxWithdrawalsPerPayload => max_withdrawals_per_payload;
    MaxBlobCommitmentsPerBlock => max_blob_commitments_per_block;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Eth1DataVotesLimit;

impl Length for Eth1DataVotesLimit {
    fn length(preset: &Preset) -> usize {
        preset.eth1_data_votes_limit()
    }
}
