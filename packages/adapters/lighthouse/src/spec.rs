use std::fmt::Debug;

use presets::{Preset, PresetName};
use ssz_types::typenum::{
    U4, U8, U16, U32, U64, U512, U2048, U4096, U8192, U65536, Unsigned,
};

/// A preset expressed as type-level integers.
pub trait Spec: 'static + Default + Clone + Copy + Send + Sync + Debug + PartialEq + Eq {
    type SlotsPerHistoricalRoot: Bound;
    type EpochsPerHistoricalVector: Bound;
    type EpochsPerSlashingsVector: Bound;
    type SyncCommitteeSize: Bound;
    type MaxWithdrawalsPerPayload: Bound;
    type MaxBlobCommitmentsPerBlock: Bound;
    type SlotsPerEpoch: Bound;
    type EpochsPerEth1VotingPeriod: Bound;
    /// `SlotsPerEpoch * EpochsPerEth1VotingPeriod`
    type SlotsPerEth1VotingPeriod: Bound;

    const NAME: PresetName;

    fn preset() -> Preset {
        Preset {
            name: Self::NAME,
            slots_per_historical_root: Self::SlotsPerHistoricalRoot::to_usize(),
            epochs_per_historical_vector: Self::EpochsPerHistoricalVector::to_usize(),
            epochs_per_slashings_vector: Self::EpochsPerSlashingsVector::to_usize(),
            sync_committee_size: Self::SyncCommitteeSize::to_usize(),
            max_withdrawals_per_payload: Self::MaxWithdrawalsPerPayload::to_usize(),
            max_blob_commitments_per_block: Self::MaxBlobCommitmentsPerBlock::to_usize(),
            slots_per_epoch: Self::SlotsPerEpoch::to_usize(),
            epochs_per_eth1_voting_period: Self::EpochsPerEth1VotingPeriod::to_usize(),
        }
    }
}

pub trait Bound: Unsigned + Clone + Copy + Send + Sync + Debug + PartialEq + Eq + Default {}

impl<T: Unsigned + Clone + Copy + Send + Sync + Debug + PartialEq + Eq + Default> Bound for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MainnetSpec;

impl Spec for MainnetSpec {
    type SlotsPerHistoricalRoot = U8192;
    type EpochsPerHistoricalVector = U65536;
    type EpochsPerSlashingsVector = U8192;
    type SyncCommitteeSize = U512;
    type MaxWithdrawalsPerPayload = U16;
    type MaxBlobCommitmentsPerBlock = U4096;
    type SlotsPerEpoch = U32;
    type EpochsPerEth1VotingPeriod = U64;
    type SlotsPerEth1VotingPeriod = U2048;

    const NAME: PresetName = PresetName::Mainnet;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinimalSpec;

impl Spec for MinimalSpec {
    type SlotsPerHistoricalRoot = U64;
    type EpochsPerHistoricalVector = U64;
    type EpochsPerSlashingsVector = U64;
    type SyncCommitteeSize = U32;
    type MaxWithdrawalsPerPayload = U4;
    type MaxBlobCommitmentsPerBlock = U32;
    type SlotsPerEpoch = U8;
    type EpochsPerEth1VotingPeriod = U4;
    type SlotsPerEth1VotingPeriod = U32;

    const NAME: PresetName = PresetName::Minimal;
}
