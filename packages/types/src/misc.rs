use ssz_bench_encoding::{Root, Vector, container};

use crate::{
    BlsPubkey, BlsSignature, Bytes32, Epoch, Gwei, Hash32, Slot, ValidatorIndex, Version,
    bounds::SyncCommitteeSize,
};

container! {
    pub struct Fork {
        pub previous_version: Version,
        pub current_version: Version,
        pub epoch: Epoch,
    }
}

container! {
    pub struct Checkpoint {
        pub epoch: Epoch,
        pub root: Root,
    }
}

container! {
    pub struct BeaconBlockHeader {
        pub slot: Slot,
        pub proposer_index: ValidatorIndex,
        pub parent_root: Root,
        pub state_root: Root,
        pub body_root: Root,
    }
}

container! {
    pub struct SignedBeaconBlockHeader {
        pub message: BeaconBlockHeader,
        pub signature: BlsSignature,
    }
}

container! {
    pub struct Eth1Data {
        pub deposit_root: Root,
        pub deposit_count: u64,
        pub block_hash: Hash32,
    }
}

container! {
    pub struct Validator {
        pub pubkey: BlsPubkey,
        pub withdrawal_credentials: Bytes32,
        pub effective_balance: Gwei,
        pub slashed: bool,
        pub activation_eligibility_epoch: Epoch,
        pub activation_epoch: Epoch,
        pub exit_epoch: Epoch,
        pub withdrawable_epoch: Epoch,
    }
}

container! {
    pub struct SyncCommittee {
        pub pubkeys: Vector<BlsPubkey, SyncCommitteeSize>,
        pub aggregate_pubkey: BlsPubkey,
    }
}

container! {
    pub struct HistoricalSummary {
        pub block_summary_root: Root,
        pub state_summary_root: Root,
    }
}
