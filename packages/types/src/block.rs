use ssz_bench_encoding::{List, Root, container};

use crate::{
    Attestation, AttesterSlashing, BlsSignature, Bytes32, Deposit, Eth1Data, ExecutionPayload,
    KzgCommitment, ProposerSlashing, SignedBlsToExecutionChange, SignedVoluntaryExit, Slot,
    SyncAggregate, ValidatorIndex,
    bounds::{
        MaxAttestations, MaxAttesterSlashings, MaxBlobCommitmentsPerBlock,
        MaxBlsToExecutionChanges, MaxDeposits, MaxProposerSlashings, MaxVoluntaryExits,
    },
};

container! {
    pub struct BeaconBlockBody {
        pub randao_reveal: BlsSignature,
        pub eth1_data: Eth1Data,
        pub graffiti: Bytes32,
        pub proposer_slashings: List<ProposerSlashing, MaxProposerSlashings>,
        pub attester_slashings: List<AttesterSlashing, MaxAttesterSlashings>,
        pub attestations: List<Attestation, MaxAttestations>,
        pub deposits: List<Deposit, MaxDeposits>,
        pub voluntary_exits: List<SignedVoluntaryExit, MaxVoluntaryExits>,
        pub sync_aggregate: SyncAggregate,
        pub execution_payload: ExecutionPayload,
        pub bls_to_execution_changes: List<SignedBlsToExecutionChange, MaxBlsToExecutionChanges>,
        pub blob_kzg_commitments: List<KzgCommitment, MaxBlobCommitmentsPerBlock>,
    }
}

container! {
    pub struct BeaconBlock {
        pub slot: Slot,
        pub proposer_index: ValidatorIndex,
        pub parent_root: Root,
        pub state_root: Root,
        pub body: BeaconBlockBody,
    }
}

container! {
    pub struct SignedBeaconBlock {
        pub message: BeaconBlock,
        pub signature: BlsSignature,
    }
}
