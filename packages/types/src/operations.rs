use ssz_bench_encoding::{BitList, BitVector, List, Root, Vector, container};

use crate::{
    BlsPubkey, BlsSignature, Bytes32, CommitteeIndex, Epoch, ExecutionAddress, Gwei,
    SignedBeaconBlockHeader, Slot, ValidatorIndex,
    bounds::{DepositProofLength, MaxValidatorsPerCommittee, SyncCommitteeSize},
    misc::Checkpoint,
};

container! {
    pub struct AttestationData {
        pub slot: Slot,
        pub index: CommitteeIndex,
        pub beacon_block_root: Root,
        pub source: Checkpoint,
        pub target: Checkpoint,
    }
}

container! {
    pub struct Attestation {
        pub aggregation_bits: BitList<MaxValidatorsPerCommittee>,
        pub data: AttestationData,
        pub signature: BlsSignature,
    }
}

container! {
    pub struct IndexedAttestation {
        pub attesting_indices: List<ValidatorIndex, MaxValidatorsPerCommittee>,
        pub data: AttestationData,
        pub signature: BlsSignature,
    }
}

container! {
    pub struct ProposerSlashing {
        pub signed_header_1: SignedBeaconBlockHeader,
        pub signed_header_2: SignedBeaconBlockHeader,
    }
}

container! {
    pub struct AttesterSlashing {
        pub attestation_1: IndexedAttestation,
        pub attestation_2: IndexedAttestation,
    }
}

container! {
    pub struct DepositData {
        pub pubkey: BlsPubkey,
        pub withdrawal_credentials: Bytes32,
        pub amount: Gwei,
        pub signature: BlsSignature,
    }
}

container! {
    pub struct Deposit {
        pub proof: Vector<Bytes32, DepositProofLength>,
        pub data: DepositData,
    }
}

container! {
    pub struct VoluntaryExit {
        pub epoch: Epoch,
        pub validator_index: ValidatorIndex,
    }
}

container! {
    pub struct SignedVoluntaryExit {
        pub message: VoluntaryExit,
        pub signature: BlsSignature,
    }
}

container! {
    pub struct SyncAggregate {
        pub sync_committee_bits: BitVector<SyncCommitteeSize>,
        pub sync_committee_signature: BlsSignature,
    }
}

container! {
    pub struct BlsToExecutionChange {
        pub validator_index: ValidatorIndex,
        pub from_bls_pubkey: BlsPubkey,
        pub to_execution_address: ExecutionAddress,
    }
}

container! {
    pub struct SignedBlsToExecutionChange {
        pub message: BlsToExecutionChange,
        pub signature: BlsSignature,
    }
}
