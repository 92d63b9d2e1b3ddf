//! The Deneb beacon object graph.
//!
//! Every preset-dependent vector length and list limit is a marker type from [`bounds`], resolved
//! against the [`Preset`] passed to encode, decode and hash calls.

mod block;
pub mod bounds;
mod execution;
mod misc;
mod operations;
mod state;

pub use block::*;
pub use execution::*;
pub use misc::*;
pub use operations::*;
pub use presets::Preset;
pub use ssz_bench_encoding::{BitList, BitVector, Bitfield, List, Root, Ssz, Vector};
pub use state::*;

pub type Hash32 = [u8; 32];
pub type Bytes32 = [u8; 32];
pub type BlsPubkey = [u8; 48];
pub type BlsSignature = [u8; 96];
pub type ExecutionAddress = [u8; 20];
pub type KzgCommitment = [u8; 48];
pub type LogsBloom = [u8; 256];
/// Little-endian 256 bit unsigned integer.
pub type Uint256 = [u8; 32];
pub type Version = [u8; 4];

pub type Gwei = u64;
pub type Slot = u64;
pub type Epoch = u64;
pub type ValidatorIndex = u64;
pub type CommitteeIndex = u64;
pub type WithdrawalIndex = u64;

/// Deneb fork version.
pub const DENEB_FORK_VERSION: Version = [4, 0, 0, 0];

/// An object persisted as a benchmark fixture.
///
/// The digest stored next to a fixture is the hash tree root of [`FixtureObject::rooted`]: the
/// inner message for signed blocks, the whole object for states.
pub trait FixtureObject: Ssz + Clone + Send + Sync + 'static {
    type Rooted: Ssz;

    fn rooted(&self) -> &Self::Rooted;

    fn digest(&self, preset: &Preset) -> ssz_bench_encoding::Result<Root> {
        self.rooted().hash_tree_root(preset)
    }
}

impl FixtureObject for SignedBeaconBlock {
    type Rooted = BeaconBlock;

    fn rooted(&self) -> &Self::Rooted {
        &self.message
    }
}

impl FixtureObject for BeaconState {
    type Rooted = BeaconState;

    fn rooted(&self) -> &Self::Rooted {
        self
    }
}
