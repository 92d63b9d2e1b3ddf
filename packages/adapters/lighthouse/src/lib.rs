//! Codec under test built on `ethereum_ssz`, `ssz_types` and `tree_hash`, the SSZ crates used by
//! the Lighthouse client.

mod spec;
pub mod types;

use std::marker::PhantomData;

use harness::{
    Codec, Interfaces, Root,
    codec::{self, Error},
};
pub use spec::{Bound, MainnetSpec, MinimalSpec, Spec};
use ssz::{Decode, Encode};
use tree_hash::TreeHash;
pub use types::{BeaconBlock, BeaconState, SignedBeaconBlock};

pub const NAME: &str = "lighthouse";

/// An object whose digest is the root of `rooted()`.
pub trait Rooted: Encode + Decode {
    type Target: TreeHash;

    fn rooted(&self) -> &Self::Target;
}

impl<E: Spec> Rooted for SignedBeaconBlock<E> {
    type Target = BeaconBlock<E>;

    fn rooted(&self) -> &Self::Target {
        &self.message
    }
}

impl<E: Spec> Rooted for BeaconState<E> {
    type Target = Self;

    fn rooted(&self) -> &Self::Target {
        self
    }
}

pub type MainnetBlockCodec = LighthouseCodec<SignedBeaconBlock<MainnetSpec>>;
pub type MinimalBlockCodec = LighthouseCodec<SignedBeaconBlock<MinimalSpec>>;
pub type MainnetStateCodec = LighthouseCodec<BeaconState<MainnetSpec>>;
pub type MinimalStateCodec = LighthouseCodec<BeaconState<MinimalSpec>>;

pub struct LighthouseCodec<T> {
    _object: PhantomData<fn() -> T>,
}

impl<T> LighthouseCodec<T> {
    pub fn new() -> Self {
        Self {
            _object: PhantomData,
        }
    }
}

impl<T> Default for LighthouseCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Rooted> Codec for LighthouseCodec<T> {
    type Object = T;

    fn name(&self) -> &'static str {
        NAME
    }

    /// `ssz_append` is the only native variant; reader and writer phases are skipped.
    fn interfaces(&self) -> Interfaces {
        Interfaces {
            buffer: true,
            ..Interfaces::NONE
        }
    }

    fn decode(&self, bytes: &[u8]) -> codec::Result<T> {
        T::from_ssz_bytes(bytes).map_err(|e| Error::Decode(format!("{e:?}")))
    }

    fn encode(&self, object: &T) -> codec::Result<Vec<u8>> {
        Ok(object.as_ssz_bytes())
    }

    fn hash_tree_root(&self, object: &T) -> codec::Result<Root> {
        Ok(object.rooted().tree_hash_root().0)
    }

    fn encode_buffer(&self, object: &T, buffer: &mut Vec<u8>) -> codec::Result<()> {
        object.ssz_append(buffer);
        Ok(())
    }
}
