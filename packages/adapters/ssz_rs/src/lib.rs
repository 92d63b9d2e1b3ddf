//! Codec under test built on `ssz_rs`, the const-generic SSZ crate used by
//! `ethereum-consensus`.

pub mod types;

use std::marker::PhantomData;

use harness::{
    Codec, Interfaces, Root,
    codec::{self, Error},
};
use ssz_rs::{Deserialize, Merkleized, Serialize, SimpleSerialize};

pub const NAME: &str = "ssz_rs";

macro_rules! preset_types {
    ($module:ident, $preset:expr) => {
        /// Containers and codecs with the sizes of one preset.
        pub mod $module {
            use presets::Preset;

            use crate::{SszRsCodec, types};

            pub const PRESET: Preset = $preset;

            pub const SLOTS_PER_HISTORICAL_ROOT: usize = PRESET.slots_per_historical_root;
            pub const EPOCHS_PER_HISTORICAL_VECTOR: usize = PRESET.epochs_per_historical_vector;
            pub const EPOCHS_PER_SLASHINGS_VECTOR: usize = PRESET.epochs_per_slashings_vector;
            pub const SYNC_COMMITTEE_SIZE: usize = PRESET.sync_committee_size;
            pub const MAX_WITHDRAWALS_PER_PAYLOAD: usize = PRESET.max_withdrawals_per_payload;
            pub const MAX_BLOB_COMMITMENTS_PER_BLOCK: usize = PRESET.max_blob_commitments_per_block;
            pub const ETH1_DATA_VOTES_BOUND: usize = PRESET.eth1_data_votes_limit();

            pub type BeaconBlock = types::BeaconBlock<
                SYNC_COMMITTEE_SIZE,
                MAX_WITHDRAWALS_PER_PAYLOAD,
                MAX_BLOB_COMMITMENTS_PER_BLOCK,
            >;
            pub type SignedBeaconBlock = types::SignedBeaconBlock<
                SYNC_COMMITTEE_SIZE,
                MAX_WITHDRAWALS_PER_PAYLOAD,
                MAX_BLOB_COMMITMENTS_PER_BLOCK,
            >;
            pub type BeaconState = types::BeaconState<
                SLOTS_PER_HISTORICAL_ROOT,
                EPOCHS_PER_HISTORICAL_VECTOR,
                EPOCHS_PER_SLASHINGS_VECTOR,
                ETH1_DATA_VOTES_BOUND,
                SYNC_COMMITTEE_SIZE,
            >;

            pub type BlockCodec = SszRsCodec<SignedBeaconBlock>;
            pub type StateCodec = SszRsCodec<BeaconState>;
        }
    };
}

preset_types!(mainnet, presets::Preset::MAINNET);
preset_types!(minimal, presets::Preset::MINIMAL);

/// An object whose digest is the root of `rooted()`.
pub trait Rooted: SimpleSerialize + Clone {
    type Target: Merkleized + Clone;

    fn rooted(&self) -> &Self::Target;
}

impl<const A: usize, const B: usize, const C: usize> Rooted for types::SignedBeaconBlock<A, B, C> {
    type Target = types::BeaconBlock<A, B, C>;

    fn rooted(&self) -> &Self::Target {
        &self.message
    }
}

impl<const A: usize, const B: usize, const C: usize, const D: usize, const E: usize> Rooted
    for types::BeaconState<A, B, C, D, E>
{
    type Target = Self;

    fn rooted(&self) -> &Self::Target {
        self
    }
}

#[derive(Debug)]
pub struct SszRsCodec<T> {
    _object: PhantomData<fn() -> T>,
}

impl<T> SszRsCodec<T> {
    pub fn new() -> Self {
        Self {
            _object: PhantomData,
        }
    }
}

impl<T> Default for SszRsCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Rooted> Codec for SszRsCodec<T> {
    type Object = T;

    fn name(&self) -> &'static str {
        NAME
    }

    /// `Serialize::serialize` appends to a caller's buffer; there is no reader or writer API.
    fn interfaces(&self) -> Interfaces {
        Interfaces {
            buffer: true,
            ..Interfaces::NONE
        }
    }

    fn decode(&self, bytes: &[u8]) -> codec::Result<T> {
        <T as Deserialize>::deserialize(bytes).map_err(|e| Error::Decode(format!("{e:?}")))
    }

    fn encode(&self, object: &T) -> codec::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode_buffer(object, &mut buffer)?;
        Ok(buffer)
    }

    /// `Merkleized::hash_tree_root` takes `&mut self`, so this phase includes one clone of the
    /// rooted container.
    fn hash_tree_root(&self, object: &T) -> codec::Result<Root> {
        let mut target = object.rooted().clone();
        let node = target
            .hash_tree_root()
            .map_err(|e| Error::HashTreeRoot(format!("{e:?}")))?;

        Root::try_from(node.as_ref()).map_err(|e| Error::HashTreeRoot(e.to_string()))
    }

    fn encode_buffer(&self, object: &T, buffer: &mut Vec<u8>) -> codec::Result<()> {
        Serialize::serialize(object, buffer)
            .map(|_| ())
            .map_err(|e| Error::Encode(format!("{e:?}")))
    }
}
