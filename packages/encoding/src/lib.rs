//! SSZ encoding, decoding and hash-tree-root for the types of the beacon object graph.
//!
//! Every bound that differs between presets is resolved against an explicit [`Preset`] argument,
//! so the same value can be encoded for `mainnet` and `minimal` without any process-wide state.

use std::io::{Read, Write};

mod basic;
mod bitfield;
mod collections;
pub mod container;
pub mod merkle;

pub use bitfield::{BitList, BitVector, Bitfield};
pub use collections::{Const, Length, List, Vector};
pub use presets::Preset;

pub(crate) mod constants {
    pub const BYTES_PER_CHUNK: usize = 32;
    pub const BYTES_PER_LENGTH_OFFSET: usize = 4;
    pub const BITS_PER_CHUNK: usize = BYTES_PER_CHUNK * 8;
}

pub use constants::{BYTES_PER_CHUNK, BYTES_PER_LENGTH_OFFSET};

/// A 32 byte merkle root.
pub type Root = [u8; 32];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("{got} elements exceed the limit of {limit}")]
    LimitExceeded { limit: usize, got: usize },
    #[error("expected {expected} bytes, got {got}")]
    InvalidByteLength { expected: usize, got: usize },
    #[error("invalid offset {offset}: {reason}")]
    InvalidOffset { offset: usize, reason: &'static str },
    #[error("offset {0} does not fit into {BYTES_PER_LENGTH_OFFSET} bytes")]
    OffsetOverflow(usize),
    #[error("bit list is missing its delimiter bit")]
    MissingDelimiter,
    #[error("bits are set beyond the bit length {len}")]
    TrailingBits { len: usize },
    #[error("bit index {index} out of bounds for length {len}")]
    BitOutOfBounds { index: usize, len: usize },
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A type with an SSZ representation.
///
/// Sizes of preset-dependent vectors and limits of preset-dependent lists are looked up in the
/// `preset` handed to each call. Encoding and hashing validate those bounds instead of trusting
/// the in-memory value, since an undersized vector would silently produce a different root.
pub trait Ssz: Sized {
    /// Unsigned integers and booleans pack several values into one chunk when merkleized.
    const PACKED: bool = false;

    /// Length of the serialization if it is the same for every value, `None` for variable-size
    /// types.
    fn fixed_len(preset: &Preset) -> Option<usize>;

    fn encoded_len(&self, preset: &Preset) -> usize;

    /// Appends the serialization of `self` to `out`.
    fn encode_to(&self, preset: &Preset, out: &mut Vec<u8>) -> Result<()>;

    /// Streams the serialization of `self` into `writer` without materializing it first.
    fn write_to<W: Write + ?Sized>(&self, preset: &Preset, writer: &mut W) -> Result<()>;

    fn decode(bytes: &[u8], preset: &Preset) -> Result<Self>;

    fn hash_tree_root(&self, preset: &Preset) -> Result<Root>;

    fn encode(&self, preset: &Preset) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len(preset));
        self.encode_to(preset, &mut out)?;
        Ok(out)
    }

    /// Reads exactly `len` bytes from `reader` and decodes them.
    fn decode_from_reader<R: Read + ?Sized>(
        reader: &mut R,
        len: usize,
        preset: &Preset,
    ) -> Result<Self> {
        let mut buffer = vec![0; len];
        reader.read_exact(&mut buffer)?;
        Self::decode(&buffer, preset)
    }
}

fn expect_len(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(Error::InvalidByteLength {
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}
