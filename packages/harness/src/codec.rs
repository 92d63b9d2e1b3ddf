//! The capability interface every codec under test implements.

use std::io::{Read, Write};

use crate::Root;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("hash tree root failed: {0}")]
    HashTreeRoot(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Optional entry points a codec implements natively.
///
/// Phases for interfaces a codec does not advertise are skipped rather than measured through the
/// default adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interfaces {
    /// Decoding straight from a bounded reader.
    pub reader: bool,
    /// Encoding straight into a writer.
    pub writer: bool,
    /// Encoding into a caller-owned growable buffer.
    pub buffer: bool,
}

impl Interfaces {
    pub const NONE: Interfaces = Interfaces {
        reader: false,
        writer: false,
        buffer: false,
    };

    pub const ALL: Interfaces = Interfaces {
        reader: true,
        writer: true,
        buffer: true,
    };
}

pub trait Codec {
    type Object;

    /// Library name, used as the results file stem.
    fn name(&self) -> &'static str;

    fn interfaces(&self) -> Interfaces {
        Interfaces::NONE
    }

    fn decode(&self, bytes: &[u8]) -> Result<Self::Object>;

    fn encode(&self, object: &Self::Object) -> Result<Vec<u8>>;

    /// Root of the object's digest target: the inner message of a signed block, the whole state.
    fn hash_tree_root(&self, object: &Self::Object) -> Result<Root>;

    fn decode_reader(&self, reader: &mut dyn Read, len: usize) -> Result<Self::Object> {
        let mut bytes = vec![0; len];
        reader.read_exact(&mut bytes)?;
        self.decode(&bytes)
    }

    fn encode_writer(&self, object: &Self::Object, writer: &mut dyn Write) -> Result<()> {
        let bytes = self.encode(object)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Appends the encoding of `object` to `buffer`.
    fn encode_buffer(&self, object: &Self::Object, buffer: &mut Vec<u8>) -> Result<()> {
        let bytes = self.encode(object)?;
        buffer.extend_from_slice(&bytes);
        Ok(())
    }
}
