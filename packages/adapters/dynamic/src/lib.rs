//! The in-workspace SSZ implementation, both as the reference that produces fixtures and
//! digests and as one of the codecs under test.
//!
//! Bounds come from a [`Preset`] value held by the adapter, so the same compiled code serves
//! every preset, including ones read from YAML at runtime.

use std::{
    io::{Read, Write},
    marker::PhantomData,
};

use beacon_types::FixtureObject;
use harness::{
    Codec, Interfaces, Root,
    codec::{self, Error},
};
use presets::Preset;

pub const NAME: &str = "dynamic";

/// Produces the canonical bytes and ground-truth digest of generated objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    preset: Preset,
}

impl Reference {
    pub fn new(preset: Preset) -> Self {
        Self { preset }
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn encode<T: FixtureObject>(&self, object: &T) -> ssz_bench_encoding::Result<Vec<u8>> {
        object.encode(&self.preset)
    }

    /// Root of the inner message of a signed block, or of the whole state.
    pub fn digest<T: FixtureObject>(&self, object: &T) -> ssz_bench_encoding::Result<Root> {
        object.digest(&self.preset)
    }
}

pub struct DynamicCodec<T> {
    preset: Preset,
    _object: PhantomData<fn() -> T>,
}

impl<T> DynamicCodec<T> {
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            _object: PhantomData,
        }
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }
}

fn decode_error(error: ssz_bench_encoding::Error) -> Error {
    match error {
        ssz_bench_encoding::Error::Io(reason) => Error::Io(reason),
        other => Error::Decode(other.to_string()),
    }
}

fn encode_error(error: ssz_bench_encoding::Error) -> Error {
    match error {
        ssz_bench_encoding::Error::Io(reason) => Error::Io(reason),
        other => Error::Encode(other.to_string()),
    }
}

impl<T: FixtureObject> Codec for DynamicCodec<T> {
    type Object = T;

    fn name(&self) -> &'static str {
        NAME
    }

    fn interfaces(&self) -> Interfaces {
        Interfaces::ALL
    }

    fn decode(&self, bytes: &[u8]) -> codec::Result<T> {
        T::decode(bytes, &self.preset).map_err(decode_error)
    }

    fn encode(&self, object: &T) -> codec::Result<Vec<u8>> {
        object.encode(&self.preset).map_err(encode_error)
    }

    fn hash_tree_root(&self, object: &T) -> codec::Result<Root> {
        object
            .digest(&self.preset)
            .map_err(|e| Error::HashTreeRoot(e.to_string()))
    }

    fn decode_reader(&self, reader: &mut dyn Read, len: usize) -> codec::Result<T> {
        T::decode_from_reader(reader, len, &self.preset).map_err(decode_error)
    }

    fn encode_writer(&self, object: &T, writer: &mut dyn Write) -> codec::Result<()> {
        object.write_to(&self.preset, writer).map_err(encode_error)
    }

    fn encode_buffer(&self, object: &T, buffer: &mut Vec<u8>) -> codec::Result<()> {
        object.encode_to(&self.preset, buffer).map_err(encode_error)
    }
}
