use std::{
    io::Write,
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

use crate::{
    Error, Preset, Result, Root, Ssz,
    constants::BYTES_PER_LENGTH_OFFSET,
    expect_len,
    merkle::{chunk_count, merkleize, mix_in_length, pack},
};

/// A length or limit that is either fixed by the protocol or taken from the preset.
pub trait Length {
    fn length(preset: &Preset) -> usize;
}

/// A length that does not depend on the preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Const<const N: usize>;

impl<const N: usize> Length for Const<N> {
    fn length(_: &Preset) -> usize {
        N
    }
}

/// A homogeneous sequence of exactly `N::length(preset)` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector<T, N> {
    items: Vec<T>,
    _bound: PhantomData<N>,
}

/// A homogeneous sequence of at most `N::length(preset)` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T, N> {
    items: Vec<T>,
    _bound: PhantomData<N>,
}

macro_rules! sequence_impls {
    ($sequence:ident) => {
        impl<T, N> $sequence<T, N> {
            pub fn new(items: Vec<T>) -> Self {
                Self {
                    items,
                    _bound: PhantomData,
                }
            }

            pub fn into_inner(self) -> Vec<T> {
                self.items
            }
        }

        impl<T, N> Default for $sequence<T, N> {
            fn default() -> Self {
                Self::new(Vec::new())
            }
        }

        impl<T, N> From<Vec<T>> for $sequence<T, N> {
            fn from(items: Vec<T>) -> Self {
                Self::new(items)
            }
        }

        impl<T, N> FromIterator<T> for $sequence<T, N> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                Self::new(iter.into_iter().collect())
            }
        }

        impl<T, N> Deref for $sequence<T, N> {
            type Target = Vec<T>;

            fn deref(&self) -> &Self::Target {
                &self.items
            }
        }

        impl<T, N> DerefMut for $sequence<T, N> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.items
            }
        }
    };
}

sequence_impls!(Vector);
sequence_impls!(List);

impl<T: Ssz, N: Length> Vector<T, N> {
    fn check_length(&self, preset: &Preset) -> Result<()> {
        let expected = N::length(preset);
        if self.items.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                got: self.items.len(),
            });
        }
        Ok(())
    }
}

impl<T: Ssz, N: Length> Ssz for Vector<T, N> {
    fn fixed_len(preset: &Preset) -> Option<usize> {
        T::fixed_len(preset).map(|size| size * N::length(preset))
    }

    fn encoded_len(&self, preset: &Preset) -> usize {
        items_len(&self.items, preset)
    }

    fn encode_to(&self, preset: &Preset, out: &mut Vec<u8>) -> Result<()> {
        self.check_length(preset)?;
        encode_items(&self.items, preset, out)
    }

    fn write_to<W: Write + ?Sized>(&self, preset: &Preset, writer: &mut W) -> Result<()> {
        self.check_length(preset)?;
        write_items(&self.items, preset, writer)
    }

    fn decode(bytes: &[u8], preset: &Preset) -> Result<Self> {
        let expected = N::length(preset);
        if let Some(size) = T::fixed_len(preset) {
            expect_len(bytes, size * expected)?;
        }

        let items = decode_items(bytes, preset, expected)?;
        if items.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                got: items.len(),
            });
        }

        Ok(Self::new(items))
    }

    fn hash_tree_root(&self, preset: &Preset) -> Result<Root> {
        self.check_length(preset)?;
        items_root(&self.items, preset, N::length(preset))
    }
}

impl<T: Ssz, N: Length> List<T, N> {
    fn check_limit(&self, preset: &Preset) -> Result<()> {
        let limit = N::length(preset);
        if self.items.len() > limit {
            return Err(Error::LimitExceeded {
                limit,
                got: self.items.len(),
            });
        }
        Ok(())
    }
}

impl<T: Ssz, N: Length> Ssz for List<T, N> {
    fn fixed_len(_: &Preset) -> Option<usize> {
        None
    }

    fn encoded_len(&self, preset: &Preset) -> usize {
        items_len(&self.items, preset)
    }

    fn encode_to(&self, preset: &Preset, out: &mut Vec<u8>) -> Result<()> {
        self.check_limit(preset)?;
        encode_items(&self.items, preset, out)
    }

    fn write_to<W: Write + ?Sized>(&self, preset: &Preset, writer: &mut W) -> Result<()> {
        self.check_limit(preset)?;
        write_items(&self.items, preset, writer)
    }

    fn decode(bytes: &[u8], preset: &Preset) -> Result<Self> {
        let items = decode_items(bytes, preset, N::length(preset))?;
        Ok(Self::new(items))
    }

    fn hash_tree_root(&self, preset: &Preset) -> Result<Root> {
        self.check_limit(preset)?;
        let root = items_root(&self.items, preset, N::length(preset))?;
        Ok(mix_in_length(&root, self.items.len()))
    }
}

pub(crate) fn offset_bytes(offset: usize) -> Result<[u8; BYTES_PER_LENGTH_OFFSET]> {
    u32::try_from(offset)
        .map(u32::to_le_bytes)
        .map_err(|_| Error::OffsetOverflow(offset))
}

pub(crate) fn read_offset(bytes: &[u8], at: usize) -> Result<usize> {
    let end = at + BYTES_PER_LENGTH_OFFSET;
    let Some(raw) = bytes.get(at..end) else {
        return Err(Error::InvalidByteLength {
            expected: end,
            got: bytes.len(),
        });
    };

    let mut le = [0; BYTES_PER_LENGTH_OFFSET];
    le.copy_from_slice(raw);
    Ok(u32::from_le_bytes(le) as usize)
}

fn items_len<T: Ssz>(items: &[T], preset: &Preset) -> usize {
    match T::fixed_len(preset) {
        Some(size) => size * items.len(),
        None => items
            .iter()
            .map(|item| BYTES_PER_LENGTH_OFFSET + item.encoded_len(preset))
            .sum(),
    }
}

fn encode_items<T: Ssz>(items: &[T], preset: &Preset, out: &mut Vec<u8>) -> Result<()> {
    if T::fixed_len(preset).is_none() {
        let mut offset = items.len() * BYTES_PER_LENGTH_OFFSET;
        for item in items {
            out.extend_from_slice(&offset_bytes(offset)?);
            offset += item.encoded_len(preset);
        }
    }

    for item in items {
        item.encode_to(preset, out)?;
    }

    Ok(())
}

fn write_items<T: Ssz, W: Write + ?Sized>(
    items: &[T],
    preset: &Preset,
    writer: &mut W,
) -> Result<()> {
    if T::fixed_len(preset).is_none() {
        let mut offset = items.len() * BYTES_PER_LENGTH_OFFSET;
        for item in items {
            writer.write_all(&offset_bytes(offset)?)?;
            offset += item.encoded_len(preset);
        }
    }

    for item in items {
        item.write_to(preset, writer)?;
    }

    Ok(())
}

fn decode_items<T: Ssz>(bytes: &[u8], preset: &Preset, limit: usize) -> Result<Vec<T>> {
    if let Some(size) = T::fixed_len(preset) {
        if size == 0 || bytes.len() % size != 0 {
            return Err(Error::InvalidByteLength {
                expected: bytes.len().next_multiple_of(size.max(1)),
                got: bytes.len(),
            });
        }

        let count = bytes.len() / size;
        if count > limit {
            return Err(Error::LimitExceeded { limit, got: count });
        }

        return bytes
            .chunks_exact(size)
            .map(|item| T::decode(item, preset))
            .collect();
    }

    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let first = read_offset(bytes, 0)?;
    if first == 0 || first % BYTES_PER_LENGTH_OFFSET != 0 || first > bytes.len() {
        return Err(Error::InvalidOffset {
            offset: first,
            reason: "first offset must be a non-zero multiple of the offset size within the input",
        });
    }

    let count = first / BYTES_PER_LENGTH_OFFSET;
    if count > limit {
        return Err(Error::LimitExceeded { limit, got: count });
    }

    let mut offsets = Vec::with_capacity(count + 1);
    offsets.push(first);
    for index in 1..count {
        let offset = read_offset(bytes, index * BYTES_PER_LENGTH_OFFSET)?;
        let previous = offsets[index - 1];
        if offset < previous || offset > bytes.len() {
            return Err(Error::InvalidOffset {
                offset,
                reason: "offsets must be non-decreasing and within the input",
            });
        }
        offsets.push(offset);
    }
    offsets.push(bytes.len());

    offsets
        .windows(2)
        .map(|bounds| T::decode(&bytes[bounds[0]..bounds[1]], preset))
        .collect()
}

fn items_root<T: Ssz>(items: &[T], preset: &Preset, limit: usize) -> Result<Root> {
    if T::PACKED {
        let size = T::fixed_len(preset).unwrap_or(1);
        let mut bytes = Vec::with_capacity(size * items.len());
        for item in items {
            item.encode_to(preset, &mut bytes)?;
        }
        return merkleize(&pack(&bytes), chunk_count(limit, size));
    }

    let roots = items
        .iter()
        .map(|item| item.hash_tree_root(preset))
        .collect::<Result<Vec<_>>>()?;

    merkleize(&roots, limit)
}
