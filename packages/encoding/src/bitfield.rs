use std::{
    io::Write,
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

use crate::{
    Error, Length, Preset, Result, Root, Ssz,
    constants::BITS_PER_CHUNK,
    expect_len,
    merkle::{merkleize, mix_in_length, pack},
};

/// A sequence of bits stored little-endian within each byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitfield {
    bytes: Vec<u8>,
    len: usize,
}

impl Bitfield {
    pub fn with_len(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Wraps `bytes` as a bitfield of `len` bits. Bits at positions `len..` must be zero.
    pub fn from_bytes(bytes: Vec<u8>, len: usize) -> Result<Self> {
        expect_len(&bytes, len.div_ceil(8))?;

        let field = Self { bytes, len };
        if field.has_trailing_bits() {
            return Err(Error::TrailingBits { len });
        }

        Ok(field)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.bytes[index / 8] & (1 << (index % 8)) != 0)
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        self.check_index(index)?;

        let mask = 1 << (index % 8);
        if value {
            self.bytes[index / 8] |= mask;
        } else {
            self.bytes[index / 8] &= !mask;
        }

        Ok(())
    }

    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::BitOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    fn has_trailing_bits(&self) -> bool {
        let used = self.len % 8;
        used != 0 && self.bytes.last().is_some_and(|last| last >> used != 0)
    }

    fn chunk_limit(bits: usize) -> usize {
        bits.div_ceil(BITS_PER_CHUNK)
    }
}

/// A bitfield of at most `N::length(preset)` bits, serialized with a trailing delimiter bit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitList<N> {
    bits: Bitfield,
    _limit: PhantomData<N>,
}

/// A bitfield of exactly `N::length(preset)` bits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitVector<N> {
    bits: Bitfield,
    _length: PhantomData<N>,
}

impl<N> BitList<N> {
    pub fn with_len(len: usize) -> Self {
        Bitfield::with_len(len).into()
    }
}

impl<N> BitVector<N> {
    pub fn with_len(len: usize) -> Self {
        Bitfield::with_len(len).into()
    }
}

impl<N> From<Bitfield> for BitList<N> {
    fn from(bits: Bitfield) -> Self {
        Self {
            bits,
            _limit: PhantomData,
        }
    }
}

impl<N> From<Bitfield> for BitVector<N> {
    fn from(bits: Bitfield) -> Self {
        Self {
            bits,
            _length: PhantomData,
        }
    }
}

impl<N> Deref for BitList<N> {
    type Target = Bitfield;

    fn deref(&self) -> &Self::Target {
        &self.bits
    }
}

impl<N> DerefMut for BitList<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bits
    }
}

impl<N> Deref for BitVector<N> {
    type Target = Bitfield;

    fn deref(&self) -> &Self::Target {
        &self.bits
    }
}

impl<N> DerefMut for BitVector<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bits
    }
}

impl<N: Length> BitList<N> {
    fn check_limit(&self, preset: &Preset) -> Result<()> {
        let limit = N::length(preset);
        if self.bits.len > limit {
            return Err(Error::LimitExceeded {
                limit,
                got: self.bits.len,
            });
        }
        Ok(())
    }

    fn delimited_last_byte(&self) -> (usize, u8) {
        let full = self.bits.len / 8;
        let tail = if full < self.bits.bytes.len() {
            self.bits.bytes[full]
        } else {
            0
        };
        (full, tail | 1 << (self.bits.len % 8))
    }
}

impl<N: Length> Ssz for BitList<N> {
    fn fixed_len(_: &Preset) -> Option<usize> {
        None
    }

    fn encoded_len(&self, _: &Preset) -> usize {
        self.bits.len / 8 + 1
    }

    fn encode_to(&self, preset: &Preset, out: &mut Vec<u8>) -> Result<()> {
        self.check_limit(preset)?;
        let (full, last) = self.delimited_last_byte();
        out.extend_from_slice(&self.bits.bytes[..full]);
        out.push(last);
        Ok(())
    }

    fn write_to<W: Write + ?Sized>(&self, preset: &Preset, writer: &mut W) -> Result<()> {
        self.check_limit(preset)?;
        let (full, last) = self.delimited_last_byte();
        writer.write_all(&self.bits.bytes[..full])?;
        writer.write_all(&[last])?;
        Ok(())
    }

    fn decode(bytes: &[u8], preset: &Preset) -> Result<Self> {
        let Some((&last, _)) = bytes.split_last() else {
            return Err(Error::MissingDelimiter);
        };
        if last == 0 {
            return Err(Error::MissingDelimiter);
        }

        let delimiter = 7 - last.leading_zeros() as usize;
        let len = (bytes.len() - 1) * 8 + delimiter;

        let limit = N::length(preset);
        if len > limit {
            return Err(Error::LimitExceeded { limit, got: len });
        }

        let mut stripped = bytes.to_vec();
        if let Some(tail) = stripped.last_mut() {
            *tail ^= 1 << delimiter;
        }
        stripped.truncate(len.div_ceil(8));

        Ok(Bitfield { bytes: stripped, len }.into())
    }

    fn hash_tree_root(&self, preset: &Preset) -> Result<Root> {
        self.check_limit(preset)?;
        let limit = Bitfield::chunk_limit(N::length(preset));
        let root = merkleize(&pack(&self.bits.bytes), limit)?;
        Ok(mix_in_length(&root, self.bits.len))
    }
}

impl<N: Length> BitVector<N> {
    fn check_length(&self, preset: &Preset) -> Result<()> {
        let expected = N::length(preset);
        if self.bits.len != expected {
            return Err(Error::LengthMismatch {
                expected,
                got: self.bits.len,
            });
        }
        Ok(())
    }
}

impl<N: Length> Ssz for BitVector<N> {
    fn fixed_len(preset: &Preset) -> Option<usize> {
        Some(N::length(preset).div_ceil(8))
    }

    fn encoded_len(&self, _: &Preset) -> usize {
        self.bits.bytes.len()
    }

    fn encode_to(&self, preset: &Preset, out: &mut Vec<u8>) -> Result<()> {
        self.check_length(preset)?;
        out.extend_from_slice(&self.bits.bytes);
        Ok(())
    }

    fn write_to<W: Write + ?Sized>(&self, preset: &Preset, writer: &mut W) -> Result<()> {
        self.check_length(preset)?;
        writer.write_all(&self.bits.bytes)?;
        Ok(())
    }

    fn decode(bytes: &[u8], preset: &Preset) -> Result<Self> {
        let bits = Bitfield::from_bytes(bytes.to_vec(), N::length(preset))?;
        Ok(bits.into())
    }

    fn hash_tree_root(&self, preset: &Preset) -> Result<Root> {
        self.check_length(preset)?;
        let limit = Bitfield::chunk_limit(N::length(preset));
        merkleize(&pack(&self.bits.bytes), limit)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{Const, merkle::zero_hash};

    const PRESET: Preset = Preset::MINIMAL;

    type Aggregation = BitList<Const<2048>>;
    type Justification = BitVector<Const<4>>;

    #[test]
    fn sets_and_counts_bits() {
        // given
        let mut bits = Bitfield::with_len(10);

        // when
        bits.set(0, true).unwrap();
        bits.set(9, true).unwrap();
        bits.set(3, true).unwrap();
        bits.set(3, false).unwrap();

        // then
        assert_eq!(bits.as_bytes(), &[0b0000_0001, 0b0000_0010]);
        assert_eq!(bits.count_ones(), 2);
        assert!(bits.get(9).unwrap());
        assert_eq!(
            bits.set(10, true).unwrap_err(),
            Error::BitOutOfBounds { index: 10, len: 10 }
        );
    }

    #[test_case(0, vec![0b0000_0001]; "empty list is only the delimiter")]
    #[test_case(3, vec![0b0000_1000]; "delimiter after three bits")]
    #[test_case(8, vec![0, 0b0000_0001]; "full byte moves delimiter into a new byte")]
    fn bit_list_appends_delimiter(len: usize, expected: Vec<u8>) {
        // given
        let bits = Aggregation::with_len(len);

        // when
        let bytes = bits.encode(&PRESET).unwrap();

        // then
        assert_eq!(bytes, expected);
        assert_eq!(Aggregation::decode(&bytes, &PRESET).unwrap(), bits);
    }

    #[test]
    fn bit_list_keeps_set_bits_through_decoding() {
        // given
        let mut bits = Aggregation::with_len(13);
        bits.set(0, true).unwrap();
        bits.set(12, true).unwrap();

        // when
        let decoded = Aggregation::decode(&bits.encode(&PRESET).unwrap(), &PRESET).unwrap();

        // then
        assert_eq!(decoded, bits);
        assert_eq!(decoded.count_ones(), 2);
    }

    #[test_case(&[]; "empty input")]
    #[test_case(&[0b1010_1010, 0]; "zero last byte")]
    fn bit_list_requires_a_delimiter(bytes: &[u8]) {
        assert_eq!(
            Aggregation::decode(bytes, &PRESET).unwrap_err(),
            Error::MissingDelimiter
        );
    }

    #[test]
    fn bit_list_rejects_lengths_over_the_limit() {
        // when
        let err = BitList::<Const<4>>::decode(&[0b0010_0000], &PRESET).unwrap_err();

        // then
        assert_eq!(err, Error::LimitExceeded { limit: 4, got: 5 });
    }

    #[test]
    fn bit_list_root_mixes_in_bit_length() {
        // given
        let mut bits = Aggregation::with_len(3);
        bits.set(1, true).unwrap();

        // when
        let root = bits.hash_tree_root(&PRESET).unwrap();

        // then
        let mut chunk = [0; 32];
        chunk[0] = 0b0000_0010;
        let contents = merkleize(&[chunk], 8).unwrap();
        assert_eq!(root, mix_in_length(&contents, 3));
    }

    #[test]
    fn bit_vector_round_trips_through_one_byte() {
        // given
        let mut bits = Justification::with_len(4);
        bits.set(2, true).unwrap();

        // when
        let bytes = bits.encode(&PRESET).unwrap();

        // then
        assert_eq!(bytes, vec![0b0000_0100]);
        assert_eq!(Justification::decode(&bytes, &PRESET).unwrap(), bits);
    }

    #[test]
    fn bit_vector_rejects_bits_past_its_length() {
        assert_eq!(
            Justification::decode(&[0b0001_0000], &PRESET).unwrap_err(),
            Error::TrailingBits { len: 4 }
        );
    }

    #[test]
    fn bit_vector_rejects_wrong_length() {
        // given
        let bits = Justification::with_len(5);

        // then
        assert_eq!(
            bits.hash_tree_root(&PRESET).unwrap_err(),
            Error::LengthMismatch {
                expected: 4,
                got: 5
            }
        );
    }

    #[test]
    fn empty_bit_vector_root_is_a_zero_chunk() {
        assert_eq!(
            Justification::with_len(4).hash_tree_root(&PRESET).unwrap(),
            zero_hash(0)
        );
    }
}
