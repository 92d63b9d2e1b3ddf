use std::io::Write;

use crate::{
    Error, Preset, Result, Root, Ssz, expect_len,
    merkle::{chunk_count, merkleize, pack},
};

fn chunk_of(bytes: &[u8]) -> Root {
    let mut chunk = [0; 32];
    chunk[..bytes.len()].copy_from_slice(bytes);
    chunk
}

impl Ssz for u8 {
    const PACKED: bool = true;

    fn fixed_len(_: &Preset) -> Option<usize> {
        Some(1)
    }

    fn encoded_len(&self, _: &Preset) -> usize {
        1
    }

    fn encode_to(&self, _: &Preset, out: &mut Vec<u8>) -> Result<()> {
        out.push(*self);
        Ok(())
    }

    fn write_to<W: Write + ?Sized>(&self, _: &Preset, writer: &mut W) -> Result<()> {
        writer.write_all(&[*self])?;
        Ok(())
    }

    fn decode(bytes: &[u8], _: &Preset) -> Result<Self> {
        expect_len(bytes, 1)?;
        Ok(bytes[0])
    }

    fn hash_tree_root(&self, _: &Preset) -> Result<Root> {
        Ok(chunk_of(&[*self]))
    }
}

impl Ssz for u64 {
    const PACKED: bool = true;

    fn fixed_len(_: &Preset) -> Option<usize> {
        Some(8)
    }

    fn encoded_len(&self, _: &Preset) -> usize {
        8
    }

    fn encode_to(&self, _: &Preset, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.to_le_bytes());
        Ok(())
    }

    fn write_to<W: Write + ?Sized>(&self, _: &Preset, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_le_bytes())?;
        Ok(())
    }

    fn decode(bytes: &[u8], _: &Preset) -> Result<Self> {
        expect_len(bytes, 8)?;
        let mut le = [0; 8];
        le.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(le))
    }

    fn hash_tree_root(&self, _: &Preset) -> Result<Root> {
        Ok(chunk_of(&self.to_le_bytes()))
    }
}

impl Ssz for bool {
    const PACKED: bool = true;

    fn fixed_len(_: &Preset) -> Option<usize> {
        Some(1)
    }

    fn encoded_len(&self, _: &Preset) -> usize {
        1
    }

    fn encode_to(&self, _: &Preset, out: &mut Vec<u8>) -> Result<()> {
        out.push(u8::from(*self));
        Ok(())
    }

    fn write_to<W: Write + ?Sized>(&self, _: &Preset, writer: &mut W) -> Result<()> {
        writer.write_all(&[u8::from(*self)])?;
        Ok(())
    }

    fn decode(bytes: &[u8], _: &Preset) -> Result<Self> {
        expect_len(bytes, 1)?;
        match bytes[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidBool(other)),
        }
    }

    fn hash_tree_root(&self, _: &Preset) -> Result<Root> {
        Ok(chunk_of(&[u8::from(*self)]))
    }
}

/// Fixed-size byte vectors: roots, hashes, keys, signatures, addresses.
impl<const N: usize> Ssz for [u8; N] {
    fn fixed_len(_: &Preset) -> Option<usize> {
        Some(N)
    }

    fn encoded_len(&self, _: &Preset) -> usize {
        N
    }

    fn encode_to(&self, _: &Preset, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self);
        Ok(())
    }

    fn write_to<W: Write + ?Sized>(&self, _: &Preset, writer: &mut W) -> Result<()> {
        writer.write_all(self)?;
        Ok(())
    }

    fn decode(bytes: &[u8], _: &Preset) -> Result<Self> {
        expect_len(bytes, N)?;
        let mut array = [0; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    fn hash_tree_root(&self, _: &Preset) -> Result<Root> {
        merkleize(&pack(self), chunk_count(N, 1))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::merkle::hash_pair;

    const PRESET: Preset = Preset::MINIMAL;

    #[test]
    fn encodes_u64_little_endian() {
        // when
        let bytes = 0x0102_0304_0506_0708u64.encode(&PRESET).unwrap();

        // then
        assert_eq!(bytes, vec![8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(u64::decode(&bytes, &PRESET).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test_case(&[]; "empty")]
    #[test_case(&[1, 2, 3, 4, 5, 6, 7]; "short")]
    #[test_case(&[0; 9]; "long")]
    fn u64_rejects_wrong_length(bytes: &[u8]) {
        // when
        let err = u64::decode(bytes, &PRESET).unwrap_err();

        // then
        assert_eq!(
            err,
            Error::InvalidByteLength {
                expected: 8,
                got: bytes.len()
            }
        );
    }

    #[test_case(0, Ok(false); "false")]
    #[test_case(1, Ok(true); "true")]
    #[test_case(2, Err(Error::InvalidBool(2)); "two")]
    #[test_case(0xff, Err(Error::InvalidBool(0xff)); "all ones")]
    fn decodes_booleans(byte: u8, expected: Result<bool>) {
        assert_eq!(bool::decode(&[byte], &PRESET), expected);
    }

    #[test]
    fn basic_roots_are_padded_chunks() {
        // when
        let root = 5u64.hash_tree_root(&PRESET).unwrap();

        // then
        let mut expected = [0; 32];
        expected[0] = 5;
        assert_eq!(root, expected);
    }

    #[test]
    fn short_byte_vector_root_is_the_padded_bytes() {
        // when
        let root = [7u8; 20].hash_tree_root(&PRESET).unwrap();

        // then
        let mut expected = [0; 32];
        expected[..20].copy_from_slice(&[7; 20]);
        assert_eq!(root, expected);
    }

    #[test]
    fn long_byte_vector_root_merkleizes_chunks() {
        // given
        let pubkey = [3u8; 48];

        // when
        let root = pubkey.hash_tree_root(&PRESET).unwrap();

        // then
        let mut second = [0; 32];
        second[..16].copy_from_slice(&[3; 16]);
        assert_eq!(root, hash_pair(&[3; 32], &second));
    }

    #[test]
    fn streams_the_same_bytes_it_encodes() {
        // given
        let signature = [9u8; 96];
        let mut written = vec![];

        // when
        signature.write_to(&PRESET, &mut written).unwrap();

        // then
        assert_eq!(written, signature.encode(&PRESET).unwrap());
    }
}
