//! Building blocks for the `container!` macro.
//!
//! A container is serialized as a fixed part holding every fixed-size field inline plus a four
//! byte offset per variable-size field, followed by the variable-size fields in declaration order.

use std::io::Write;

use crate::{
    Error, Preset, Result, Ssz,
    collections::{offset_bytes, read_offset},
    constants::BYTES_PER_LENGTH_OFFSET,
};

/// Bytes a field of type `T` occupies in the fixed part of its container.
pub fn fixed_part_len<T: Ssz>(preset: &Preset) -> usize {
    T::fixed_len(preset).unwrap_or(BYTES_PER_LENGTH_OFFSET)
}

/// Bytes a field contributes to the serialization of its container, offset included.
pub fn field_len<T: Ssz>(value: &T, preset: &Preset) -> usize {
    match T::fixed_len(preset) {
        Some(len) => len,
        None => BYTES_PER_LENGTH_OFFSET + value.encoded_len(preset),
    }
}

/// Appends the fixed-part rendition of a field and returns the offset of the next variable field.
pub fn encode_fixed<T: Ssz>(
    value: &T,
    preset: &Preset,
    out: &mut Vec<u8>,
    offset: usize,
) -> Result<usize> {
    if T::fixed_len(preset).is_some() {
        value.encode_to(preset, out)?;
        return Ok(offset);
    }

    out.extend_from_slice(&offset_bytes(offset)?);
    Ok(offset + value.encoded_len(preset))
}

pub fn encode_variable<T: Ssz>(value: &T, preset: &Preset, out: &mut Vec<u8>) -> Result<()> {
    if T::fixed_len(preset).is_none() {
        value.encode_to(preset, out)?;
    }
    Ok(())
}

pub fn write_fixed<T: Ssz, W: Write + ?Sized>(
    value: &T,
    preset: &Preset,
    writer: &mut W,
    offset: usize,
) -> Result<usize> {
    if T::fixed_len(preset).is_some() {
        value.write_to(preset, writer)?;
        return Ok(offset);
    }

    writer.write_all(&offset_bytes(offset)?)?;
    Ok(offset + value.encoded_len(preset))
}

pub fn write_variable<T: Ssz, W: Write + ?Sized>(
    value: &T,
    preset: &Preset,
    writer: &mut W,
) -> Result<()> {
    if T::fixed_len(preset).is_none() {
        value.write_to(preset, writer)?;
    }
    Ok(())
}

enum Field {
    Fixed { start: usize, end: usize },
    Variable { offset: usize },
}

/// Splits the serialization of a container into one byte range per field.
///
/// Fields are registered in declaration order, then [`ContainerDecoder::finish`] validates the
/// offsets and hands out the field slices.
pub struct ContainerDecoder<'a> {
    bytes: &'a [u8],
    preset: &'a Preset,
    cursor: usize,
    fields: Vec<Field>,
}

impl<'a> ContainerDecoder<'a> {
    pub fn new(bytes: &'a [u8], preset: &'a Preset) -> Self {
        Self {
            bytes,
            preset,
            cursor: 0,
            fields: Vec::new(),
        }
    }

    pub fn register<T: Ssz>(&mut self) -> Result<()> {
        match T::fixed_len(self.preset) {
            Some(len) => {
                let end = self.cursor + len;
                if end > self.bytes.len() {
                    return Err(Error::InvalidByteLength {
                        expected: end,
                        got: self.bytes.len(),
                    });
                }
                self.fields.push(Field::Fixed {
                    start: self.cursor,
                    end,
                });
                self.cursor = end;
            }
            None => {
                let offset = read_offset(self.bytes, self.cursor)?;
                self.fields.push(Field::Variable { offset });
                self.cursor += BYTES_PER_LENGTH_OFFSET;
            }
        }

        Ok(())
    }

    pub fn finish(self) -> Result<ContainerFields<'a>> {
        let fixed_end = self.cursor;
        let total = self.bytes.len();

        let offsets: Vec<usize> = self
            .fields
            .iter()
            .filter_map(|field| match field {
                Field::Variable { offset } => Some(*offset),
                Field::Fixed { .. } => None,
            })
            .collect();

        match offsets.first() {
            None if fixed_end != total => {
                return Err(Error::InvalidByteLength {
                    expected: fixed_end,
                    got: total,
                });
            }
            Some(&first) if first != fixed_end => {
                return Err(Error::InvalidOffset {
                    offset: first,
                    reason: "first offset must point at the end of the fixed part",
                });
            }
            _ => {}
        }

        for pair in offsets.windows(2) {
            if pair[1] < pair[0] {
                return Err(Error::InvalidOffset {
                    offset: pair[1],
                    reason: "offsets must be non-decreasing",
                });
            }
        }
        if let Some(&last) = offsets.last() {
            if last > total {
                return Err(Error::InvalidOffset {
                    offset: last,
                    reason: "offset points past the end of the input",
                });
            }
        }

        let mut ends = offsets.iter().skip(1).copied().chain([total]);
        let slices = self
            .fields
            .iter()
            .map(|field| match *field {
                Field::Fixed { start, end } => &self.bytes[start..end],
                Field::Variable { offset } => {
                    let end = ends.next().unwrap_or(total);
                    &self.bytes[offset..end]
                }
            })
            .collect();

        Ok(ContainerFields {
            slices,
            preset: self.preset,
            next: 0,
        })
    }
}

pub struct ContainerFields<'a> {
    slices: Vec<&'a [u8]>,
    preset: &'a Preset,
    next: usize,
}

impl ContainerFields<'_> {
    /// Decodes the next field in declaration order.
    pub fn decode_next<T: Ssz>(&mut self) -> Result<T> {
        let bytes = self.slices.get(self.next).copied().unwrap_or_default();
        self.next += 1;
        T::decode(bytes, self.preset)
    }
}

/// Declares an SSZ container: a struct plus its [`Ssz`](crate::Ssz) implementation.
///
/// ```
/// use ssz_bench_encoding::{Root, container};
///
/// container! {
///     pub struct Checkpoint {
///         pub epoch: u64,
///         pub root: Root,
///     }
/// }
/// ```
#[macro_export]
macro_rules! container {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $name {
            fn fixed_part_len(preset: &$crate::Preset) -> usize {
                0 $( + $crate::container::fixed_part_len::<$ty>(preset) )*
            }
        }

        impl $crate::Ssz for $name {
            fn fixed_len(preset: &$crate::Preset) -> Option<usize> {
                Some(0 $( + <$ty as $crate::Ssz>::fixed_len(preset)? )*)
            }

            fn encoded_len(&self, preset: &$crate::Preset) -> usize {
                0 $( + $crate::container::field_len(&self.$field, preset) )*
            }

            fn encode_to(
                &self,
                preset: &$crate::Preset,
                out: &mut Vec<u8>,
            ) -> $crate::Result<()> {
                let offset = Self::fixed_part_len(preset);
                $(
                    let offset = $crate::container::encode_fixed(&self.$field, preset, out, offset)?;
                )*
                let _ = offset;
                $( $crate::container::encode_variable(&self.$field, preset, out)?; )*
                Ok(())
            }

            fn write_to<W: ::std::io::Write + ?Sized>(
                &self,
                preset: &$crate::Preset,
                writer: &mut W,
            ) -> $crate::Result<()> {
                let offset = Self::fixed_part_len(preset);
                $(
                    let offset = $crate::container::write_fixed(&self.$field, preset, writer, offset)?;
                )*
                let _ = offset;
                $( $crate::container::write_variable(&self.$field, preset, writer)?; )*
                Ok(())
            }

            fn decode(bytes: &[u8], preset: &$crate::Preset) -> $crate::Result<Self> {
                let mut decoder = $crate::container::ContainerDecoder::new(bytes, preset);
                $( decoder.register::<$ty>()?; )*
                let mut fields = decoder.finish()?;
                Ok(Self {
                    $( $field: fields.decode_next::<$ty>()?, )*
                })
            }

            fn hash_tree_root(&self, preset: &$crate::Preset) -> $crate::Result<$crate::Root> {
                let roots = [
                    $( $crate::Ssz::hash_tree_root(&self.$field, preset)?, )*
                ];
                $crate::merkle::merkleize(&roots, roots.len())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Const, Error, List, Preset, Root, Ssz,
        merkle::{hash_pair, merkleize},
    };

    const PRESET: Preset = Preset::MINIMAL;

    container! {
        struct Checkpoint {
            epoch: u64,
            root: Root,
        }
    }

    container! {
        /// Mixes fixed and variable fields.
        struct Envelope {
            version: u8,
            payload: List<u8, Const<16>>,
            checkpoint: Checkpoint,
            extra: List<u64, Const<4>>,
        }
    }

    fn envelope() -> Envelope {
        Envelope {
            version: 3,
            payload: vec![0xaa, 0xbb].into(),
            checkpoint: Checkpoint {
                epoch: 1,
                root: [2; 32],
            },
            extra: vec![5].into(),
        }
    }

    #[test]
    fn fixed_container_concatenates_fields() {
        // given
        let checkpoint = Checkpoint {
            epoch: 7,
            root: [1; 32],
        };

        // when
        let bytes = checkpoint.encode(&PRESET).unwrap();

        // then
        assert_eq!(Checkpoint::fixed_len(&PRESET), Some(40));
        assert_eq!(&bytes[..8], &7u64.to_le_bytes());
        assert_eq!(&bytes[8..], &[1; 32]);
        assert_eq!(Checkpoint::decode(&bytes, &PRESET).unwrap(), checkpoint);
    }

    #[test]
    fn variable_fields_follow_the_fixed_part() {
        // when
        let bytes = envelope().encode(&PRESET).unwrap();

        // then
        // 1 (version) + 4 (offset) + 40 (checkpoint) + 4 (offset)
        let fixed_end = 49;
        assert_eq!(Envelope::fixed_len(&PRESET), None);
        assert_eq!(&bytes[1..5], &(fixed_end as u32).to_le_bytes());
        assert_eq!(&bytes[45..49], &(fixed_end as u32 + 2).to_le_bytes());
        assert_eq!(&bytes[fixed_end..fixed_end + 2], &[0xaa, 0xbb]);
        assert_eq!(bytes.len(), fixed_end + 2 + 8);
        assert_eq!(bytes.len(), envelope().encoded_len(&PRESET));
    }

    #[test]
    fn decodes_what_it_encodes() {
        // given
        let bytes = envelope().encode(&PRESET).unwrap();

        // when
        let decoded = Envelope::decode(&bytes, &PRESET).unwrap();

        // then
        assert_eq!(decoded, envelope());
    }

    #[test]
    fn writer_matches_buffer_encoding() {
        // given
        let mut written = vec![];

        // when
        envelope().write_to(&PRESET, &mut written).unwrap();

        // then
        assert_eq!(written, envelope().encode(&PRESET).unwrap());
    }

    #[test]
    fn rejects_first_offset_not_at_fixed_part_end() {
        // given
        let mut bytes = envelope().encode(&PRESET).unwrap();
        bytes[1] += 1;

        // when
        let err = Envelope::decode(&bytes, &PRESET).unwrap_err();

        // then
        assert!(matches!(err, Error::InvalidOffset { offset: 50, .. }));
    }

    #[test]
    fn rejects_offsets_past_the_input() {
        // given
        let mut bytes = envelope().encode(&PRESET).unwrap();
        bytes[45] = 200;

        // when
        let err = Envelope::decode(&bytes, &PRESET).unwrap_err();

        // then
        assert!(matches!(err, Error::InvalidOffset { offset: 200, .. }));
    }

    #[test]
    fn rejects_truncated_fixed_part() {
        // when
        let err = Checkpoint::decode(&[0; 39], &PRESET).unwrap_err();

        // then
        assert_eq!(
            err,
            Error::InvalidByteLength {
                expected: 40,
                got: 39
            }
        );
    }

    #[test]
    fn rejects_trailing_bytes_after_fixed_container() {
        assert_eq!(
            Checkpoint::decode(&[0; 41], &PRESET).unwrap_err(),
            Error::InvalidByteLength {
                expected: 40,
                got: 41
            }
        );
    }

    #[test]
    fn root_merkleizes_field_roots() {
        // given
        let checkpoint = Checkpoint {
            epoch: 7,
            root: [1; 32],
        };

        // when
        let root = checkpoint.hash_tree_root(&PRESET).unwrap();

        // then
        let mut epoch = [0; 32];
        epoch[0] = 7;
        assert_eq!(root, hash_pair(&epoch, &[1; 32]));
        assert_eq!(root, merkleize(&[epoch, [1; 32]], 2).unwrap());
    }
}
