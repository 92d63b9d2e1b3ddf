use proptest::prelude::*;
use ssz_bench_encoding::{
    BitList, Bitfield, Const, Error, List, Preset, Root, Ssz, Vector, container,
};

const PRESET: Preset = Preset::MAINNET;

type Transaction = List<u8, Const<1024>>;
type Transactions = List<Transaction, Const<16>>;

container! {
    pub struct Payload {
        pub parent_hash: Root,
        pub number: u64,
        pub transactions: Transactions,
        pub aggregation_bits: BitList<Const<64>>,
        pub roots: Vector<Root, Const<2>>,
    }
}

fn payload(transactions: Vec<Vec<u8>>, bits: Vec<bool>) -> Payload {
    let mut aggregation_bits = BitList::with_len(bits.len());
    for (index, bit) in bits.into_iter().enumerate() {
        aggregation_bits.set(index, bit).unwrap();
    }

    Payload {
        parent_hash: [1; 32],
        number: 42,
        transactions: transactions.into_iter().map(Transaction::from).collect(),
        aggregation_bits,
        roots: vec![[2; 32], [3; 32]].into(),
    }
}

#[test]
fn nested_lists_survive_encoding() -> anyhow::Result<()> {
    // given
    let payload = payload(vec![vec![1, 2, 3], vec![], vec![4; 100]], vec![true, false, true]);

    // when
    let bytes = payload.encode(&PRESET)?;
    let decoded = Payload::decode(&bytes, &PRESET)?;

    // then
    assert_eq!(decoded, payload);
    assert_eq!(decoded.hash_tree_root(&PRESET)?, payload.hash_tree_root(&PRESET)?);
    Ok(())
}

#[test]
fn reader_decoding_matches_slice_decoding() -> anyhow::Result<()> {
    // given
    let payload = payload(vec![vec![9; 31]], vec![true; 10]);
    let bytes = payload.encode(&PRESET)?;

    // when
    let decoded = Payload::decode_from_reader(&mut bytes.as_slice(), bytes.len(), &PRESET)?;

    // then
    assert_eq!(decoded, payload);
    Ok(())
}

#[test]
fn reader_shorter_than_announced_is_an_io_error() {
    // given
    let bytes = payload(vec![], vec![]).encode(&PRESET).unwrap();

    // when
    let err = Payload::decode_from_reader(&mut bytes.as_slice(), bytes.len() + 1, &PRESET)
        .unwrap_err();

    // then
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn bitfield_rejects_stray_bits() {
    assert_eq!(
        Bitfield::from_bytes(vec![0b1000_0000], 7).unwrap_err(),
        Error::TrailingBits { len: 7 }
    );
}

proptest::proptest! {
    #![proptest_config(ProptestConfig { cases: 10, .. ProptestConfig::default() })]

    #[test]
    fn decoding_inverts_encoding(
        transactions in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..200), 0..16),
        bits in proptest::collection::vec(any::<bool>(), 0..=64),
    ) {
        // given
        let payload = payload(transactions, bits);

        // when
        let bytes = payload.encode(&PRESET).unwrap();
        let mut written = vec![];
        payload.write_to(&PRESET, &mut written).unwrap();

        // then
        proptest::prop_assert_eq!(&written, &bytes);
        proptest::prop_assert_eq!(Payload::decode(&bytes, &PRESET).unwrap(), payload);
    }

    #[test]
    fn truncated_fixed_part_is_rejected(len in 0usize..112) {
        // given
        let bytes = payload(vec![vec![7; 50]], vec![true; 20]).encode(&PRESET).unwrap();

        // when
        let result = Payload::decode(&bytes[..len], &PRESET);

        // then
        proptest::prop_assert!(result.is_err());
    }
}
