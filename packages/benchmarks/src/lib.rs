use criterion::{BenchmarkGroup, Throughput, measurement::WallTime};
use harness::Codec;
use storage::Fixture;

/// Registers decode, encode and hash tree root of `fixture` under `codec`'s name.
///
/// Panics if the codec cannot handle the fixture, so a broken codec never produces numbers.
pub fn bench_codec<C: Codec>(group: &mut BenchmarkGroup<'_, WallTime>, codec: &C, fixture: &Fixture) {
    let object = codec.decode(&fixture.bytes).expect("fixture decodes");
    let root = codec.hash_tree_root(&object).expect("object hashes");
    assert_eq!(root, *fixture.digest.as_bytes(), "{} disagrees on {}", codec.name(), fixture.id);

    let name = format!("{}/{}", codec.name(), fixture.id.preset);
    group.throughput(Throughput::Bytes(fixture.bytes.len() as u64));

    group.bench_function(format!("{name}/decode"), |b| {
        b.iter(|| codec.decode(&fixture.bytes).expect("fixture decodes"))
    });
    group.bench_function(format!("{name}/encode"), |b| {
        b.iter(|| codec.encode(&object).expect("object encodes"))
    });
    group.bench_function(format!("{name}/hash_tree_root"), |b| {
        b.iter(|| codec.hash_tree_root(&object).expect("object hashes"))
    });
}
