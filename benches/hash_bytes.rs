use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jenkins_hash::{hash_bytes, hash_bytes_bytewise};
use std::hint::black_box;

fn bench_hash_bytes(c: &mut Criterion) {
    // One spare word so the same bytes can be viewed at offset 1.
    let words: Vec<u32> = (0..1025u32).map(|i| i.wrapping_mul(0x9e3779b9)).collect();
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();

    let mut group = c.benchmark_group("hash_bytes");
    for len in [4usize, 11, 12, 64, 1024, 4096] {
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("auto", len), &len, |b, &len| {
            b.iter(|| hash_bytes(black_box(&bytes[..len])))
        });
        group.bench_with_input(BenchmarkId::new("offset 1", len), &len, |b, &len| {
            b.iter(|| hash_bytes(black_box(&bytes[1..len + 1])))
        });
        group.bench_with_input(BenchmarkId::new("bytewise", len), &len, |b, &len| {
            b.iter(|| hash_bytes_bytewise(black_box(&bytes[..len])))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hash_bytes);
criterion_main!(benches);
