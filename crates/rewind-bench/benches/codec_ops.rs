//! Criterion micro-benchmarks for the timeline codec and hashing.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rewind_bench::stress_profile;
use rewind_store::{load, save, snapshot_hash, timeline_hash};
use rewind_test_utils::fixtures::patrol;

/// Benchmark: encode the stress log.
fn bench_encode_timeline(c: &mut Criterion) {
    let world = stress_profile().unwrap();

    c.bench_function("codec_encode_40t_8c", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(64 * 1024);
            save(&mut buf, world.rules(), world.timeline()).unwrap();
            black_box(&buf);
        });
    });
}

/// Benchmark: decode and validate the same log.
fn bench_decode_timeline(c: &mut Criterion) {
    let world = stress_profile().unwrap();
    let mut encoded = Vec::with_capacity(64 * 1024);
    save(&mut encoded, world.rules(), world.timeline()).unwrap();

    c.bench_function("codec_decode_40t_8c", |b| {
        b.iter(|| {
            let doc = load(encoded.as_slice()).unwrap();
            black_box(&doc);
        });
    });
}

/// Benchmark: fingerprint a scripted log and one replayed frame.
fn bench_hashes(c: &mut Criterion) {
    let (_, timeline) = patrol(40, 8);
    let world = stress_profile().unwrap();
    let snap = world.snapshot_at(world.end_offset());

    c.bench_function("timeline_hash_40t_8c", |b| {
        b.iter(|| black_box(timeline_hash(&timeline)));
    });
    c.bench_function("snapshot_hash_8c", |b| {
        b.iter(|| black_box(snapshot_hash(&snap)));
    });
}

criterion_group!(
    benches,
    bench_encode_timeline,
    bench_decode_timeline,
    bench_hashes
);
criterion_main!(benches);
