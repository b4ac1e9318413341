//! Criterion micro-benchmarks for playback, resolution and trails.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rewind_bench::{reference_profile, stress_profile};
use rewind_core::CopyId;
use rewind_sim::{resolve_all, Replay, Resolutions};

/// Benchmark: full snapshot at the end of the reference log.
fn bench_snapshot_at_end(c: &mut Criterion) {
    let world = reference_profile().unwrap();
    let end = world.end_offset();

    c.bench_function("snapshot_at_end_10t_4c", |b| {
        b.iter(|| {
            let snap = world.snapshot_at(black_box(end));
            black_box(&snap);
        });
    });
}

/// Benchmark: one copy's position half-way through the log.
fn bench_position_at_mid(c: &mut Criterion) {
    let world = reference_profile().unwrap();
    let mid = world.end_offset() / 2;

    c.bench_function("position_at_mid_10t_4c", |b| {
        b.iter(|| {
            let state = world.position_at(CopyId(3), black_box(mid));
            black_box(state);
        });
    });
}

/// Benchmark: incremental scrub across every offset with one replay.
fn bench_incremental_scrub(c: &mut Criterion) {
    let world = reference_profile().unwrap();
    let end = world.end_offset();

    c.bench_function("incremental_scrub_10t_4c", |b| {
        b.iter(|| {
            let mut replay = Replay::new();
            for offset in 0..end {
                replay.advance_to(world.view(), offset);
            }
            black_box(replay.states().len());
        });
    });
}

/// Benchmark: resolve the whole stress log from scratch.
fn bench_resolve_all_stress(c: &mut Criterion) {
    let world = stress_profile().unwrap();

    c.bench_function("resolve_all_40t_8c", |b| {
        b.iter(|| {
            let mut res = Resolutions::new();
            let report = resolve_all(world.rules(), world.timeline(), &mut res);
            black_box(report);
        });
    });
}

/// Benchmark: past/current/future trails around the middle turn.
fn bench_trails_for_turn(c: &mut Criterion) {
    let world = reference_profile().unwrap();

    c.bench_function("trails_for_turn_10t_4c", |b| {
        b.iter(|| {
            let trails = world.trails_for_turn(black_box(5));
            black_box(&trails);
        });
    });
}

criterion_group!(
    benches,
    bench_snapshot_at_end,
    bench_position_at_mid,
    bench_incremental_scrub,
    bench_resolve_all_stress,
    bench_trails_for_turn
);
criterion_main!(benches);
