//! # Sparse Set Benchmark
//!
//! Raw container costs, independent of the manager:
//! - insert / lookup / swap-remove
//! - dense iteration for both layouts
//!
//! Run with: `cargo bench --package arc_acs --bench sparse_set_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use arc_acs::acs::sparse_set::{Packed, Parallel};
use arc_acs::SparseSet;

const ELEMENT_COUNT: u32 = 100_000;

/// Deterministic scattered indices (Knuth multiplicative hash).
fn scattered(count: u32) -> Vec<u32> {
    (0..count)
        .map(|i| i.wrapping_mul(2_654_435_761) % (count * 4))
        .collect()
}

fn filled<L: arc_acs::acs::sparse_set::DenseLayout>() -> SparseSet<[f32; 4], u32, L> {
    let mut set = SparseSet::with_capacity(ELEMENT_COUNT as usize, ELEMENT_COUNT as usize);
    for i in 0..ELEMENT_COUNT {
        set.add(i, [i as f32; 4]);
    }
    set
}

/// Benchmark: Insert scattered indices.
fn bench_insert(c: &mut Criterion) {
    let indices = scattered(ELEMENT_COUNT);
    c.bench_function("insert_scattered_100K", |b| {
        b.iter(|| {
            let mut set: SparseSet<u64> = SparseSet::new();
            for &i in &indices {
                set.add(i, u64::from(i));
            }
            black_box(set.len())
        });
    });
}

/// Benchmark: Random lookup.
fn bench_lookup(c: &mut Criterion) {
    let set = filled::<Parallel>();
    let indices = scattered(10_000);

    c.bench_function("lookup_10K", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &i in &indices {
                if let Some(v) = set.try_get(i) {
                    sum += v[0];
                }
            }
            black_box(sum)
        });
    });
}

/// Benchmark: Swap-remove every element front to back.
fn bench_remove(c: &mut Criterion) {
    c.bench_function("swap_remove_100K", |b| {
        b.iter_batched(
            filled::<Parallel>,
            |mut set| {
                for i in 0..ELEMENT_COUNT {
                    black_box(set.try_remove(i));
                }
                set.len()
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: Dense iteration, parallel vs packed layout.
fn bench_iteration_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate_100K");

    let mut parallel = filled::<Parallel>();
    group.bench_function("parallel", |b| {
        b.iter(|| {
            for (_, v) in parallel.iter_mut() {
                v[0] += 0.016;
            }
            black_box(parallel.len())
        });
    });

    let mut packed = filled::<Packed>();
    group.bench_function("packed", |b| {
        b.iter(|| {
            for (_, v) in packed.iter_mut() {
                v[0] += 0.016;
            }
            black_box(packed.len())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_lookup,
    bench_remove,
    bench_iteration_layouts,
);

criterion_main!(benches);
