//! Benchmarks for the phase optimizer
//!
//! Run with: cargo bench -p wavemap-sim --bench optimizer_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wavemap_core::{CosineTable, GridSpec, RegulatoryConfig};
use wavemap_sim::scenario::optimizer::best_fit_below_half;
use wavemap_sim::{BeamformOptimizer, Scene};

fn scene(emitters: usize) -> Scene {
    let grid = GridSpec::default();
    let table = CosineTable::build(32_768.0, grid.wavelength_m());
    Scene::new(grid, Some(table), RegulatoryConfig::default()).with_default_emitters(emitters)
}

fn bench_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");
    group.sample_size(20);

    for n in [3usize, 9].iter() {
        let mut s = scene(*n);
        let cell = s.receiver_cell();
        let mut optimizer = BeamformOptimizer::new();

        group.bench_with_input(BenchmarkId::new("constructive", n), n, |b, _| {
            b.iter(|| optimizer.optimize_toward(&mut s, black_box(cell)))
        });

        group.bench_with_input(BenchmarkId::new("destructive", n), n, |b, _| {
            b.iter(|| optimizer.anti_optimize(&mut s, black_box(cell)))
        });
    }

    group.finish();
}

fn bench_subset_search(c: &mut Criterion) {
    let magnitudes = [0.9, 0.4, 1.3, 0.2, 0.75, 1.1, 0.05, 0.6, 0.33];
    c.bench_function("best_fit_below_half_9", |b| {
        b.iter(|| best_fit_below_half(black_box(&magnitudes)))
    });
}

criterion_group!(benches, bench_optimizer, bench_subset_search);
criterion_main!(benches);
