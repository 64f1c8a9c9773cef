//! Benchmarks for this crate's [`WeightBalancedTree`].

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::{Rng, SeedableRng, rngs::StdRng};
use wbtree::WeightBalancedTree;

/// Benchmarking sizes.
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

/// Benchmarking insertion of fresh keys.
#[inline]
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("WeightBalancedTree Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut tree: WeightBalancedTree<u64> =
                std::iter::repeat_with(|| rng.random()).take(size).collect();

            b.iter(|| {
                black_box(tree.insert(rng.random()).is_ok());
            });
        });
    }
}

/// Benchmarking a removal followed by re-insertion of the same key, so the
/// size stays fixed.
#[inline]
pub fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("WeightBalancedTree Remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let keys: Vec<u64> = std::iter::repeat_with(|| rng.random()).take(size).collect();
            let mut tree: WeightBalancedTree<u64> = keys.iter().copied().collect();

            b.iter(|| {
                let key = keys[rng.random_range(0..keys.len())];
                if let Ok(key) = tree.remove(&key) {
                    black_box(tree.insert(key).is_ok());
                }
            });
        });
    }
}

/// Benchmarking rank queries.
#[inline]
pub fn count_less_than(c: &mut Criterion) {
    let mut group = c.benchmark_group("WeightBalancedTree Count Less Than");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let tree: WeightBalancedTree<u64> =
                std::iter::repeat_with(|| rng.random()).take(size).collect();
            let probes: Vec<u64> = std::iter::repeat_with(|| rng.random()).take(10).collect();

            b.iter(|| {
                for probe in &probes {
                    black_box(tree.count_less_than(probe));
                }
            });
        });
    }
}

/// Benchmarking uniform selection.
#[inline]
pub fn random_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("WeightBalancedTree Random Item");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let tree: WeightBalancedTree<u64> =
                std::iter::repeat_with(|| rng.random()).take(size).collect();

            b.iter(|| {
                black_box(tree.random_item(&mut rng).is_ok());
            });
        });
    }
}

/// Benchmarking iteration.
#[inline]
pub fn iter(c: &mut Criterion) {
    c.bench_function("WeightBalancedTree Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let tree: WeightBalancedTree<u64> = std::iter::repeat_with(|| rng.random())
            .take(100_000)
            .collect();

        b.iter(|| {
            for key in &tree {
                black_box(key);
            }
        });
    });
}
