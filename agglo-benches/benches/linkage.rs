//! Matrix-based linkage benchmarks.
//!
//! Compares the naive AGNES loop, Anderberg's row-minimum cache, the
//! nearest-neighbour chain and SLINK on uniform synthetic points. Data
//! generation happens outside the timed closure so only hierarchy
//! construction is measured.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use agglo_benches::{
    error::BenchSetupError,
    params::LinkageBenchParams,
    source::{SyntheticConfig, SyntheticSource},
};
use agglo_core::{Agnes, Anderberg, HierarchyError, Linkage, NnChain, PointerHierarchy, Slink};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Vector dimensionality for all benchmark datasets.
const DIMENSIONS: usize = 8;

/// Dataset sizes to benchmark.
const POINT_COUNTS: &[usize] = &[100, 200, 400];

type Runner = fn(&SyntheticSource) -> Result<PointerHierarchy, HierarchyError>;

fn run_agnes(source: &SyntheticSource) -> Result<PointerHierarchy, HierarchyError> {
    Agnes::new(Linkage::GroupAverage).run(source, None)
}

fn run_anderberg(source: &SyntheticSource) -> Result<PointerHierarchy, HierarchyError> {
    Anderberg::new(Linkage::GroupAverage).run(source, None)
}

fn run_nn_chain(source: &SyntheticSource) -> Result<PointerHierarchy, HierarchyError> {
    NnChain::new(Linkage::GroupAverage).run(source, None)
}

fn run_slink(source: &SyntheticSource) -> Result<PointerHierarchy, HierarchyError> {
    Slink::new().run(source, None)
}

/// Algorithms under comparison, labelled for Criterion.
const RUNNERS: &[(&str, Runner)] = &[
    ("agnes", run_agnes),
    ("anderberg", run_anderberg),
    ("nn_chain", run_nn_chain),
    ("slink", run_slink),
];

fn linkage_algorithms_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("linkage");
    group.sample_size(10);

    for &point_count in POINT_COUNTS {
        let source = SyntheticSource::generate(&SyntheticConfig {
            point_count,
            dimensions: DIMENSIONS,
            seed: SEED,
        })?;
        let bench_params = LinkageBenchParams { point_count };

        for &(label, runner) in RUNNERS {
            // Fail setup early rather than panicking inside the timed loop.
            runner(&source)?;
            group.bench_with_input(
                BenchmarkId::new(label, &bench_params),
                &source,
                |b, source| {
                    b.iter(|| runner(source));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn linkage_algorithms(c: &mut Criterion) {
    if let Err(err) = linkage_algorithms_impl(c) {
        panic!("linkage benchmark setup failed: {err}");
    }
}

criterion_group!(benches, linkage_algorithms);
criterion_main!(benches);
