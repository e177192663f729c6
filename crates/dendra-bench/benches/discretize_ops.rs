//! Criterion micro-benchmarks for the discretization pipelines.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dendra::prelude::*;
use dendra_bench::{branched_cell, population};
use dendra_test_utils::two_cell_system;

/// Benchmark: discretize the two-cell reference population.
fn bench_discretize_two_cell(c: &mut Criterion) {
    let cells = two_cell_system();
    let defaults = CableParameters::neuron_defaults();
    c.bench_function("discretize_two_cell", |b| {
        b.iter(|| {
            let d = discretize(black_box(&cells), &defaults).unwrap();
            black_box(&d);
        });
    });
}

/// Benchmark: discretize one deep cell (depth 7, 127 branch pairs).
fn bench_discretize_deep_cell(c: &mut Criterion) {
    let cells = vec![branched_cell(7, 4)];
    let defaults = CableParameters::neuron_defaults();
    c.bench_function("discretize_deep_cell", |b| {
        b.iter(|| {
            let d = discretize(black_box(&cells), &defaults).unwrap();
            black_box(&d);
        });
    });
}

/// Benchmark: full build (discretization plus mechanism data) for a
/// population of 64 small cells.
fn bench_mechanism_build_population(c: &mut Criterion) {
    let cells = population(64, 3, 4);
    let gprop = GlobalProperties::default();
    let d = discretize(&cells, &gprop.default_parameters).unwrap();
    c.bench_function("mechanism_build_population_64", |b| {
        b.iter(|| {
            let m = build_mechanism_data(black_box(&gprop), &cells, &d).unwrap();
            black_box(&m);
        });
    });
}

criterion_group!(
    benches,
    bench_discretize_two_cell,
    bench_discretize_deep_cell,
    bench_mechanism_build_population
);
criterion_main!(benches);
