//! Benchmarks for the QuantPivot library.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quantpivot::distance_measures::{approx_distance, euclidean_scalar, euclidean_simd};
use quantpivot::prelude::*;
use rand::prelude::*;

fn generate_matrix(n: usize, dim: usize, seed: u64) -> Matrix<f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let data: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect())
        .collect();
    Matrix::from_rows(&data).unwrap()
}

fn benchmark_euclidean(c: &mut Criterion) {
    let mut group = c.benchmark_group("euclidean");

    for &dim in &[3usize, 64, 128, 257] {
        let m = generate_matrix(2, dim, 7);
        let (a, b) = (m.row(0).to_vec(), m.row(1).to_vec());

        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bench, _| {
            bench.iter(|| black_box(euclidean_scalar(black_box(&a), black_box(&b))))
        });
        group.bench_with_input(BenchmarkId::new("simd", dim), &dim, |bench, _| {
            bench.iter(|| black_box(euclidean_simd(black_box(&a), black_box(&b))))
        });
    }

    group.finish();
}

fn benchmark_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");

    for &dim in &[64usize, 256] {
        let m = generate_matrix(2, dim, 11);
        let (a, b) = (m.row(0).to_vec(), m.row(1).to_vec());
        let (sa, sb) = (quantize(&a, 8), quantize(&b, 8));

        group.bench_with_input(BenchmarkId::new("sketch_x8", dim), &dim, |bench, _| {
            bench.iter(|| black_box(quantize(black_box(&a), 8)))
        });
        group.bench_with_input(BenchmarkId::new("approx_distance", dim), &dim, |bench, _| {
            bench.iter(|| black_box(approx_distance(sa.view(), sb.view())))
        });
    }

    group.finish();
}

fn benchmark_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    group.sample_size(10);

    for &n in &[1000usize, 5000] {
        let data = std::sync::Arc::new(generate_matrix(n, 64, 42));
        let config = FitConfig::new(16, 8).with_silent(true);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| black_box(QuantPivotIndex::fit(data.clone(), &config).unwrap()))
        });
    }

    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    group.sample_size(10);

    for &n in &[1000usize, 5000] {
        let data = generate_matrix(n, 64, 42);
        let queries = generate_matrix(50, 64, 123);
        let index = QuantPivotIndex::fit(data, &FitConfig::new(16, 8).with_silent(true)).unwrap();
        let config = PredictConfig::new(10).with_silent(true);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| black_box(index.predict(&queries, &config).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_euclidean,
    benchmark_quantize,
    benchmark_fit,
    benchmark_predict,
);

criterion_main!(benches);
