//! Stress tests for the QuantPivot library.
//!
//! These tests verify determinism and result invariants on larger random
//! datasets, across both precisions and both execution modes.

use quantpivot::prelude::*;
use rand::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Generate a random matrix with entries in [-1, 1).
fn generate_random_matrix(n: usize, dim: usize, seed: u64) -> Matrix<f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let data: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect())
        .collect();
    Matrix::from_rows(&data).unwrap()
}

fn generate_random_matrix_f64(n: usize, dim: usize, seed: u64) -> Matrix<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let data: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0f64..1.0)).collect())
        .collect();
    Matrix::from_rows(&data).unwrap()
}

/// Verify per-row result invariants.
fn verify_results<T: Real>(result: &KnnResult<T>, n: usize) {
    for q in 0..result.num_queries() {
        let ids = result.ids.row(q);
        let dists = result.distances.row(q);

        for i in 1..dists.len() {
            assert!(
                dists[i] >= dists[i - 1],
                "Results not sorted: {} >= {} failed",
                dists[i],
                dists[i - 1]
            );
        }

        let filled: Vec<i32> = ids.iter().copied().filter(|&id| id != NO_NEIGHBOR).collect();
        assert!(filled.iter().all(|&id| (id as usize) < n));
        let mut unique = filled.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), filled.len(), "duplicate ids in {:?}", ids);
    }
}

#[test]
fn stress_test_parallel_matches_sequential() {
    const N: usize = 2000;
    const DIM: usize = 48;
    const K: usize = 10;

    let data = Arc::new(generate_random_matrix(N, DIM, 42));
    let queries = generate_random_matrix(300, DIM, 123);

    let fit_par = FitConfig::new(16, 8).with_silent(true);
    let fit_seq = fit_par.clone().with_parallel(false);
    let par = QuantPivotIndex::fit(Arc::clone(&data), &fit_par).unwrap();
    let seq = QuantPivotIndex::fit(Arc::clone(&data), &fit_seq).unwrap();
    assert_eq!(par.table(), seq.table());

    let predict = PredictConfig::new(K).with_silent(true);
    let a = par.predict(&queries, &predict).unwrap();
    let b = seq
        .predict(&queries, &predict.clone().with_parallel(false))
        .unwrap();

    assert_eq!(a, b);
    verify_results(&a, N);
}

#[test]
fn stress_test_repeated_predict_is_deterministic() {
    let data = generate_random_matrix(1500, 32, 7);
    let queries = generate_random_matrix(400, 32, 8);
    let index = QuantPivotIndex::fit(data, &FitConfig::new(12, 6).with_silent(true)).unwrap();
    let config = PredictConfig::new(5).with_silent(true);

    let first = index.predict(&queries, &config).unwrap();
    for _ in 0..3 {
        assert_eq!(index.predict(&queries, &config).unwrap(), first);
    }
}

#[test]
fn stress_test_f64_with_simd_kernel() {
    const N: usize = 3000;
    const DIM: usize = 67;

    let data = generate_random_matrix_f64(N, DIM, 11);
    let queries = generate_random_matrix_f64(100, DIM, 12);

    let scalar = QuantPivotIndex::fit(data.clone(), &FitConfig::new(20, 10).with_silent(true)).unwrap();
    let simd = QuantPivotIndex::fit(
        data,
        &FitConfig::new(20, 10)
            .with_silent(true)
            .with_kernel(ExactKernel::Simd),
    )
    .unwrap();

    let config = PredictConfig::new(8).with_silent(true);
    let a = scalar.predict(&queries, &config).unwrap();
    let b = simd.predict(&queries, &config).unwrap();
    verify_results(&a, N);
    verify_results(&b, N);

    // Same candidates; only the refined distances may differ in the last bits.
    for q in 0..a.num_queries() {
        let mut ids_a = a.ids.row(q).to_vec();
        let mut ids_b = b.ids.row(q).to_vec();
        ids_a.sort_unstable();
        ids_b.sort_unstable();
        assert_eq!(ids_a, ids_b);
    }
    assert_eq!(a.pruned, b.pruned);
}

#[test]
fn stress_test_all_slots_filled_when_k_fits() {
    const N: usize = 1000;
    const DIM: usize = 16;

    let data = generate_random_matrix(N, DIM, 99);
    let queries = generate_random_matrix(300, DIM, 100);
    let index = QuantPivotIndex::fit(data, &FitConfig::new(64, DIM).with_silent(true)).unwrap();

    let result = index
        .predict(&queries, &PredictConfig::new(7).with_silent(true))
        .unwrap();
    verify_results(&result, N);
    assert!(result.ids.as_slice().iter().all(|&id| id != NO_NEIGHBOR));
    assert!(result.distances.as_slice().iter().all(|d| d.is_finite()));
}

#[test]
fn stress_test_throughput() {
    const N: usize = 10_000;
    const DIM: usize = 64;
    const NUM_QUERIES: usize = 200;

    let data = generate_random_matrix(N, DIM, 1);
    let queries = generate_random_matrix(NUM_QUERIES, DIM, 2);

    let start = Instant::now();
    let index = QuantPivotIndex::fit(data, &FitConfig::new(16, 8).with_silent(true)).unwrap();
    let fit_time = start.elapsed();

    let start = Instant::now();
    let result = index
        .predict(&queries, &PredictConfig::new(10).with_silent(true))
        .unwrap();
    let predict_time = start.elapsed();

    verify_results(&result, N);
    println!(
        "fit {:?}, predict {:?} ({:.0} QPS), pruned {}",
        fit_time,
        predict_time,
        NUM_QUERIES as f64 / predict_time.as_secs_f64(),
        result.total_pruned()
    );
}
