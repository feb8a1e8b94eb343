//! Property-based tests for QuantPivot components.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Sketches keep exactly `min(x, D)` coordinates with the right signs
//! - The approximate distance is symmetric
//! - The Euclidean kernels agree and behave like a distance
//! - Search results are sorted and free of duplicates

use proptest::prelude::*;
use quantpivot::distance_measures::{euclidean_scalar, euclidean_simd};
use quantpivot::pivot_index::CandidateList;
use quantpivot::prelude::*;

prop_compose! {
    fn arb_vector(dim: usize)(vec in prop::collection::vec(-10.0f32..10.0, dim)) -> Vec<f32> {
        vec
    }
}

prop_compose! {
    fn arb_pair(max_dim: usize)(dim in 1..max_dim)(
        a in arb_vector(dim),
        b in arb_vector(dim),
    ) -> (Vec<f32>, Vec<f32>) {
        (a, b)
    }
}

mod sketch_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn sketch_keeps_budgeted_coordinates(
            v in arb_vector(70),
            x in 1usize..90,
        ) {
            let s = quantize(&v, x);
            prop_assert_eq!(s.set_bits() as usize, x.min(v.len()));

            let kept: Vec<usize> = (0..v.len()).filter(|&i| s.is_plus(i) || s.is_minus(i)).collect();
            let min_kept = kept.iter().map(|&i| v[i].abs()).fold(f32::INFINITY, f32::min);
            for i in 0..v.len() {
                prop_assert!(!(s.is_plus(i) && s.is_minus(i)));
                if s.is_plus(i) {
                    prop_assert!(v[i] >= 0.0);
                } else if s.is_minus(i) {
                    prop_assert!(v[i] < 0.0);
                } else {
                    prop_assert!(v[i].abs() <= min_kept);
                }
            }
        }

        #[test]
        fn approx_distance_symmetric((a, b) in arb_pair(40), x in 1usize..12) {
            let sa = quantize(&a, x);
            let sb = quantize(&b, x);
            prop_assert_eq!(approx_distance(sa.view(), sb.view()), approx_distance(sb.view(), sa.view()));
        }

        #[test]
        fn approx_self_distance_is_set_bits(v in arb_vector(33), x in 1usize..40) {
            let s = quantize(&v, x);
            prop_assert_eq!(approx_distance(s.view(), s.view()), s.set_bits() as i32);
        }
    }
}

mod euclidean_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn euclidean_symmetric_and_non_negative((a, b) in arb_pair(80)) {
            let d_ab = euclidean_scalar(&a, &b);
            let d_ba = euclidean_scalar(&b, &a);
            prop_assert!(d_ab >= 0.0);
            prop_assert!((d_ab - d_ba).abs() < 1e-6, "not symmetric: {} vs {}", d_ab, d_ba);
        }

        #[test]
        fn euclidean_self_is_zero(v in arb_vector(45)) {
            prop_assert_eq!(euclidean_scalar(&v, &v), 0.0);
            prop_assert_eq!(euclidean_simd(&v, &v), 0.0);
        }

        #[test]
        fn simd_matches_scalar((a, b) in arb_pair(300)) {
            let scalar = euclidean_scalar(&a, &b);
            let simd = euclidean_simd(&a, &b);
            prop_assert!(
                (simd - scalar).abs() <= 1e-4 * scalar.max(1.0),
                "simd {} vs scalar {}",
                simd,
                scalar
            );
        }
    }
}

mod search_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn candidate_list_keeps_smallest_scores(
            scores in prop::collection::vec(-100i32..100, 0..60),
            k in 1usize..10,
        ) {
            let mut list = CandidateList::<f64>::new(k);
            for (i, &s) in scores.iter().enumerate() {
                list.push(i as i32, s as f64);
            }

            let mut expected: Vec<(i32, f64)> = scores
                .iter()
                .enumerate()
                .map(|(i, &s)| (i as i32, s as f64))
                .collect();
            expected.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            expected.truncate(k);

            prop_assert_eq!(list.to_results(), expected);
        }

        #[test]
        fn predict_rows_sorted_and_unique(
            rows in prop::collection::vec(arb_vector(6), 2..40),
            query in arb_vector(6),
            h in 1usize..6,
            x in 1usize..7,
            k in 1usize..8,
        ) {
            let n = rows.len();
            let h = h.min(n);
            let index = QuantPivotIndex::fit(
                Matrix::from_rows(&rows).unwrap(),
                &FitConfig::new(h, x).with_silent(true),
            ).unwrap();

            let hits = index.search(&query, k).unwrap();
            prop_assert!(!hits.is_empty());
            prop_assert!(hits.len() <= k.min(n));
            prop_assert!(hits.windows(2).all(|w| w[0].1 <= w[1].1));

            let mut ids: Vec<i32> = hits.iter().map(|h| h.0).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), hits.len());

            for (id, d) in hits {
                let exact = euclidean_scalar(&rows[id as usize], &query);
                prop_assert_eq!(d, exact);
            }
        }
    }
}
