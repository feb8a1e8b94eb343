//! AVX2+FMA squared-L2 kernels.
//!
//! Callers must have detected AVX2 and FMA; [`super::dispatch`] does that once.

use std::arch::x86_64::*;

use crate::simd::lanes::squared_l2_tail;

/// Squared L2 distance of two f32 slices.
///
/// # Safety
/// The CPU must support AVX2 and FMA.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn squared_l2_f32_avx2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let split = a.len() - a.len() % 8;
    let mut acc = _mm256_setzero_ps();
    for (ca, cb) in a[..split].chunks_exact(8).zip(b[..split].chunks_exact(8)) {
        let d = _mm256_sub_ps(_mm256_loadu_ps(ca.as_ptr()), _mm256_loadu_ps(cb.as_ptr()));
        acc = _mm256_fmadd_ps(d, d, acc);
    }

    // fold the two 128-bit halves, then pairwise-add down to one lane
    let q = _mm_add_ps(_mm256_castps256_ps128(acc), _mm256_extractf128_ps::<1>(acc));
    let q = _mm_hadd_ps(q, q);
    let q = _mm_hadd_ps(q, q);

    _mm_cvtss_f32(q) + squared_l2_tail(&a[split..], &b[split..])
}

/// Squared L2 distance of two f64 slices.
///
/// # Safety
/// The CPU must support AVX2 and FMA.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn squared_l2_f64_avx2(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let split = a.len() - a.len() % 4;
    let mut acc = _mm256_setzero_pd();
    for (ca, cb) in a[..split].chunks_exact(4).zip(b[..split].chunks_exact(4)) {
        let d = _mm256_sub_pd(_mm256_loadu_pd(ca.as_ptr()), _mm256_loadu_pd(cb.as_ptr()));
        acc = _mm256_fmadd_pd(d, d, acc);
    }

    let q = _mm_add_pd(_mm256_castpd256_pd128(acc), _mm256_extractf128_pd::<1>(acc));
    let q = _mm_hadd_pd(q, q);

    _mm_cvtsd_f64(q) + squared_l2_tail(&a[split..], &b[split..])
}
