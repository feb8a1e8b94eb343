//! Runtime selection of the squared-L2 backend.
//!
//! CPU features are probed once per process and cached.

use std::sync::OnceLock;

use crate::simd::lanes::squared_l2_lanes;
use crate::simd::portable::{PortableF32x8, PortableF64x4};

/// Backend the SIMD Euclidean kernel runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdSupportLevel {
    /// `wide` lanes; available everywhere.
    Portable,
    /// AVX2 with FMA intrinsics.
    #[cfg(target_arch = "x86_64")]
    Avx2Fma,
}

impl SimdSupportLevel {
    fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
                return Self::Avx2Fma;
            }
        }
        Self::Portable
    }
}

static SUPPORT_LEVEL: OnceLock<SimdSupportLevel> = OnceLock::new();

/// The backend detected for this CPU.
pub fn simd_support_level() -> SimdSupportLevel {
    *SUPPORT_LEVEL.get_or_init(SimdSupportLevel::detect)
}

/// Squared L2 distance of two f32 slices on the detected backend.
pub fn squared_l2_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    match simd_support_level() {
        // SAFETY: Avx2Fma is only detected when both features are present.
        #[cfg(target_arch = "x86_64")]
        SimdSupportLevel::Avx2Fma => unsafe { crate::simd::x86::squared_l2_f32_avx2(a, b) },
        SimdSupportLevel::Portable => squared_l2_lanes::<PortableF32x8>(a, b),
    }
}

/// Squared L2 distance of two f64 slices on the detected backend.
pub fn squared_l2_f64(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    match simd_support_level() {
        // SAFETY: Avx2Fma is only detected when both features are present.
        #[cfg(target_arch = "x86_64")]
        SimdSupportLevel::Avx2Fma => unsafe { crate::simd::x86::squared_l2_f64_avx2(a, b) },
        SimdSupportLevel::Portable => squared_l2_lanes::<PortableF64x4>(a, b),
    }
}
