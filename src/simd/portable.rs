//! `wide`-backed lanes, used wherever AVX2+FMA is not detected.

use wide::{f32x8, f64x4};

use crate::simd::lanes::DistanceLanes;

/// Eight f32 lanes.
#[derive(Clone, Copy)]
pub struct PortableF32x8(pub f32x8);

impl DistanceLanes for PortableF32x8 {
    type Scalar = f32;
    const LANES: usize = 8;

    #[inline]
    fn zero() -> Self {
        Self(f32x8::ZERO)
    }

    #[inline]
    fn load(chunk: &[f32]) -> Self {
        let mut lanes = [0.0f32; 8];
        lanes.copy_from_slice(&chunk[..8]);
        Self(f32x8::from(lanes))
    }

    #[inline]
    fn add_squared_diff(self, a: Self, b: Self) -> Self {
        let d = a.0 - b.0;
        Self(d.mul_add(d, self.0))
    }

    #[inline]
    fn horizontal_sum(self) -> f32 {
        self.0.reduce_add()
    }
}

/// Four f64 lanes.
#[derive(Clone, Copy)]
pub struct PortableF64x4(pub f64x4);

impl DistanceLanes for PortableF64x4 {
    type Scalar = f64;
    const LANES: usize = 4;

    #[inline]
    fn zero() -> Self {
        Self(f64x4::ZERO)
    }

    #[inline]
    fn load(chunk: &[f64]) -> Self {
        let mut lanes = [0.0f64; 4];
        lanes.copy_from_slice(&chunk[..4]);
        Self(f64x4::from(lanes))
    }

    #[inline]
    fn add_squared_diff(self, a: Self, b: Self) -> Self {
        let d = a.0 - b.0;
        Self(d.mul_add(d, self.0))
    }

    #[inline]
    fn horizontal_sum(self) -> f64 {
        self.0.reduce_add()
    }
}
