//! Core type definitions for QuantPivot.
//!
//! This module contains the element traits used throughout the library: the
//! storage-level [`MatrixElement`] (anything a ds2 matrix can hold) and the
//! numeric [`Real`] precision parameter of the index.

use num_traits::Float;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::io::{self, Write};
use std::iter::Sum;

/// Identifier of a dataset row in a result set.
///
/// Stored as a signed 32-bit integer so that [`NO_NEIGHBOR`] fits in the
/// same column as real row indices.
pub type PointId = i32;

/// Sentinel id of a candidate slot that was never filled.
pub const NO_NEIGHBOR: PointId = -1;

/// A nearest neighbor result: (id, distance).
pub type NNResultPair<T> = (PointId, T);

/// Vector of nearest neighbor results.
pub type NNResultsVector<T> = Vec<NNResultPair<T>>;

/// Trait for values that can be stored in a [`Matrix`](crate::data_format::Matrix)
/// and exchanged through the ds2 format.
pub trait MatrixElement: Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Required byte alignment of a matrix buffer holding this type.
    const ALIGNMENT: usize;

    /// Size in bytes of one encoded element.
    const BYTES: usize;

    /// Decode one element from exactly `Self::BYTES` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Write the little-endian encoding of this element.
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()>;
}

impl MatrixElement for f32 {
    const ALIGNMENT: usize = 16;
    const BYTES: usize = 4;

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[inline]
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_le_bytes())
    }
}

impl MatrixElement for f64 {
    const ALIGNMENT: usize = 32;
    const BYTES: usize = 8;

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        f64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
            bytes[4], bytes[5], bytes[6], bytes[7],
        ])
    }

    #[inline]
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_le_bytes())
    }
}

impl MatrixElement for i32 {
    const ALIGNMENT: usize = 16;
    const BYTES: usize = 4;

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[inline]
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_le_bytes())
    }
}

/// Floating-point precision of the index.
///
/// Implemented for `f32` and `f64`; every index operation is generic over it.
pub trait Real: MatrixElement + Float + Sum + Display {
    /// Tolerance used when comparing the SIMD and scalar Euclidean kernels.
    const KERNEL_TOLERANCE: Self;

    /// Convert a popcount-based approximate distance.
    fn from_count(count: i32) -> Self;

    /// Squared L2 distance using the best SIMD path available at runtime.
    fn squared_l2_simd(a: &[Self], b: &[Self]) -> Self;

    /// IEEE 754 `totalOrder`; NaNs sort after every finite value.
    fn total_order(&self, other: &Self) -> Ordering;
}

impl Real for f32 {
    const KERNEL_TOLERANCE: Self = 1e-5;

    #[inline]
    fn from_count(count: i32) -> Self {
        count as f32
    }

    #[inline]
    fn squared_l2_simd(a: &[Self], b: &[Self]) -> Self {
        crate::simd::squared_l2_f32(a, b)
    }

    #[inline]
    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl Real for f64 {
    const KERNEL_TOLERANCE: Self = 1e-9;

    #[inline]
    fn from_count(count: i32) -> Self {
        count as f64
    }

    #[inline]
    fn squared_l2_simd(a: &[Self], b: &[Self]) -> Self {
        crate::simd::squared_l2_f64(a, b)
    }

    #[inline]
    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Check if a pointer satisfies the alignment required for `T`.
#[inline]
pub fn is_aligned_for<T: MatrixElement>(ptr: *const T) -> bool {
    (ptr as usize) % T::ALIGNMENT == 0
}

/// Round up to the nearest multiple of alignment.
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_follows_width() {
        assert_eq!(<f32 as MatrixElement>::ALIGNMENT, 16);
        assert_eq!(<f64 as MatrixElement>::ALIGNMENT, 32);
        assert_eq!(<i32 as MatrixElement>::ALIGNMENT, 16);
    }

    #[test]
    fn test_le_encoding() {
        let mut out = Vec::new();
        1.5f32.write_le(&mut out).unwrap();
        (-2i32).write_le(&mut out).unwrap();
        0.25f64.write_le(&mut out).unwrap();
        assert_eq!(out.len(), 16);
        assert_eq!(f32::from_le_slice(&out[0..4]), 1.5);
        assert_eq!(i32::from_le_slice(&out[4..8]), -2);
        assert_eq!(f64::from_le_slice(&out[8..16]), 0.25);
    }

    #[test]
    fn test_total_order_places_nan_last() {
        assert_eq!(1.0f32.total_order(&f32::NAN), Ordering::Less);
        assert_eq!(f64::NAN.total_order(&f64::INFINITY), Ordering::Greater);
        assert_eq!((-0.0f64).total_order(&0.0), Ordering::Less);
    }

    #[test]
    fn test_from_count() {
        assert_eq!(f32::from_count(-3), -3.0);
        assert_eq!(f64::from_count(7), 7.0);
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 64), 0);
        assert_eq!(align_up(1, 64), 64);
        assert_eq!(align_up(64, 64), 64);
        assert_eq!(align_up(65, 64), 128);
    }
}
