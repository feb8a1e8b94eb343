//! Exact Euclidean distance kernels.
//!
//! The scalar kernel is the reference; the SIMD kernel is checked against it
//! with [`ExactKernel::conformance`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_format::Matrix;
use crate::error::{QuantPivotError, Result};
use crate::types::Real;

/// Strategy used to compute exact Euclidean distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExactKernel {
    /// Plain accumulation loop.
    #[default]
    Scalar,
    /// Runtime-dispatched SIMD (AVX2+FMA or portable `wide` lanes).
    Simd,
}

impl ExactKernel {
    /// Euclidean distance between `a` and `b`.
    #[inline]
    pub fn distance<T: Real>(self, a: &[T], b: &[T]) -> T {
        match self {
            ExactKernel::Scalar => euclidean_scalar(a, b),
            ExactKernel::Simd => euclidean_simd(a, b),
        }
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ExactKernel::Scalar => "scalar",
            ExactKernel::Simd => "simd",
        }
    }

    /// Compare the SIMD kernel with the scalar one on up to `max_pairs` row
    /// pairs `(a.row(i), b.row(i))`.
    ///
    /// A pair passes when `|simd - scalar| <= tol * max(1, scalar)`.
    pub fn conformance<T: Real>(
        a: &Matrix<T>,
        b: &Matrix<T>,
        max_pairs: usize,
        tol: T,
    ) -> Result<KernelConformance<T>> {
        if a.cols() != b.cols() {
            return Err(QuantPivotError::invalid_argument(format!(
                "dimension mismatch: {} vs {}",
                a.cols(),
                b.cols()
            )));
        }

        let pairs = max_pairs.min(a.rows()).min(b.rows());
        let mut report = KernelConformance {
            pairs,
            passed: 0,
            max_abs_diff: T::zero(),
        };

        for i in 0..pairs {
            let reference = euclidean_scalar(a.row(i), b.row(i));
            let simd = euclidean_simd(a.row(i), b.row(i));
            let diff = (simd - reference).abs();

            if diff > report.max_abs_diff {
                report.max_abs_diff = diff;
            }
            if diff <= tol * reference.max(T::one()) {
                report.passed += 1;
            }
        }

        Ok(report)
    }
}

impl fmt::Display for ExactKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExactKernel {
    type Err = QuantPivotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(ExactKernel::Scalar),
            "simd" => Ok(ExactKernel::Simd),
            other => Err(QuantPivotError::invalid_argument(format!(
                "unknown kernel '{}', expected 'scalar' or 'simd'",
                other
            ))),
        }
    }
}

/// Outcome of a scalar/SIMD kernel comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConformance<T> {
    /// Number of row pairs compared.
    pub pairs: usize,
    /// Pairs within tolerance.
    pub passed: usize,
    /// Largest absolute difference observed.
    pub max_abs_diff: T,
}

impl<T> KernelConformance<T> {
    /// Whether every compared pair passed.
    pub fn all_passed(&self) -> bool {
        self.passed == self.pairs
    }
}

/// Euclidean distance with a plain scalar loop.
#[inline]
pub fn euclidean_scalar<T: Real>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    let mut sum = T::zero();
    for (&x, &y) in a.iter().zip(b.iter()) {
        let d = x - y;
        sum = sum + d * d;
    }
    sum.sqrt()
}

/// Euclidean distance with the best SIMD path available at runtime.
#[inline]
pub fn euclidean_simd<T: Real>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    T::squared_l2_simd(a, b).sqrt()
}
