//! Distance measures for QuantPivot.
//!
//! Two kernels are involved in a query: the integer-valued approximate
//! distance between binary sketches, used for the pivot bound and candidate
//! ranking, and the exact Euclidean distance used to refine candidates.

mod approx;
mod euclidean;

pub use approx::approx_distance;
pub use euclidean::{euclidean_scalar, euclidean_simd, ExactKernel, KernelConformance};
