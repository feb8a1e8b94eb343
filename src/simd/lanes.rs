//! Lane abstraction for the squared-L2 kernel.
//!
//! A backend only has to say how to zero a register, load one chunk, fold a
//! squared difference into an accumulator and reduce it; the chunk loop and
//! the scalar tail live here once.

use num_traits::Float;

/// A register of `LANES` floats, as the squared-L2 kernel sees it.
pub trait DistanceLanes: Copy + Send + Sync {
    /// Scalar element type.
    type Scalar: Float;

    /// Number of elements per register.
    const LANES: usize;

    /// All lanes zero.
    fn zero() -> Self;

    /// Load the first `LANES` elements of `chunk`.
    fn load(chunk: &[Self::Scalar]) -> Self;

    /// `self + (a - b)^2`, lane by lane.
    fn add_squared_diff(self, a: Self, b: Self) -> Self;

    /// Sum of all lanes.
    fn horizontal_sum(self) -> Self::Scalar;
}

/// Squared L2 distance over lane type `V`.
#[inline]
pub fn squared_l2_lanes<V: DistanceLanes>(a: &[V::Scalar], b: &[V::Scalar]) -> V::Scalar {
    debug_assert_eq!(a.len(), b.len());

    let split = a.len() - a.len() % V::LANES;
    let acc = a[..split]
        .chunks_exact(V::LANES)
        .zip(b[..split].chunks_exact(V::LANES))
        .fold(V::zero(), |acc, (ca, cb)| {
            acc.add_squared_diff(V::load(ca), V::load(cb))
        });

    acc.horizontal_sum() + squared_l2_tail(&a[split..], &b[split..])
}

/// Scalar squared L2 for the elements left over after the last full register.
#[inline]
pub fn squared_l2_tail<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |sum, (&x, &y)| {
        let d = x - y;
        sum + d * d
    })
}
