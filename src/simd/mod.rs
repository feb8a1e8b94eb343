//! SIMD backends for the exact Euclidean kernel.
//!
//! - `lanes`: the register interface and the generic chunk loop
//! - `portable`: `wide` registers, used on every target
//! - `x86`: AVX2+FMA intrinsics on x86_64
//! - `dispatch`: one-time CPU detection and the public entry points

pub mod dispatch;
pub mod lanes;
pub mod portable;
#[cfg(target_arch = "x86_64")]
pub mod x86;


pub use dispatch::{simd_support_level, squared_l2_f32, squared_l2_f64, SimdSupportLevel};
pub use lanes::{squared_l2_lanes, DistanceLanes};
pub use portable::{PortableF32x8, PortableF64x4};
