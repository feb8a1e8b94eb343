//! Utility functions and types for QuantPivot.

pub(crate) mod parallel;
pub mod bits;

pub use parallel::{for_each_row_mut, for_each_row_with, for_each_output_row_with, should_parallelize, MIN_PARALLEL_ROWS};
pub use bits::*;
