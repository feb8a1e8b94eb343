//! # QuantPivot - Approximate KNN with a quantized pivot index
//!
//! Approximate k-nearest-neighbor search over fixed-dimension real vectors.
//! Every vector is reduced to a binary sketch of the signs of its largest
//! coordinates; a small set of pivots and a table of sketch distances bound
//! which dataset rows can still enter a query's top-k, and the survivors are
//! refined with the exact Euclidean distance.
//!
//! ## Overview
//!
//! - **Quantization**: sign sketches of the `x` largest-magnitude coordinates
//! - **Approximate distance**: popcount of AND-ed plus/minus masks
//! - **Pivot index**: uniform pivots and an N×h table of sketch distances
//! - **Exact refinement**: scalar or SIMD (AVX2/`wide`) Euclidean kernels
//! - **ds2 I/O**: the little-endian matrix file format used by the CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use quantpivot::prelude::*;
//!
//! let data = Matrix::from_rows(&[
//!     vec![0.0f32, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![5.0, 5.0],
//! ]).unwrap();
//!
//! let index = QuantPivotIndex::fit(data, &FitConfig::new(2, 1).with_silent(true)).unwrap();
//!
//! let queries = Matrix::from_rows(&[vec![0.0f32, 0.0]]).unwrap();
//! let result = index.predict(&queries, &PredictConfig::new(1).with_silent(true)).unwrap();
//!
//! assert_eq!(result.ids.row(0), &[0]);
//! assert_eq!(result.distances.row(0), &[0.0]);
//! ```
//!
//! ## Model Interface
//!
//! [`QuantPivot`] keeps the index between calls, the way bindings use it:
//!
//! ```rust
//! use quantpivot::prelude::*;
//!
//! let data: Vec<Vec<f64>> = (0..100)
//!     .map(|i| (0..8).map(|j| ((i * 7 + j) % 11) as f64).collect())
//!     .collect();
//!
//! let mut model = QuantPivot::new();
//! model.fit(Matrix::from_rows(&data).unwrap(), 8, 4, true).unwrap();
//!
//! let (ids, dists) = model.predict(&Matrix::from_rows(&data[..3]).unwrap(), 5, true).unwrap();
//! assert_eq!(ids.cols(), 5);
//! assert_eq!(dists.rows(), 3);
//! ```
//!
//! ## Module Overview
//!
//! - [`quantization`]: Binary sketches and the quantized dataset
//! - [`distance_measures`]: Approximate and exact distance kernels
//! - [`pivot_index`]: Index construction and pruned search
//! - [`data_format`]: Aligned row-major matrices
//! - [`io`]: ds2 matrix files
//! - [`simd`]: Low-level SIMD operations

// Allow some clippy lints that are not critical
#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::module_inception)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod data_format;
pub mod distance_measures;
pub mod io;
pub mod pivot_index;
pub mod quantization;
pub mod simd;
pub mod utils;

mod config;
mod error;
mod model;
mod types;

pub use config::{FitConfig, PredictConfig};
pub use error::{ErrorCode, QuantPivotError, Result};
pub use model::QuantPivot;
pub use pivot_index::{KnnResult, QuantPivotIndex};
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{FitConfig, PredictConfig};
    pub use crate::data_format::Matrix;
    pub use crate::distance_measures::{approx_distance, ExactKernel};
    pub use crate::error::{ErrorCode, QuantPivotError, Result};
    pub use crate::io::{read_matrix, write_matrix};
    pub use crate::model::QuantPivot;
    pub use crate::pivot_index::{Candidates, KnnResult, QuantPivotIndex};
    pub use crate::quantization::{quantize, BinarySketch, QuantizedDataset};
    pub use crate::types::*;
}
