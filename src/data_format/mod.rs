//! Data format types for QuantPivot.
//!
//! Every dense collection the index touches (dataset, queries, pivot-distance
//! table, results) is a row-major [`Matrix`].

mod matrix;

pub use matrix::Matrix;
