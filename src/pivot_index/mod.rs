//! Quantized pivot index.
//!
//! `fit` picks pivots by uniform striding, sketches every row and stores the
//! N×h table of approximate row-to-pivot distances. `predict` uses that table
//! to bound each row's approximate distance to a query, scans only rows that
//! can still enter the top-k, and refines the survivors with the exact
//! Euclidean kernel.

mod builder;
mod pivots;
mod searcher;
mod top_k;

pub use builder::QuantPivotIndex;
pub use pivots::select_pivots;
pub use searcher::{Candidates, KnnResult, PROGRESS_INTERVAL};
pub use top_k::CandidateList;
