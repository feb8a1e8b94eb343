//! Configuration types for QuantPivot.
//!
//! `fit` and `predict` take their per-call options as plain values; nothing is
//! kept in process-wide state.

use serde::{Deserialize, Serialize};
use crate::distance_measures::ExactKernel;
use crate::error::{QuantPivotError, Result};

/// Options for building a pivot index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Number of pivots (h).
    pub num_pivots: usize,

    /// Quantization budget (x): coordinates kept per sketch. Clamped to D.
    pub quant_level: usize,

    /// Suppress progress narration. Errors are always reported.
    pub silent: bool,

    /// Build the index with rayon.
    pub parallel: bool,

    /// Kernel used when refining candidates at query time.
    pub kernel: ExactKernel,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            num_pivots: 16,
            quant_level: 8,
            silent: false,
            parallel: true,
            kernel: ExactKernel::Scalar,
        }
    }
}

impl FitConfig {
    /// Create a configuration with the given pivot count and quantization budget.
    pub fn new(num_pivots: usize, quant_level: usize) -> Self {
        Self {
            num_pivots,
            quant_level,
            ..Default::default()
        }
    }

    /// Enable or disable progress narration.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Enable or disable parallel construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Select the exact distance kernel.
    pub fn with_kernel(mut self, kernel: ExactKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Check the parameters that do not depend on the dataset.
    pub fn validate(&self) -> Result<()> {
        if self.num_pivots == 0 {
            return Err(QuantPivotError::invalid_argument(
                "number of pivots must be a positive integer",
            ));
        }
        if self.quant_level == 0 {
            return Err(QuantPivotError::invalid_argument(
                "quantization level must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Options for a batch of queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictConfig {
    /// Number of neighbors per query (k).
    pub num_neighbors: usize,

    /// Suppress progress narration. Errors are always reported.
    pub silent: bool,

    /// Process queries with rayon.
    pub parallel: bool,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            num_neighbors: 10,
            silent: false,
            parallel: true,
        }
    }
}

impl PredictConfig {
    /// Create a configuration returning `k` neighbors per query.
    pub fn new(k: usize) -> Self {
        Self {
            num_neighbors: k,
            ..Default::default()
        }
    }

    /// Set the number of neighbors.
    pub fn with_num_neighbors(mut self, k: usize) -> Self {
        self.num_neighbors = k;
        self
    }

    /// Enable or disable progress narration.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Enable or disable parallel query processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.num_neighbors == 0 {
            return Err(QuantPivotError::invalid_argument(
                "number of neighbors must be a positive integer",
            ));
        }
        Ok(())
    }
}
