//! Stateful two-call model interface.
//!
//! [`QuantPivot`] wraps an optional [`QuantPivotIndex`]: `fit` replaces it,
//! `predict` requires it. This is the shape foreign bindings expose.

use std::sync::Arc;

use crate::config::{FitConfig, PredictConfig};
use crate::data_format::Matrix;
use crate::distance_measures::ExactKernel;
use crate::error::{QuantPivotError, Result};
use crate::pivot_index::{KnnResult, QuantPivotIndex};
use crate::types::{PointId, Real};

/// Approximate KNN model with `fit`/`predict` semantics.
#[derive(Debug, Clone)]
pub struct QuantPivot<T: Real> {
    index: Option<QuantPivotIndex<T>>,
    kernel: ExactKernel,
    parallel: bool,
}

impl<T: Real> Default for QuantPivot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real> QuantPivot<T> {
    /// Create an unfitted model.
    pub fn new() -> Self {
        Self {
            index: None,
            kernel: ExactKernel::Scalar,
            parallel: true,
        }
    }

    /// Use `kernel` for exact refinement in subsequent fits.
    pub fn with_kernel(mut self, kernel: ExactKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Enable or disable rayon for subsequent calls.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the index, discarding any previous one.
    ///
    /// On error the model is left unfitted.
    pub fn fit(
        &mut self,
        dataset: impl Into<Arc<Matrix<T>>>,
        num_pivots: usize,
        quant_level: usize,
        silent: bool,
    ) -> Result<&mut Self> {
        self.index = None;
        let config = FitConfig::new(num_pivots, quant_level)
            .with_silent(silent)
            .with_parallel(self.parallel)
            .with_kernel(self.kernel);
        self.index = Some(QuantPivotIndex::fit(dataset, &config)?);
        Ok(self)
    }

    /// Search the `k` nearest neighbors of every query row.
    pub fn predict(
        &self,
        queries: &Matrix<T>,
        k: usize,
        silent: bool,
    ) -> Result<(Matrix<PointId>, Matrix<T>)> {
        Ok(self.predict_detailed(queries, k, silent)?.into_parts())
    }

    /// Like [`predict`](Self::predict), also reporting pruning counts.
    pub fn predict_detailed(&self, queries: &Matrix<T>, k: usize, silent: bool) -> Result<KnnResult<T>> {
        let index = self.index.as_ref().ok_or_else(|| {
            QuantPivotError::failed_precondition("model not fitted, call fit() before predict()")
        })?;
        let config = PredictConfig::new(k)
            .with_silent(silent)
            .with_parallel(self.parallel);
        index.predict(queries, &config)
    }

    /// Whether a successful `fit` has happened.
    pub fn is_fitted(&self) -> bool {
        self.index.is_some()
    }

    /// The fitted index, if any.
    pub fn index(&self) -> Option<&QuantPivotIndex<T>> {
        self.index.as_ref()
    }
}
