//! Pivot index construction.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::FitConfig;
use crate::data_format::Matrix;
use crate::distance_measures::{approx_distance, ExactKernel};
use crate::error::{QuantPivotError, Result};
use crate::pivot_index::pivots::select_pivots;
use crate::quantization::{QuantizedDataset, SketchRef};
use crate::types::{PointId, Real};
use crate::utils::for_each_row_mut;

/// A fitted quantized pivot index.
///
/// Holds a shared handle to the dataset, the pivot row ids, the packed
/// sketches of every row and the N×h table of approximate distances from each
/// row to each pivot. Immutable once built; every `fit` builds a new one.
#[derive(Debug, Clone)]
pub struct QuantPivotIndex<T: Real> {
    pub(crate) dataset: Arc<Matrix<T>>,
    pub(crate) pivots: Vec<usize>,
    pub(crate) quantized: QuantizedDataset,
    pub(crate) table: Matrix<T>,
    pub(crate) kernel: ExactKernel,
}

impl<T: Real> QuantPivotIndex<T> {
    /// Build an index over `dataset`.
    pub fn fit(dataset: impl Into<Arc<Matrix<T>>>, config: &FitConfig) -> Result<Self> {
        let dataset = dataset.into();
        config.validate()?;

        let (n, dim) = (dataset.rows(), dataset.cols());
        if n == 0 || dim == 0 {
            return Err(QuantPivotError::invalid_argument(format!(
                "dataset must be non-empty, got {}x{}",
                n, dim
            )));
        }
        check_row_count(n)?;

        let h = config.num_pivots;
        let x = config.quant_level;
        let start = Instant::now();

        if !config.silent {
            info!(rows = n, dim, pivots = h, quant_level = x, "fitting pivot index");
        }

        let pivots = select_pivots(n, h)?;

        let quantized = QuantizedDataset::from_matrix(&dataset, x, config.parallel);
        if !config.silent {
            debug!(
                bytes = quantized.memory_bytes(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "quantized dataset"
            );
        }

        let table = build_table(&quantized, &pivots, config.parallel)?;

        if !config.silent {
            info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "pivot index ready"
            );
        }

        Ok(Self {
            dataset,
            pivots,
            quantized,
            table,
            kernel: config.kernel,
        })
    }

    /// Number of indexed rows (N).
    #[inline]
    pub fn len(&self) -> usize {
        self.dataset.rows()
    }

    /// Whether the index holds no rows. Always false for a fitted index.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dataset.rows() == 0
    }

    /// Vector dimension (D).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dataset.cols()
    }

    /// Pivot row ids.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// N×h table of approximate distances from each row to each pivot.
    pub fn table(&self) -> &Matrix<T> {
        &self.table
    }

    /// Packed sketches of every dataset row.
    pub fn quantized(&self) -> &QuantizedDataset {
        &self.quantized
    }

    /// The indexed dataset.
    pub fn dataset(&self) -> &Matrix<T> {
        &self.dataset
    }

    /// Quantization budget the index was built with.
    pub fn quant_level(&self) -> usize {
        self.quantized.quant_level()
    }

    /// Kernel used for exact refinement.
    pub fn kernel(&self) -> ExactKernel {
        self.kernel
    }

    /// Sketches of the pivot rows, in pivot order.
    pub(crate) fn pivot_sketches(&self) -> Vec<SketchRef<'_>> {
        pivot_sketches(&self.quantized, &self.pivots)
    }
}

/// Result ids are `PointId`s, so every row index must fit one.
fn check_row_count(n: usize) -> Result<()> {
    if n > PointId::MAX as usize {
        return Err(QuantPivotError::invalid_argument(format!(
            "dataset has {} rows, at most {} can be indexed",
            n,
            PointId::MAX
        )));
    }
    Ok(())
}

fn pivot_sketches<'a>(quantized: &'a QuantizedDataset, pivots: &[usize]) -> Vec<SketchRef<'a>> {
    pivots.iter().map(|&p| quantized.sketch(p)).collect()
}

/// Fill the N×h table, one dataset row per table row.
fn build_table<T: Real>(
    quantized: &QuantizedDataset,
    pivots: &[usize],
    parallel: bool,
) -> Result<Matrix<T>> {
    let h = pivots.len();
    let mut table = Matrix::zeros(quantized.len(), h)?;
    let pivot_sketches = pivot_sketches(quantized, pivots);

    for_each_row_mut(table.as_mut_slice(), h, parallel, |i, row| {
        let sketch = quantized.sketch(i);
        for (cell, pivot) in row.iter_mut().zip(pivot_sketches.iter()) {
            *cell = T::from_count(approx_distance(sketch, *pivot));
        }
    });

    Ok(table)
}
