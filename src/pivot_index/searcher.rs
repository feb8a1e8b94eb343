//! Pivot-pruned k-nearest-neighbor search.
//!
//! For each query, the approximate distance to every pivot gives a cheap
//! bound per dataset row: `max_j |table[i][j] - q_to_pivot[j]|`. Rows whose
//! bound already reaches the current k-th approximate distance are skipped
//! without computing their own approximate distance. The surviving top-k
//! candidates are then rescored with the exact Euclidean kernel and sorted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::PredictConfig;
use crate::data_format::Matrix;
use crate::distance_measures::approx_distance;
use crate::error::{QuantPivotError, Result};
use crate::pivot_index::builder::QuantPivotIndex;
use crate::pivot_index::top_k::CandidateList;
use crate::quantization::{BinarySketch, SketchRef};
use crate::types::{NNResultsVector, PointId, Real, NO_NEIGHBOR};
use crate::utils::for_each_output_row_with;

/// Queries between two progress messages.
pub const PROGRESS_INTERVAL: usize = 100;

/// Result of a batch search.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnResult<T: Real> {
    /// nq×k neighbor ids, [`NO_NEIGHBOR`] for unfilled slots.
    pub ids: Matrix<PointId>,
    /// nq×k Euclidean distances, ascending per row; `+inf` for unfilled slots.
    pub distances: Matrix<T>,
    /// Rows skipped by the pivot bound, per query.
    pub pruned: Vec<usize>,
}

impl<T: Real> KnnResult<T> {
    /// Number of queries.
    pub fn num_queries(&self) -> usize {
        self.ids.rows()
    }

    /// Neighbors per query (k).
    pub fn k(&self) -> usize {
        self.ids.cols()
    }

    /// Filled `(id, distance)` pairs of query `q`, nearest first.
    pub fn neighbors(&self, q: usize) -> NNResultsVector<T> {
        self.ids
            .row(q)
            .iter()
            .zip(self.distances.row(q).iter())
            .filter(|&(&id, _)| id != NO_NEIGHBOR)
            .map(|(&id, &d)| (id, d))
            .collect()
    }

    /// Rows skipped by the pivot bound over all queries.
    pub fn total_pruned(&self) -> usize {
        self.pruned.iter().sum()
    }

    /// Split into the id and distance matrices.
    pub fn into_parts(self) -> (Matrix<PointId>, Matrix<T>) {
        (self.ids, self.distances)
    }
}

/// Approximate candidates of one query, before exact refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates<T: Real> {
    /// Candidate ids ranked by approximate distance, sentinel-padded to k.
    pub ids: Vec<PointId>,
    /// Approximate distances aligned with `ids`.
    pub approx_distances: Vec<T>,
    /// Rows skipped by the pivot bound.
    pub pruned: usize,
}

/// Per-task working memory for a query.
struct QueryScratch<T: Real> {
    sketch: BinarySketch,
    order: Vec<usize>,
    q_to_pivot: Vec<T>,
    candidates: CandidateList<T>,
}

impl<T: Real> QueryScratch<T> {
    fn new(dim: usize, num_pivots: usize, k: usize) -> Self {
        Self {
            sketch: BinarySketch::zeros(dim),
            order: Vec::with_capacity(dim),
            q_to_pivot: vec![T::zero(); num_pivots],
            candidates: CandidateList::new(k),
        }
    }
}

impl<T: Real> QuantPivotIndex<T> {
    /// Search the k nearest neighbors of every row of `queries`.
    pub fn predict(&self, queries: &Matrix<T>, config: &PredictConfig) -> Result<KnnResult<T>> {
        config.validate()?;
        let k = config.num_neighbors;
        let nq = queries.rows();
        if nq > 0 {
            self.check_dim(queries.cols())?;
        }

        let start = Instant::now();
        if !config.silent {
            info!(queries = nq, k, rows = self.len(), "predicting");
        }

        let mut ids = Matrix::filled(nq, k, NO_NEIGHBOR)?;
        let mut distances = Matrix::filled(nq, k, T::infinity())?;
        let mut pruned = vec![0usize; nq];

        let pivots = self.pivot_sketches();
        let done = AtomicUsize::new(0);
        let (dim, h) = (self.dim(), self.pivots.len());

        for_each_output_row_with(
            ids.as_mut_slice(),
            distances.as_mut_slice(),
            &mut pruned,
            k,
            config.parallel,
            || QueryScratch::new(dim, h, k),
            |scratch, q, id_row, dist_row, pruned_count| {
                let query = queries.row(q);
                *pruned_count = self.scan(query, &pivots, scratch);
                self.refine(query, &mut scratch.candidates);
                scratch.candidates.write_into(id_row, dist_row);

                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if !config.silent && finished % PROGRESS_INTERVAL == 0 {
                    debug!(finished, total = nq, "queries processed");
                }
            },
        );

        if !config.silent {
            let total_pruned: usize = pruned.iter().sum();
            info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                pruned = total_pruned,
                "predict finished"
            );
        }

        Ok(KnnResult {
            ids,
            distances,
            pruned,
        })
    }

    /// Search the k nearest neighbors of a single query.
    ///
    /// Returns only filled slots, nearest first.
    pub fn search(&self, query: &[T], k: usize) -> Result<NNResultsVector<T>> {
        PredictConfig::new(k).validate()?;
        self.check_dim(query.len())?;

        let pivots = self.pivot_sketches();
        let mut scratch = QueryScratch::new(self.dim(), self.pivots.len(), k);
        self.scan(query, &pivots, &mut scratch);
        self.refine(query, &mut scratch.candidates);
        Ok(scratch.candidates.to_results())
    }

    /// The approximate top-k of a single query, without exact refinement.
    pub fn candidates(&self, query: &[T], k: usize) -> Result<Candidates<T>> {
        PredictConfig::new(k).validate()?;
        self.check_dim(query.len())?;

        let pivots = self.pivot_sketches();
        let mut scratch = QueryScratch::new(self.dim(), self.pivots.len(), k);
        let pruned = self.scan(query, &pivots, &mut scratch);
        Ok(Candidates {
            ids: scratch.candidates.ids().to_vec(),
            approx_distances: scratch.candidates.scores().to_vec(),
            pruned,
        })
    }

    fn check_dim(&self, dim: usize) -> Result<()> {
        if dim != self.dim() {
            return Err(QuantPivotError::invalid_argument(format!(
                "query dimension {} does not match dataset dimension {}",
                dim,
                self.dim()
            )));
        }
        Ok(())
    }

    /// Fill `scratch.candidates` with the approximate top-k of `query`.
    /// Returns the number of pruned rows.
    fn scan(&self, query: &[T], pivots: &[SketchRef<'_>], scratch: &mut QueryScratch<T>) -> usize {
        let QueryScratch {
            sketch,
            order,
            q_to_pivot,
            candidates,
        } = scratch;

        sketch.requantize(query, self.quant_level(), order);
        let query_sketch = sketch.view();

        for (slot, pivot) in q_to_pivot.iter_mut().zip(pivots.iter()) {
            *slot = T::from_count(approx_distance(query_sketch, *pivot));
        }

        candidates.reset(candidates.capacity());
        let mut pruned = 0;

        for (i, row) in self.table.iter_rows().enumerate() {
            let mut bound = T::zero();
            for (&t, &q) in row.iter().zip(q_to_pivot.iter()) {
                let gap = (t - q).abs();
                if gap > bound {
                    bound = gap;
                }
            }

            if bound >= candidates.threshold() {
                pruned += 1;
                continue;
            }

            let d = T::from_count(approx_distance(query_sketch, self.quantized.sketch(i)));
            candidates.push(i as PointId, d);
        }

        pruned
    }

    /// Replace approximate scores with exact distances and re-sort.
    fn refine(&self, query: &[T], candidates: &mut CandidateList<T>) {
        let kernel = self.kernel;
        let dataset = &self.dataset;
        candidates.rescore(|id| kernel.distance(dataset.row(id as usize), query));
        candidates.sort_ascending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitConfig;
    use crate::error::ErrorCode;

    fn fit(rows: &[Vec<f32>], h: usize, x: usize) -> QuantPivotIndex<f32> {
        let data = Matrix::from_rows(rows).unwrap();
        QuantPivotIndex::fit(data, &FitConfig::new(h, x).with_silent(true)).unwrap()
    }

    #[test]
    fn test_square_scenario() {
        let index = fit(
            &[vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]],
            2,
            1,
        );
        let queries = Matrix::from_rows(&[vec![0.0f32, 0.0]]).unwrap();
        let result = index
            .predict(&queries, &PredictConfig::new(1).with_silent(true))
            .unwrap();

        assert_eq!(result.ids.row(0), &[0]);
        assert_eq!(result.distances.row(0), &[0.0]);
        // row 2 has bound 1 against a threshold of 1 once row 0 is in
        assert_eq!(result.pruned, vec![1]);
    }

    #[test]
    fn test_refinement_reorders_by_exact_distance() {
        let index = fit(&[vec![10.0, 10.0], vec![1.0, 1.0], vec![100.0, 100.0]], 1, 2);
        let query = [0.5f32, 0.5];

        let approx = index.candidates(&query, 2).unwrap();
        assert_eq!(approx.ids, vec![0, 1]);
        assert_eq!(approx.approx_distances, vec![2.0, 2.0]);

        let exact = index.search(&query, 2).unwrap();
        assert_eq!(exact[0].0, 1);
        assert_eq!(exact[1].0, 0);
        assert!((exact[0].1 - 0.5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_sentinel_tail_when_k_exceeds_rows() {
        let index = fit(&[vec![1.0, 2.0], vec![-3.0, 0.5]], 1, 1);
        let queries = Matrix::from_rows(&[vec![1.0f32, 2.0]]).unwrap();
        let result = index
            .predict(&queries, &PredictConfig::new(4).with_silent(true))
            .unwrap();

        assert_eq!(&result.ids.row(0)[2..], &[NO_NEIGHBOR, NO_NEIGHBOR]);
        assert!(result.distances.row(0)[2..].iter().all(|d| d.is_infinite()));
        assert_eq!(result.neighbors(0).len(), 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = fit(&[vec![1.0, 2.0], vec![3.0, 4.0]], 1, 1);
        let err = index.search(&[1.0, 2.0, 3.0], 1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let queries = Matrix::from_rows(&[vec![1.0f32]]).unwrap();
        assert!(index.predict(&queries, &PredictConfig::new(1)).is_err());
        assert!(index.search(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_empty_query_batch() {
        let index = fit(&[vec![1.0, 2.0], vec![3.0, 4.0]], 1, 1);
        let result = index
            .predict(&Matrix::empty(), &PredictConfig::new(3).with_silent(true))
            .unwrap();
        assert_eq!(result.num_queries(), 0);
        assert!(result.pruned.is_empty());
    }
}
