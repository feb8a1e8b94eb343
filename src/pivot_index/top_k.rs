//! Fixed-capacity candidate list for the pivot search.
//!
//! Keeps the k best (smallest) scores seen so far in ascending order. Unlike
//! a heap, the k-th score is always at the tail, which is exactly the pruning
//! threshold the searcher compares against.

use crate::types::{NNResultsVector, PointId, Real, NO_NEIGHBOR};

/// Sorted list of the k best candidates.
///
/// Unfilled slots hold id [`NO_NEIGHBOR`] and an infinite score.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateList<T> {
    ids: Vec<PointId>,
    scores: Vec<T>,
}

impl<T: Real> CandidateList<T> {
    /// Create an empty list of capacity `k`.
    pub fn new(k: usize) -> Self {
        Self {
            ids: vec![NO_NEIGHBOR; k],
            scores: vec![T::infinity(); k],
        }
    }

    /// Reset every slot to the sentinel, resizing to capacity `k`.
    pub fn reset(&mut self, k: usize) {
        self.ids.clear();
        self.ids.resize(k, NO_NEIGHBOR);
        self.scores.clear();
        self.scores.resize(k, T::infinity());
    }

    /// Capacity (k).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ids.len()
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.ids.iter().filter(|&&id| id != NO_NEIGHBOR).count()
    }

    /// Whether no slot is filled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Score of the k-th slot; `+inf` until the list is full.
    #[inline]
    pub fn threshold(&self) -> T {
        self.scores.last().copied().unwrap_or_else(T::neg_infinity)
    }

    /// Insert `(id, score)` if it beats the current threshold.
    ///
    /// Worse entries shift down one slot and the last one falls off. Ties do
    /// not displace existing entries.
    pub fn push(&mut self, id: PointId, score: T) -> bool {
        let k = self.capacity();
        if k == 0 || !(score < self.scores[k - 1]) {
            return false;
        }

        let mut pos = k - 1;
        while pos > 0 && score < self.scores[pos - 1] {
            self.scores[pos] = self.scores[pos - 1];
            self.ids[pos] = self.ids[pos - 1];
            pos -= 1;
        }
        self.scores[pos] = score;
        self.ids[pos] = id;
        true
    }

    /// Candidate ids, best first.
    #[inline]
    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    /// Candidate scores, aligned with [`ids`](Self::ids).
    #[inline]
    pub fn scores(&self) -> &[T] {
        &self.scores
    }

    /// Replace the score of every filled slot with `rescore(id)`.
    pub fn rescore<F>(&mut self, mut rescore: F)
    where
        F: FnMut(PointId) -> T,
    {
        for (id, score) in self.ids.iter().zip(self.scores.iter_mut()) {
            if *id != NO_NEIGHBOR {
                *score = rescore(*id);
            }
        }
    }

    /// Stable insertion sort by ascending score.
    pub fn sort_ascending(&mut self) {
        for i in 1..self.scores.len() {
            let mut j = i;
            while j > 0 && self.scores[j] < self.scores[j - 1] {
                self.scores.swap(j, j - 1);
                self.ids.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    /// Copy into caller-provided output rows of length k.
    pub fn write_into(&self, ids: &mut [PointId], scores: &mut [T]) {
        ids.copy_from_slice(&self.ids);
        scores.copy_from_slice(&self.scores);
    }

    /// Filled entries as `(id, score)` pairs, best first.
    pub fn to_results(&self) -> NNResultsVector<T> {
        self.ids
            .iter()
            .zip(self.scores.iter())
            .filter(|&(&id, _)| id != NO_NEIGHBOR)
            .map(|(&id, &s)| (id, s))
            .collect()
    }
}
