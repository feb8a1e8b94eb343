//! Packed sketches of a whole dataset.

use crate::data_format::Matrix;
use crate::quantization::sketch::{quantize_into, BinarySketch, SketchRef};
use crate::types::Real;
use crate::utils::{compact_set_bits, for_each_row_with, words_for_bits};

/// Quantized sketches of every row of a dataset, stored contiguously.
///
/// Each row occupies `2 * words_per_mask` words: the plus mask followed by
/// the minus mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedDataset {
    data: Vec<u64>,
    rows: usize,
    dim: usize,
    words_per_mask: usize,
    quant_level: usize,
}

impl QuantizedDataset {
    /// Quantize every row of `dataset` with budget `quant_level`.
    pub fn from_matrix<T: Real>(dataset: &Matrix<T>, quant_level: usize, parallel: bool) -> Self {
        let rows = dataset.rows();
        let dim = dataset.cols();
        let words_per_mask = words_for_bits(dim);
        let row_len = 2 * words_per_mask;
        let mut data = vec![0u64; rows * row_len];

        for_each_row_with(
            &mut data,
            row_len,
            parallel,
            || Vec::with_capacity(dim),
            |order, i, packed| {
                let (plus, minus) = packed.split_at_mut(words_per_mask);
                quantize_into(dataset.row(i), quant_level, order, plus, minus);
            },
        );

        Self {
            data,
            rows,
            dim,
            words_per_mask,
            quant_level,
        }
    }

    /// Number of sketched rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether no rows are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Dimension of the sketched vectors.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Words per mask (`ceil(D / 64)`).
    #[inline]
    pub fn words_per_mask(&self) -> usize {
        self.words_per_mask
    }

    /// Quantization budget the sketches were built with.
    #[inline]
    pub fn quant_level(&self) -> usize {
        self.quant_level
    }

    /// Borrow the sketch of row `i`.
    #[inline]
    pub fn sketch(&self, i: usize) -> SketchRef<'_> {
        let row_len = 2 * self.words_per_mask;
        SketchRef::from_row(&self.data[i * row_len..(i + 1) * row_len])
    }

    /// Copy out the sketch of row `i`.
    pub fn to_sketch(&self, i: usize) -> BinarySketch {
        let s = self.sketch(i);
        let mut out = BinarySketch::zeros(self.dim);
        for bit in compact_set_bits(s.plus) {
            out.mark(bit, false);
        }
        for bit in compact_set_bits(s.minus) {
            out.mark(bit, true);
        }
        out
    }

    /// Bytes held by the packed masks.
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantization::quantize;

    fn sample() -> Matrix<f32> {
        Matrix::from_rows(&[
            vec![0.5, -2.0, 1.0],
            vec![3.0, 0.0, -0.1],
            vec![-1.0, -1.0, 4.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_rows_match_single_quantize() {
        let m = sample();
        let q = QuantizedDataset::from_matrix(&m, 2, false);

        assert_eq!(q.len(), 3);
        assert_eq!(q.words_per_mask(), 1);
        for i in 0..m.rows() {
            assert_eq!(q.to_sketch(i), quantize(m.row(i), 2));
            assert_eq!(q.sketch(i).set_bits(), 2);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<Vec<f64>> = (0..600)
            .map(|i| (0..70).map(|j| ((i * 31 + j * 7) % 23) as f64 - 11.0).collect())
            .collect();
        let m = Matrix::from_rows(&rows).unwrap();

        let seq = QuantizedDataset::from_matrix(&m, 9, false);
        let par = QuantizedDataset::from_matrix(&m, 9, true);
        assert_eq!(seq, par);
        assert_eq!(seq.words_per_mask(), 2);
        assert_eq!(seq.memory_bytes(), 600 * 4 * 8);
    }
}
