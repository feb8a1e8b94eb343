//! Sign-of-largest-coordinates quantizer.
//!
//! A vector of dimension D is reduced to two disjoint bit masks over its
//! coordinates: the `x` coordinates of largest magnitude are kept, positive
//! ones (including zero) in `plus` and negative ones in `minus`. All other
//! coordinates are dropped.

use std::cmp::Ordering;

use crate::error::{QuantPivotError, Result};
use crate::quantization::effective_quant_level;
use crate::types::Real;
use crate::utils::{popcount_words, set_bit, test_bit, words_for_bits};

/// Borrowed view of a packed sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SketchRef<'a> {
    /// Coordinates kept with a non-negative sign.
    pub plus: &'a [u64],
    /// Coordinates kept with a negative sign.
    pub minus: &'a [u64],
}

impl<'a> SketchRef<'a> {
    /// Split a packed `[plus | minus]` row into its two masks.
    #[inline]
    pub fn from_row(row: &'a [u64]) -> Self {
        let (plus, minus) = row.split_at(row.len() / 2);
        Self { plus, minus }
    }

    /// Total number of kept coordinates.
    pub fn set_bits(&self) -> u32 {
        popcount_words(self.plus) + popcount_words(self.minus)
    }
}

/// Owned quantized sketch of one vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySketch {
    dim: usize,
    plus: Vec<u64>,
    minus: Vec<u64>,
}

impl BinarySketch {
    /// An all-zero sketch over `dim` coordinates.
    pub fn zeros(dim: usize) -> Self {
        let words = words_for_bits(dim);
        Self {
            dim,
            plus: vec![0; words],
            minus: vec![0; words],
        }
    }

    /// Build a sketch from explicit boolean masks.
    pub fn from_masks(plus: &[bool], minus: &[bool]) -> Result<Self> {
        if plus.len() != minus.len() {
            return Err(QuantPivotError::invalid_argument(format!(
                "mask length mismatch: plus has {} coordinates, minus has {}",
                plus.len(),
                minus.len()
            )));
        }

        let mut sketch = Self::zeros(plus.len());
        for (i, (&p, &m)) in plus.iter().zip(minus.iter()).enumerate() {
            if p && m {
                return Err(QuantPivotError::invalid_argument(format!(
                    "coordinate {} is set in both masks",
                    i
                )));
            }
            if p || m {
                sketch.mark(i, m);
            }
        }
        Ok(sketch)
    }

    /// Dimension of the sketched vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether coordinate `i` was kept with a non-negative sign.
    pub fn is_plus(&self, i: usize) -> bool {
        test_bit(&self.plus, i)
    }

    /// Whether coordinate `i` was kept with a negative sign.
    pub fn is_minus(&self, i: usize) -> bool {
        test_bit(&self.minus, i)
    }

    /// Total number of kept coordinates.
    pub fn set_bits(&self) -> u32 {
        self.view().set_bits()
    }

    /// Borrow as a [`SketchRef`].
    #[inline]
    pub fn view(&self) -> SketchRef<'_> {
        SketchRef {
            plus: &self.plus,
            minus: &self.minus,
        }
    }

    pub(crate) fn mark(&mut self, i: usize, negative: bool) {
        if negative {
            set_bit(&mut self.minus, i);
        } else {
            set_bit(&mut self.plus, i);
        }
    }

    /// Re-quantize `v` into this sketch, reusing its storage.
    ///
    /// `order` is scratch space for the coordinate ranking.
    pub fn requantize<T: Real>(&mut self, v: &[T], x: usize, order: &mut Vec<usize>) {
        if v.len() != self.dim {
            *self = Self::zeros(v.len());
        }
        quantize_into(v, x, order, &mut self.plus, &mut self.minus);
    }
}

/// Quantize `v` keeping its `min(x, D)` largest-magnitude coordinates.
pub fn quantize<T: Real>(v: &[T], x: usize) -> BinarySketch {
    let mut sketch = BinarySketch::zeros(v.len());
    let mut order = Vec::with_capacity(v.len());
    quantize_into(v, x, &mut order, &mut sketch.plus, &mut sketch.minus);
    sketch
}

/// Quantize `v` into caller-owned mask words.
///
/// `plus` and `minus` must each hold `words_for_bits(v.len())` words; they are
/// cleared first. Ties in magnitude go to the lower coordinate index, so the
/// result is a pure function of `(v, x)`.
pub fn quantize_into<T: Real>(
    v: &[T],
    x: usize,
    order: &mut Vec<usize>,
    plus: &mut [u64],
    minus: &mut [u64],
) {
    debug_assert_eq!(plus.len(), words_for_bits(v.len()));
    debug_assert_eq!(minus.len(), plus.len());

    plus.fill(0);
    minus.fill(0);

    let keep = effective_quant_level(x, v.len());
    if keep == 0 {
        return;
    }

    order.clear();
    order.extend(0..v.len());

    let by_magnitude = |&a: &usize, &b: &usize| -> Ordering {
        v[b].abs().total_order(&v[a].abs()).then(a.cmp(&b))
    };
    if keep < order.len() {
        order.select_nth_unstable_by(keep - 1, by_magnitude);
    }

    for &i in &order[..keep] {
        if v[i] >= T::zero() {
            set_bit(plus, i);
        } else {
            set_bit(minus, i);
        }
    }
}
