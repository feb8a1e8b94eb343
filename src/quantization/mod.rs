//! Binary sketch quantization.
//!
//! Every vector is summarized by the signs of its `x` largest-magnitude
//! coordinates, packed as two bit masks. Sketches of the whole dataset are
//! kept in a [`QuantizedDataset`].

mod dataset;
mod sketch;

pub use dataset::QuantizedDataset;
pub use sketch::{quantize, quantize_into, BinarySketch, SketchRef};

/// Number of coordinates a sketch keeps for budget `quant_level` over `dim`.
#[inline]
pub fn effective_quant_level(quant_level: usize, dim: usize) -> usize {
    quant_level.min(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_quant_level() {
        assert_eq!(effective_quant_level(8, 4), 4);
        assert_eq!(effective_quant_level(3, 64), 3);
    }
}
