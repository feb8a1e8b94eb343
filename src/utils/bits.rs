//! Bit manipulation utilities for packed masks.
//!
//! Masks are stored LSB-first in `u64` words: bit `i` lives in word `i / 64`
//! at position `i % 64`.

use crate::types::align_up;

/// Number of bits per storage word.
pub const WORD_BITS: usize = 64;

/// Number of `u64` words needed to hold `num_bits` bits.
#[inline]
pub const fn words_for_bits(num_bits: usize) -> usize {
    align_up(num_bits, WORD_BITS) / WORD_BITS
}

/// Set bit `index` in a packed mask.
#[inline]
pub fn set_bit(words: &mut [u64], index: usize) {
    words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
}

/// Test bit `index` in a packed mask.
#[inline]
pub fn test_bit(words: &[u64], index: usize) -> bool {
    (words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
}

/// Count the number of set bits across all words.
#[inline]
pub fn popcount_words(words: &[u64]) -> u32 {
    words.iter().map(|w| w.count_ones()).sum()
}

/// Population count of the bitwise AND of two masks.
///
/// This is the inner product of two 0/1 vectors.
#[inline]
pub fn and_popcount(a: &[u64], b: &[u64]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x & y).count_ones())
        .sum()
}

/// Clear the lowest set bit.
#[inline]
pub fn clear_lowest_bit(x: u64) -> u64 {
    x & (x - 1)
}

/// Indices of all set bits, ascending.
pub fn compact_set_bits(bitmap: &[u64]) -> Vec<usize> {
    let mut indices = Vec::new();

    for (word_idx, &word) in bitmap.iter().enumerate() {
        let mut w = word;
        let base = word_idx * WORD_BITS;

        while w != 0 {
            indices.push(base + w.trailing_zeros() as usize);
            w = clear_lowest_bit(w);
        }
    }

    indices
}
