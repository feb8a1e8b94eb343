//! Parallel execution utilities.
//!
//! Every parallel loop in the index writes into disjoint rows of a flat
//! output buffer, so these helpers hand each worker its own `&mut` row and
//! need no synchronization beyond rayon's completion barrier.

use rayon::prelude::*;

/// Minimum number of rows before parallelization is beneficial.
/// Below this threshold, sequential execution is faster due to reduced overhead.
pub const MIN_PARALLEL_ROWS: usize = 256;

/// Whether a loop over `rows` rows should run on the rayon pool.
#[inline]
pub fn should_parallelize(parallel: bool, rows: usize) -> bool {
    parallel && rows >= MIN_PARALLEL_ROWS
}

/// Run `f(row_index, row)` over every `row_len`-sized row of `out`.
pub fn for_each_row_mut<U, F>(out: &mut [U], row_len: usize, parallel: bool, f: F)
where
    U: Send,
    F: Fn(usize, &mut [U]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    let rows = out.len() / row_len;

    if should_parallelize(parallel, rows) {
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| f(i, row));
    } else {
        out.chunks_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| f(i, row));
    }
}

/// Like [`for_each_row_mut`], with per-task scratch state created by `init`.
pub fn for_each_row_with<U, S, I, F>(out: &mut [U], row_len: usize, parallel: bool, init: I, f: F)
where
    U: Send,
    I: Fn() -> S + Sync + Send,
    F: Fn(&mut S, usize, &mut [U]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    let rows = out.len() / row_len;

    if should_parallelize(parallel, rows) {
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each_init(&init, |scratch, (i, row)| f(scratch, i, row));
    } else {
        let mut scratch = init();
        out.chunks_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| f(&mut scratch, i, row));
    }
}

/// Like [`for_each_row_mut`] over two row-aligned buffers plus one slot per
/// row in `stats`, with per-task scratch state created by `init`.
///
/// Rayon may call `init` several times (once per split), so scratch must
/// not carry results between rows.
pub fn for_each_output_row_with<A, B, C, S, I, F>(
    a: &mut [A],
    b: &mut [B],
    stats: &mut [C],
    row_len: usize,
    parallel: bool,
    init: I,
    f: F,
) where
    A: Send,
    B: Send,
    C: Send,
    I: Fn() -> S + Sync + Send,
    F: Fn(&mut S, usize, &mut [A], &mut [B], &mut C) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len() / row_len, stats.len());
    let rows = stats.len();

    if should_parallelize(parallel, rows) {
        a.par_chunks_mut(row_len)
            .zip(b.par_chunks_mut(row_len))
            .zip(stats.par_iter_mut())
            .enumerate()
            .for_each_init(&init, |scratch, (i, ((ra, rb), st))| f(scratch, i, ra, rb, st));
    } else {
        let mut scratch = init();
        a.chunks_mut(row_len)
            .zip(b.chunks_mut(row_len))
            .zip(stats.iter_mut())
            .enumerate()
            .for_each(|(i, ((ra, rb), st))| f(&mut scratch, i, ra, rb, st));
    }
}
