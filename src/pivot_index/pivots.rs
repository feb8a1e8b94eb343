//! Pivot selection.

use crate::error::{QuantPivotError, Result};

/// Select `num_pivots` pivot rows out of `num_rows` by uniform striding.
///
/// `step = num_rows / num_pivots` and pivot `j` is row `min(step * j, num_rows - 1)`.
/// Requires `1 <= num_pivots <= num_rows`.
pub fn select_pivots(num_rows: usize, num_pivots: usize) -> Result<Vec<usize>> {
    if num_pivots == 0 {
        return Err(QuantPivotError::invalid_argument(
            "number of pivots must be positive",
        ));
    }
    if num_pivots > num_rows {
        return Err(QuantPivotError::failed_precondition(format!(
            "insufficient dataset size for requested pivot count: {} pivots over {} rows",
            num_pivots, num_rows
        )));
    }

    let step = num_rows / num_pivots;
    Ok((0..num_pivots)
        .map(|j| (step * j).min(num_rows - 1))
        .collect())
}
