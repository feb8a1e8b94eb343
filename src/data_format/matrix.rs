//! Dense row-major matrix storage.
//!
//! Datasets, query batches, the pivot-distance table and result sets are all
//! stored as [`Matrix`] values. The buffer is aligned to
//! [`MatrixElement::ALIGNMENT`] so the SIMD kernels can read rows directly.

use crate::error::{QuantPivotError, Result};
use crate::types::{is_aligned_for, MatrixElement};
use aligned_vec::{AVec, RuntimeAlign};
use std::fmt;

/// A dense `rows x cols` matrix in row-major order.
pub struct Matrix<T: MatrixElement> {
    /// Contiguous storage, aligned for SIMD.
    data: AVec<T, RuntimeAlign>,

    /// Number of rows.
    rows: usize,

    /// Number of columns.
    cols: usize,
}

impl<T: MatrixElement> Matrix<T> {
    /// Create an empty 0x0 matrix.
    pub fn empty() -> Self {
        Self {
            data: AVec::new(T::ALIGNMENT),
            rows: 0,
            cols: 0,
        }
    }

    /// Create a matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        let mut data = AVec::new(T::ALIGNMENT);
        data.resize(len, value);
        Ok(Self { data, rows, cols })
    }

    /// Create a zero-initialized matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::default())
    }

    /// Create a matrix from a flat row-major slice.
    pub fn from_flat(rows: usize, cols: usize, values: &[T]) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        if values.len() != len {
            return Err(QuantPivotError::invalid_argument(format!(
                "payload has {} values, expected {} ({} x {})",
                values.len(),
                len,
                rows,
                cols
            )));
        }
        Ok(Self {
            data: AVec::from_slice(T::ALIGNMENT, values),
            rows,
            cols,
        })
    }

    /// Create a matrix from a vector of rows.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        if rows.is_empty() {
            return Ok(Self::empty());
        }

        let cols = rows[0].len();
        let len = checked_len(rows.len(), cols)?;
        let mut data = AVec::new(T::ALIGNMENT);
        data.reserve(len);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(QuantPivotError::invalid_argument(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            for &value in row {
                data.push(value);
            }
        }

        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a row by index.
    #[inline]
    pub fn row(&self, index: usize) -> &[T] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Get a mutable row by index.
    #[inline]
    pub fn row_mut(&mut self, index: usize) -> &mut [T] {
        let start = index * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Get a single entry.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks_exact panics on a zero chunk size
        let chunk = self.cols.max(1);
        self.data.chunks_exact(chunk).take(self.rows)
    }

    /// The row-major backing slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The row-major backing slice, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Copy the contents into a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// Whether the backing buffer satisfies the alignment required for `T`.
    pub fn is_aligned(&self) -> bool {
        is_aligned_for(self.data.as_ptr())
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        QuantPivotError::resource_exhausted(format!(
            "matrix of {} x {} elements does not fit in memory",
            rows, cols
        ))
    })
}

impl<T: MatrixElement> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self {
            data: AVec::from_slice(T::ALIGNMENT, &self.data),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: MatrixElement> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.as_slice() == other.as_slice()
    }
}

impl<T: MatrixElement> Default for Matrix<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: MatrixElement> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}
