//! The ds2 binary matrix format.
//!
//! Layout: `rows: i32`, `cols: i32`, then `rows * cols` row-major elements,
//! everything little-endian. Element width is implied by the reader's type.
//! An empty matrix is an all-zero header with no payload.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::data_format::Matrix;
use crate::error::{QuantPivotError, Result};
use crate::types::MatrixElement;

/// Size of the `(rows, cols)` header in bytes.
pub const HEADER_BYTES: usize = 8;

/// Read a ds2 matrix from `path`.
pub fn read_matrix<E: MatrixElement>(path: impl AsRef<Path>) -> Result<Matrix<E>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| with_path(path, e.into()))?;
    read_matrix_from(BufReader::new(file)).map_err(|e| with_path(path, e))
}

/// Read a ds2 matrix from any reader.
pub fn read_matrix_from<E: MatrixElement, R: Read>(mut reader: R) -> Result<Matrix<E>> {
    let mut header = [0u8; HEADER_BYTES];
    reader
        .read_exact(&mut header)
        .map_err(|_| QuantPivotError::data_loss("truncated ds2 header"))?;

    let rows = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let cols = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if rows < 0 || cols < 0 {
        return Err(QuantPivotError::data_loss(format!(
            "negative ds2 dimensions {} x {}",
            rows, cols
        )));
    }
    let (rows, cols) = (rows as usize, cols as usize);
    if rows == 0 && cols == 0 {
        return Ok(Matrix::empty());
    }

    let payload_len = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(E::BYTES))
        .ok_or_else(|| {
            QuantPivotError::resource_exhausted(format!("ds2 matrix {} x {} is too large", rows, cols))
        })?;

    // The header is untrusted: grow the buffer only as bytes actually arrive.
    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(payload_len as u64)
        .read_to_end(&mut payload)?;
    if payload.len() != payload_len {
        return Err(QuantPivotError::data_loss(format!(
            "truncated ds2 payload: expected {} bytes for {} x {}, found {}",
            payload_len,
            rows,
            cols,
            payload.len()
        )));
    }

    let values: Vec<E> = payload.chunks_exact(E::BYTES).map(E::from_le_slice).collect();
    Matrix::from_flat(rows, cols, &values)
}

/// Write `matrix` to `path` in ds2 format, replacing any existing file.
pub fn write_matrix<E: MatrixElement>(path: impl AsRef<Path>, matrix: &Matrix<E>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| with_path(path, e.into()))?;
    let mut writer = BufWriter::new(file);
    write_matrix_to(&mut writer, matrix).map_err(|e| with_path(path, e))?;
    writer.flush().map_err(|e| with_path(path, e.into()))
}

/// Write `matrix` in ds2 format to any writer.
///
/// Elements are written one at a time; wrap unbuffered sinks in a `BufWriter`.
pub fn write_matrix_to<E: MatrixElement, W: Write>(mut writer: W, matrix: &Matrix<E>) -> Result<()> {
    let rows = header_count(matrix.rows())?;
    let cols = header_count(matrix.cols())?;

    writer.write_all(&rows.to_le_bytes())?;
    writer.write_all(&cols.to_le_bytes())?;
    for &value in matrix.as_slice() {
        value.write_le(&mut writer)?;
    }
    Ok(())
}

fn header_count(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| {
        QuantPivotError::invalid_argument(format!("dimension {} does not fit a ds2 header", n))
    })
}

fn with_path(path: &Path, err: QuantPivotError) -> QuantPivotError {
    QuantPivotError::new(err.code(), format!("{}: {}", path.display(), err.message()))
}
