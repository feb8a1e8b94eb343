//! Matrix file I/O.

pub mod ds2;

pub use ds2::{read_matrix, read_matrix_from, write_matrix, write_matrix_to, HEADER_BYTES};
