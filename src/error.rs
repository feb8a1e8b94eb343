//! Error types for QuantPivot.
//!
//! Every failure is fatal for the operation that raised it: a failed `fit`
//! produces no index, a failed `predict` produces no results. Errors carry a
//! coarse [`ErrorCode`] so callers can tell precondition violations apart from
//! I/O problems.

use std::fmt;
use thiserror::Error;

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument provided (bad dimensions, zero parameters).
    InvalidArgument,
    /// Operation requires state that is not there (h > N, predict before fit).
    FailedPrecondition,
    /// Input file does not exist.
    NotFound,
    /// Input file is truncated or its header is malformed.
    DataLoss,
    /// Any other I/O failure.
    Io,
    /// Requested sizes cannot be represented.
    ResourceExhausted,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::FailedPrecondition => write!(f, "FAILED_PRECONDITION"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::DataLoss => write!(f, "DATA_LOSS"),
            ErrorCode::Io => write!(f, "IO"),
            ErrorCode::ResourceExhausted => write!(f, "RESOURCE_EXHAUSTED"),
        }
    }
}

/// Main error type for QuantPivot operations.
#[derive(Error, Debug, Clone)]
pub struct QuantPivotError {
    code: ErrorCode,
    message: String,
}

impl QuantPivotError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }

    /// Create a failed precondition error.
    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedPrecondition, msg)
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, msg)
    }

    /// Create a data loss error.
    pub fn data_loss(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataLoss, msg)
    }

    /// Create a resource exhausted error.
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceExhausted, msg)
    }

    /// Whether this error came from the file layer rather than the index.
    pub fn is_io(&self) -> bool {
        matches!(self.code, ErrorCode::NotFound | ErrorCode::DataLoss | ErrorCode::Io)
    }
}

impl fmt::Display for QuantPivotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<std::io::Error> for QuantPivotError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            std::io::ErrorKind::UnexpectedEof => Self::data_loss(err.to_string()),
            _ => Self::new(ErrorCode::Io, err.to_string()),
        }
    }
}

/// Result type alias for QuantPivot operations.
pub type Result<T> = std::result::Result<T, QuantPivotError>;
