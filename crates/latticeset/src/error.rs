//! Error types shared by every module in the crate.

use thiserror::Error;

/// Errors produced by point sets, cursors and grid accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two entities that must share a dimensionality do not.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the receiving entity.
        expected: usize,
        /// Dimensionality that was supplied.
        actual: usize,
    },
    /// `fwd` or `next` was called on a cursor with no remaining elements.
    #[error("cursor exhausted: no element remains")]
    ExhaustedIteration,
    /// A construction parameter is structurally invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::DimensionMismatch`] unless `actual == expected`.
pub fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, actual })
    }
}
