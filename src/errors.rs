//! Error type shared by the statistics engines.

use thiserror::Error;

/// Errors raised when the input violates a precondition of a statistic.
///
/// Numerical trouble is not an error: NaN inputs propagate to NaN results and
/// iterative estimators return their best estimate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The statistic is undefined for an empty collection.
    #[error("statistic is undefined for an empty collection")]
    EmptyInput,

    /// The interval cannot be used as a period.
    #[error("interval must have a positive width, but has left {left} and width {width}")]
    InvalidInterval { left: f64, width: f64 },

    /// An index does not refer to an element of the collection.
    #[error("index {index} is out of bounds for a collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A numeric parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
