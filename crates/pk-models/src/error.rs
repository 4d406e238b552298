//! Correlation and model handle errors.

use pk_core::PkError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by correlation models and model handles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No model in the handle covers the query point.
    #[error("{handle} contains no valid model at T={t:.2} K and P={p:.5e} Pa")]
    OutOfDomain { handle: String, t: f64, p: f64 },

    /// A piecewise integration could not be completed.
    #[error("{handle} contains no valid model between {variable}={lower:.5e} and {upper:.5e}")]
    NoCoverage {
        handle: String,
        variable: &'static str,
        lower: f64,
        upper: f64,
    },

    /// Domain bounds that are not strictly increasing or not finite.
    #[error("Invalid {what} domain [{lower}, {upper}]")]
    InvalidDomain {
        what: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("Model index {index} out of bounds for {handle} with {len} models")]
    IndexOutOfBounds {
        handle: String,
        index: usize,
        len: usize,
    },

    #[error("{handle} has no models")]
    Empty { handle: String },
}

impl From<ModelError> for PkError {
    fn from(err: ModelError) -> Self {
        PkError::Invariant {
            what: err.to_string(),
        }
    }
}
