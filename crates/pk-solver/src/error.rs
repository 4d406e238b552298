//! Error types for iterative solvers.

use pk_core::PkError;
use pk_models::ModelError;
use thiserror::Error;

/// Errors that can occur during root finding and fixed-point iteration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Zero slope at x={x} (f={y})")]
    ZeroSlope { x: f64, y: f64 },

    #[error("Not converged after {iterations} iterations, residual = {residual:.3e}")]
    NotConverged {
        iterations: usize,
        last: Vec<f64>,
        residual: f64,
    },

    #[error("Non-finite {what} during iteration")]
    NonFinite { what: &'static str },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Failures of the iteration itself, as opposed to errors raised by the
    /// evaluated function. Only these are worth retrying from another start.
    pub fn is_convergence(&self) -> bool {
        matches!(
            self,
            SolverError::ZeroSlope { .. }
                | SolverError::NotConverged { .. }
                | SolverError::NonFinite { .. }
        )
    }

    /// Last iterate of a non-converged run.
    pub fn last_iterate(&self) -> Option<&[f64]> {
        match self {
            SolverError::NotConverged { last, .. } => Some(last),
            _ => None,
        }
    }
}

impl From<SolverError> for PkError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::NonFinite { what } => PkError::NonFinite {
                what,
                value: f64::NAN,
            },
            SolverError::Model(inner) => inner.into(),
            other => PkError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
