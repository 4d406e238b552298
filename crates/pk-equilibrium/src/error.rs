//! Phase equilibrium errors.

use crate::config::ConfigError;
use crate::groups::ActivityFlavor;
use pk_core::PkError;
use pk_models::ModelError;
use pk_solver::SolverError;
use thiserror::Error;

/// Result type for equilibrium operations.
pub type EquilibriumResult<T> = Result<T, EquilibriumError>;

/// Errors raised by group decomposition, activity models and bubble/dew solvers.
#[derive(Error, Debug)]
pub enum EquilibriumError {
    /// Empty, negative, non-finite or zero-sum composition.
    #[error("Invalid composition: {what}")]
    Composition { what: String },

    /// An iteration failed to converge.
    #[error("{operation} failed: {source}")]
    Convergence {
        operation: &'static str,
        #[source]
        source: SolverError,
    },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Unknown {flavor} subgroup {id}")]
    UnknownSubgroup { flavor: ActivityFlavor, id: u32 },

    #[error("No {flavor} interaction parameters between main groups {first} and {second}")]
    MissingInteraction {
        flavor: ActivityFlavor,
        first: u32,
        second: u32,
    },

    #[error("{chemical} has no {flavor} group decomposition")]
    MissingGroups {
        chemical: String,
        flavor: ActivityFlavor,
    },

    #[error("Unknown chemical {id}")]
    UnknownChemical { id: String },

    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl EquilibriumError {
    pub(crate) fn composition(what: impl Into<String>) -> Self {
        EquilibriumError::Composition { what: what.into() }
    }

    /// True for failures a restart from another initial guess may fix.
    pub fn is_convergence(&self) -> bool {
        matches!(self, EquilibriumError::Convergence { source, .. } if source.is_convergence())
    }

    /// Attach the name of the operation to a convergence failure.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            EquilibriumError::Convergence { source, .. } => {
                EquilibriumError::Convergence { operation, source }
            }
            other => other,
        }
    }
}

impl From<SolverError> for EquilibriumError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Model(inner) => EquilibriumError::Model(inner),
            source => EquilibriumError::Convergence {
                operation: "iteration",
                source,
            },
        }
    }
}

impl From<PkError> for EquilibriumError {
    fn from(err: PkError) -> Self {
        match err {
            PkError::LengthMismatch {
                what,
                expected,
                got,
            } => EquilibriumError::LengthMismatch {
                what,
                expected,
                got,
            },
            PkError::NonFinite { what, .. } | PkError::InvalidArg { what } => {
                EquilibriumError::InvalidArg { what }
            }
            PkError::Invariant { what } => {
                tracing::debug!(%what, "invariant violated");
                EquilibriumError::InvalidArg {
                    what: "invariant violated",
                }
            }
        }
    }
}

impl From<EquilibriumError> for PkError {
    fn from(err: EquilibriumError) -> Self {
        match err {
            EquilibriumError::LengthMismatch {
                what,
                expected,
                got,
            } => PkError::LengthMismatch {
                what,
                expected,
                got,
            },
            EquilibriumError::InvalidArg { what } => PkError::InvalidArg { what },
            other => PkError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_errors_split_into_model_and_convergence() {
        let model: EquilibriumError = SolverError::Model(ModelError::Empty {
            handle: "Water.Psat".into(),
        })
        .into();
        assert!(matches!(model, EquilibriumError::Model(_)));
        assert!(!model.is_convergence());

        let stalled: EquilibriumError = SolverError::ZeroSlope { x: 350.0, y: 0.1 }.into();
        assert!(stalled.is_convergence());
        let named = stalled.during("bubble point temperature");
        assert!(named.to_string().starts_with("bubble point temperature failed"));
    }

    #[test]
    fn error_display_names_flavor() {
        let err = EquilibriumError::MissingGroups {
            chemical: "Water".into(),
            flavor: ActivityFlavor::Unifac,
        };
        assert_eq!(err.to_string(), "Water has no UNIFAC group decomposition");
    }

    #[test]
    fn pk_errors_keep_their_kind() {
        let mismatch: EquilibriumError = PkError::LengthMismatch {
            what: "z",
            expected: 2,
            got: 3,
        }
        .into();
        assert!(matches!(
            mismatch,
            EquilibriumError::LengthMismatch {
                what: "z",
                expected: 2,
                got: 3
            }
        ));

        let nan: EquilibriumError = PkError::NonFinite {
            what: "fraction",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(nan, EquilibriumError::InvalidArg { what: "fraction" }));

        let broken: EquilibriumError = PkError::Invariant {
            what: "gamma table".into(),
        }
        .into();
        assert!(matches!(broken, EquilibriumError::InvalidArg { .. }));
    }

    #[test]
    fn error_to_pk_error() {
        let err = EquilibriumError::InvalidArg { what: "temperature" };
        let pk: PkError = err.into();
        assert_eq!(pk, PkError::InvalidArg { what: "temperature" });
    }
}
