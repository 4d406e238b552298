//! Input validation helpers.

use crate::error::{EquilibriumError, EquilibriumResult};
use pk_core::{ensure_len, ensure_positive};

/// Ensure temperature is positive and finite.
pub(crate) fn temperature(t: f64) -> EquilibriumResult<f64> {
    ensure_positive(t, "temperature").map_err(|_| EquilibriumError::InvalidArg {
        what: "temperature must be positive and finite",
    })
}

/// Ensure pressure is positive and finite.
pub(crate) fn pressure(p: f64) -> EquilibriumResult<f64> {
    ensure_positive(p, "pressure").map_err(|_| EquilibriumError::InvalidArg {
        what: "pressure must be positive and finite",
    })
}

pub(crate) fn length(what: &'static str, values: &[f64], expected: usize) -> EquilibriumResult<()> {
    Ok(ensure_len(values, expected, what)?)
}

/// Check amounts are finite and non-negative with a positive total.
pub(crate) fn amounts(what: &'static str, values: &[f64]) -> EquilibriumResult<f64> {
    if values.is_empty() {
        return Err(EquilibriumError::composition(format!("{what} is empty")));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(EquilibriumError::composition(format!(
            "{what} contains invalid amount {v}"
        )));
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Err(EquilibriumError::composition(format!("{what} sums to zero")));
    }
    Ok(total)
}

/// Validate length and amounts, then normalize to mole fractions.
pub(crate) fn composition(
    what: &'static str,
    values: &[f64],
    expected: usize,
) -> EquilibriumResult<Vec<f64>> {
    length(what, values, expected)?;
    let total = amounts(what, values)?;
    Ok(values.iter().map(|v| v / total).collect())
}
