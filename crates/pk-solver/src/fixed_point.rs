//! Vector fixed-point iteration with Aitken acceleration.

use crate::error::SolverError;
use nalgebra::DVector;

/// Fixed-point iteration configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointConfig {
    /// Absolute tolerance on the largest component change
    pub tol: f64,
    /// Maximum number of accelerated cycles
    pub max_iterations: usize,
}

impl Default for FixedPointConfig {
    fn default() -> Self {
        Self {
            tol: 1e-5,
            max_iterations: 100,
        }
    }
}

/// Fixed-point iteration result.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPointResult {
    /// Fixed point estimate
    pub x: DVector<f64>,
    /// Largest component change of the final step
    pub residual: f64,
    /// Accelerated cycles performed
    pub iterations: usize,
}

fn apply<G, E>(g: &mut G, x: &DVector<f64>) -> Result<DVector<f64>, E>
where
    G: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    E: From<SolverError>,
{
    let next = g(x)?;
    if next.len() != x.len() || next.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::NonFinite { what: "fixed-point iterate" }.into());
    }
    Ok(next)
}

/// Componentwise Aitken extrapolation of `x0 -> x1 -> x2`.
///
/// A component falls back to `x2` when its extrapolation is not finite or
/// changes sign, which keeps mole numbers from crossing zero.
fn accelerate(x0: &DVector<f64>, x1: &DVector<f64>, x2: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(
        x2.len(),
        x0.iter().zip(x1.iter()).zip(x2.iter()).map(|((&a, &b), &c)| {
            let d1 = b - a;
            let d2 = c - b;
            let denom = d2 - d1;
            if denom == 0.0 {
                return c;
            }
            let extrapolated = c - d2 * d2 / denom;
            if extrapolated.is_finite() && extrapolated.signum() == c.signum() {
                extrapolated
            } else {
                c
            }
        }),
    )
}

fn max_change(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    (a - b).amax()
}

/// Solve `x = g(x)` from `x0`.
///
/// Each cycle applies `g` twice and extrapolates. Convergence is declared when a
/// single application of `g` moves no component by more than `tol`. Errors from
/// `g` are passed through; running out of cycles reports the last iterate.
pub fn aitken_fixed_point<G, E>(
    mut g: G,
    x0: DVector<f64>,
    config: &FixedPointConfig,
) -> Result<FixedPointResult, E>
where
    G: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    E: From<SolverError>,
{
    let mut x = x0;
    let mut residual = f64::INFINITY;
    for iteration in 1..=config.max_iterations {
        let x1 = apply(&mut g, &x)?;
        residual = max_change(&x1, &x);
        if residual < config.tol {
            return Ok(FixedPointResult {
                x: x1,
                residual,
                iterations: iteration,
            });
        }
        let x2 = apply(&mut g, &x1)?;
        residual = max_change(&x2, &x1);
        if residual < config.tol {
            return Ok(FixedPointResult {
                x: x2,
                residual,
                iterations: iteration,
            });
        }
        x = accelerate(&x, &x1, &x2);
    }

    tracing::debug!(residual, iterations = config.max_iterations, "fixed point not converged");
    Err(SolverError::NotConverged {
        iterations: config.max_iterations,
        last: x.iter().copied().collect(),
        residual,
    }
    .into())
}
