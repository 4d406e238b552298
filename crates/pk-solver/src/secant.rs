//! Scalar root finding by secant steps with Aitken extrapolation.

use crate::error::SolverError;

/// Secant solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantConfig {
    /// Step size below which the iterate is accepted
    pub xtol: f64,
    /// Residual magnitude below which the iterate is accepted
    pub ytol: f64,
    /// Maximum number of secant steps
    pub max_iterations: usize,
    /// Extrapolate every second step with Aitken's delta-squared
    pub accelerate: bool,
}

impl Default for SecantConfig {
    fn default() -> Self {
        Self {
            xtol: 1e-8,
            ytol: 1e-10,
            max_iterations: 50,
            accelerate: true,
        }
    }
}

impl SecantConfig {
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    pub fn with_ytol(mut self, ytol: f64) -> Self {
        self.ytol = ytol;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Root found by [`aitken_secant`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantResult {
    /// Root estimate
    pub x: f64,
    /// Residual at the root estimate
    pub y: f64,
    /// Secant steps taken
    pub iterations: usize,
}

#[derive(Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
}

fn evaluate<F, E>(f: &mut F, x: f64) -> Result<Point, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    if !x.is_finite() {
        return Err(SolverError::NonFinite { what: "iterate" }.into());
    }
    let y = f(x)?;
    if !y.is_finite() {
        return Err(SolverError::NonFinite { what: "residual" }.into());
    }
    Ok(Point { x, y })
}

fn secant_step(a: Point, b: Point) -> Result<f64, SolverError> {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return Err(SolverError::ZeroSlope { x: b.x, y: b.y });
    }
    Ok(b.x - b.y * (b.x - a.x) / dy)
}

/// Aitken delta-squared extrapolation of three successive iterates.
fn extrapolate(x0: f64, x1: f64, x2: f64) -> Option<f64> {
    let d1 = x1 - x0;
    let d2 = x2 - x1;
    let denom = d2 - d1;
    if denom == 0.0 {
        return None;
    }
    let x = x2 - d2 * d2 / denom;
    (x.is_finite() && x != x2).then_some(x)
}

/// Find a root of `f` starting from the two points `x0` and `x1`.
///
/// Every second secant step the last three iterates are extrapolated; the
/// extrapolated point replaces the newest iterate only when it lowers the
/// residual. Errors returned by `f` are passed through unchanged.
pub fn aitken_secant<F, E>(mut f: F, x0: f64, x1: f64, config: &SecantConfig) -> Result<SecantResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    let converged = |p: Point, dx: f64, iterations: usize| -> Option<SecantResult> {
        (p.y.abs() < config.ytol || dx.abs() < config.xtol).then_some(SecantResult {
            x: p.x,
            y: p.y,
            iterations,
        })
    };

    let mut a = evaluate(&mut f, x0)?;
    if a.y.abs() < config.ytol {
        return Ok(SecantResult {
            x: a.x,
            y: a.y,
            iterations: 0,
        });
    }
    let mut b = evaluate(&mut f, x1)?;
    if let Some(done) = converged(b, f64::INFINITY, 0) {
        return Ok(done);
    }

    let mut iterations = 0;
    let mut since_extrapolation = 0;
    while iterations < config.max_iterations {
        let x = secant_step(a, b)?;
        let c = evaluate(&mut f, x)?;
        iterations += 1;
        since_extrapolation += 1;
        if let Some(done) = converged(c, c.x - b.x, iterations) {
            tracing::debug!(x = done.x, y = done.y, iterations, "secant converged");
            return Ok(done);
        }

        let mut next = (b, c);
        if config.accelerate && since_extrapolation >= 2 {
            since_extrapolation = 0;
            if let Some(x) = extrapolate(a.x, b.x, c.x) {
                let d = evaluate(&mut f, x)?;
                if d.y.abs() < c.y.abs() {
                    if let Some(done) = converged(d, d.x - c.x, iterations) {
                        tracing::debug!(x = done.x, y = done.y, iterations, "secant converged");
                        return Ok(done);
                    }
                    next = (c, d);
                }
            }
        }
        (a, b) = next;
    }

    Err(SolverError::NotConverged {
        iterations,
        last: vec![b.x],
        residual: b.y.abs(),
    }
    .into())
}
