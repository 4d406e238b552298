//! Property correlations as functions of temperature and pressure.
//!
//! A [`Correlation`] only knows how to compute values; the valid range lives in
//! the [`CorrelationModel`](crate::CorrelationModel) that wraps it.

use std::f64::consts::LN_10;
use std::fmt;
use std::sync::Arc;

/// Relative step for central finite differences.
const FD_REL_STEP: f64 = 1e-6;

fn central_difference<F: Fn(f64) -> f64>(f: F, x: f64) -> f64 {
    let h = FD_REL_STEP * x.abs().max(1.0);
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// A property correlation.
///
/// Implementations must be thread-safe (Send + Sync) so handles can be shared.
/// Integrals return `None` when the correlation has no closed form; the model
/// handle then skips the correlation during piecewise integration.
pub trait Correlation: Send + Sync + fmt::Debug {
    /// Property value at `t` [K] and `p` [Pa].
    fn evaluate(&self, t: f64, p: f64) -> f64;

    /// Partial derivative with respect to temperature.
    fn differentiate_by_t(&self, t: f64, p: f64) -> f64 {
        central_difference(|t| self.evaluate(t, p), t)
    }

    /// Partial derivative with respect to pressure.
    fn differentiate_by_p(&self, t: f64, p: f64) -> f64 {
        central_difference(|p| self.evaluate(t, p), p)
    }

    /// Integral of the value dT over `[ta, tb]` at pressure `p`.
    fn integrate_by_t(&self, _ta: f64, _tb: f64, _p: f64) -> Option<f64> {
        None
    }

    /// Integral of value/T dT over `[ta, tb]` at pressure `p`.
    fn integrate_by_t_over_t(&self, _ta: f64, _tb: f64, _p: f64) -> Option<f64> {
        None
    }

    /// Integral of the value dP over `[pa, pb]` at temperature `t`.
    fn integrate_by_p(&self, _pa: f64, _pb: f64, _t: f64) -> Option<f64> {
        None
    }

    /// `Some(value)` for correlations that do not vary with T or P.
    fn constant_value(&self) -> Option<f64> {
        None
    }
}

/// A fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl Correlation for Constant {
    fn evaluate(&self, _t: f64, _p: f64) -> f64 {
        self.0
    }

    fn differentiate_by_t(&self, _t: f64, _p: f64) -> f64 {
        0.0
    }

    fn differentiate_by_p(&self, _t: f64, _p: f64) -> f64 {
        0.0
    }

    fn integrate_by_t(&self, ta: f64, tb: f64, _p: f64) -> Option<f64> {
        Some(self.0 * (tb - ta))
    }

    fn integrate_by_t_over_t(&self, ta: f64, tb: f64, _p: f64) -> Option<f64> {
        Some(self.0 * (tb / ta).ln())
    }

    fn integrate_by_p(&self, pa: f64, pb: f64, _t: f64) -> Option<f64> {
        Some(self.0 * (pb - pa))
    }

    fn constant_value(&self) -> Option<f64> {
        Some(self.0)
    }
}

/// Polynomial in temperature, `sum(c[i] * T^i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Coefficients in ascending power order.
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    fn antiderivative(&self, t: f64) -> f64 {
        // Horner on sum(c[i] / (i + 1) * T^(i + 1))
        self.coeffs
            .iter()
            .enumerate()
            .rev()
            .fold(0.0, |acc, (i, c)| (acc + c / (i as f64 + 1.0)) * t)
    }

    fn antiderivative_over_t(&self, t: f64) -> f64 {
        let mut total = 0.0;
        for (i, c) in self.coeffs.iter().enumerate() {
            total += if i == 0 {
                c * t.ln()
            } else {
                c / i as f64 * t.powi(i as i32)
            };
        }
        total
    }
}

impl Correlation for Polynomial {
    fn evaluate(&self, t: f64, _p: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    fn differentiate_by_t(&self, t: f64, _p: f64) -> f64 {
        self.coeffs
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (i, c)| acc * t + i as f64 * c)
    }

    fn differentiate_by_p(&self, _t: f64, _p: f64) -> f64 {
        0.0
    }

    fn integrate_by_t(&self, ta: f64, tb: f64, _p: f64) -> Option<f64> {
        Some(self.antiderivative(tb) - self.antiderivative(ta))
    }

    fn integrate_by_t_over_t(&self, ta: f64, tb: f64, _p: f64) -> Option<f64> {
        Some(self.antiderivative_over_t(tb) - self.antiderivative_over_t(ta))
    }

    fn integrate_by_p(&self, pa: f64, pb: f64, t: f64) -> Option<f64> {
        Some(self.evaluate(t, pa) * (pb - pa))
    }
}

/// Antoine equation, `factor * 10^(a - b / (T + c))`.
///
/// `factor` converts the fitted pressure unit to Pa (1e5 for bar fits).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Antoine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub factor: f64,
}

impl Antoine {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            factor: 1.0,
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }
}

impl Correlation for Antoine {
    fn evaluate(&self, t: f64, _p: f64) -> f64 {
        self.factor * 10f64.powf(self.a - self.b / (t + self.c))
    }

    fn differentiate_by_t(&self, t: f64, p: f64) -> f64 {
        let shifted = t + self.c;
        self.evaluate(t, p) * LN_10 * self.b / (shifted * shifted)
    }

    fn differentiate_by_p(&self, _t: f64, _p: f64) -> f64 {
        0.0
    }
}

/// DIPPR equation 101, `exp(a + b/T + c ln T + d T^e)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dippr101 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl Dippr101 {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64) -> Self {
        Self { a, b, c, d, e }
    }
}

impl Correlation for Dippr101 {
    fn evaluate(&self, t: f64, _p: f64) -> f64 {
        (self.a + self.b / t + self.c * t.ln() + self.d * t.powf(self.e)).exp()
    }

    fn differentiate_by_t(&self, t: f64, p: f64) -> f64 {
        let dlnp = -self.b / (t * t) + self.c / t + self.d * self.e * t.powf(self.e - 1.0);
        self.evaluate(t, p) * dlnp
    }

    fn differentiate_by_p(&self, _t: f64, _p: f64) -> f64 {
        0.0
    }
}

type ValueFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;
type IntegralFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync>;

/// Correlation assembled from caller-supplied closures.
///
/// Only `evaluate` is required; missing derivatives fall back to finite
/// differences and missing integrals make the correlation non-integrable.
#[derive(Clone)]
pub struct Custom {
    evaluate: ValueFn,
    d_dt: Option<ValueFn>,
    d_dp: Option<ValueFn>,
    integral_t: Option<IntegralFn>,
    integral_t_over_t: Option<IntegralFn>,
    integral_p: Option<IntegralFn>,
}

impl Custom {
    pub fn new<F>(evaluate: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            evaluate: Arc::new(evaluate),
            d_dt: None,
            d_dp: None,
            integral_t: None,
            integral_t_over_t: None,
            integral_p: None,
        }
    }

    pub fn with_d_dt<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.d_dt = Some(Arc::new(f));
        self
    }

    pub fn with_d_dp<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.d_dp = Some(Arc::new(f));
        self
    }

    /// `f(ta, tb, p)`
    pub fn with_integral_t<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.integral_t = Some(Arc::new(f));
        self
    }

    /// `f(ta, tb, p)`
    pub fn with_integral_t_over_t<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.integral_t_over_t = Some(Arc::new(f));
        self
    }

    /// `f(pa, pb, t)`
    pub fn with_integral_p<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.integral_p = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("d_dt", &self.d_dt.is_some())
            .field("d_dp", &self.d_dp.is_some())
            .field("integral_t", &self.integral_t.is_some())
            .field("integral_t_over_t", &self.integral_t_over_t.is_some())
            .field("integral_p", &self.integral_p.is_some())
            .finish()
    }
}

impl Correlation for Custom {
    fn evaluate(&self, t: f64, p: f64) -> f64 {
        (self.evaluate)(t, p)
    }

    fn differentiate_by_t(&self, t: f64, p: f64) -> f64 {
        match &self.d_dt {
            Some(f) => f(t, p),
            None => central_difference(|t| (self.evaluate)(t, p), t),
        }
    }

    fn differentiate_by_p(&self, t: f64, p: f64) -> f64 {
        match &self.d_dp {
            Some(f) => f(t, p),
            None => central_difference(|p| (self.evaluate)(t, p), p),
        }
    }

    fn integrate_by_t(&self, ta: f64, tb: f64, p: f64) -> Option<f64> {
        self.integral_t.as_ref().map(|f| f(ta, tb, p))
    }

    fn integrate_by_t_over_t(&self, ta: f64, tb: f64, p: f64) -> Option<f64> {
        self.integral_t_over_t.as_ref().map(|f| f(ta, tb, p))
    }

    fn integrate_by_p(&self, pa: f64, pb: f64, t: f64) -> Option<f64> {
        self.integral_p.as_ref().map(|f| f(pa, pb, t))
    }
}
