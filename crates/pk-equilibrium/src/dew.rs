//! Dew point solver.
//!
//! The dew point of a vapor `y` is where the liquid satisfying
//! `x * gamma(x) = y * phi * P / Psat` sums to one. Each residual evaluation
//! inverts the activity model, seeded with the previous liquid composition.

use crate::activity::ActivityCoefficients;
use crate::bubble::{PureComponents, check_chemicals};
use crate::chemical::Chemical;
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::fugacity::{
    FugacityCoefficients, IdealFugacityCoefficients, IdealPoyntingCorrection, PoyntingCorrection,
};
use crate::validation;
use pk_core::constants::P_ATM_PA;
use pk_solver::{SecantConfig, SolverOptions, aitken_secant};
use std::fmt;
use std::sync::Arc;

/// Dew point temperature and pressure solver for one chemical list.
pub struct DewPoint {
    gamma: Arc<dyn ActivityCoefficients>,
    phi: Arc<dyn FugacityCoefficients>,
    pcf: Arc<dyn PoyntingCorrection>,
    pure: PureComponents,
    options: SolverOptions,
    t: Option<f64>,
    p: Option<f64>,
    x: Option<Vec<f64>>,
}

impl DewPoint {
    pub fn new(chemicals: &[&Chemical], gamma: Arc<dyn ActivityCoefficients>) -> EquilibriumResult<Self> {
        check_chemicals(gamma.as_ref(), chemicals)?;
        Ok(Self {
            gamma,
            phi: Arc::new(IdealFugacityCoefficients),
            pcf: Arc::new(IdealPoyntingCorrection),
            pure: PureComponents::new(chemicals),
            options: SolverOptions::default(),
            t: None,
            p: None,
            x: None,
        })
    }

    pub fn with_fugacity(mut self, phi: Arc<dyn FugacityCoefficients>) -> Self {
        self.phi = phi;
        self
    }

    pub fn with_poynting(mut self, pcf: Arc<dyn PoyntingCorrection>) -> Self {
        self.pcf = pcf;
        self
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn chemicals(&self) -> &[String] {
        self.gamma.chemicals()
    }

    pub fn activity(&self) -> &Arc<dyn ActivityCoefficients> {
        &self.gamma
    }

    pub fn t(&self) -> Option<f64> {
        self.t
    }

    pub fn p(&self) -> Option<f64> {
        self.p
    }

    /// Last liquid composition.
    pub fn x(&self) -> Option<&[f64]> {
        self.x.as_deref()
    }

    pub fn reset(&mut self) {
        self.t = None;
        self.p = None;
        self.x = None;
    }

    /// Dew point temperature [K] and liquid composition of vapor `y` at
    /// pressure `p` [Pa].
    pub fn solve_tx(&mut self, y: &[f64], p: f64) -> EquilibriumResult<(f64, Vec<f64>)> {
        let y = validation::composition("y", y, self.pure.len())?;
        let p = validation::pressure(p)?;
        self.p = Some(p);
        let config = self.options.temperature_secant();
        let seed = self.t.unwrap_or_else(|| self.pure.ideal_t(&y));

        let result = match self.attempt_t(&y, p, seed, &config) {
            Err(e) if e.is_convergence() && self.options.retry => {
                let seed = self.pure.ideal_t(&y);
                tracing::warn!(error = %e, seed, "dew point temperature failed, retrying from ideal seed");
                self.x = None;
                self.attempt_t(&y, p, seed, &config)
            }
            other => other,
        };
        match result {
            Ok(t) => {
                self.t = Some(t);
                Ok((t, self.normalized_x()?))
            }
            Err(e) => {
                self.t = None;
                Err(e.during("dew point temperature"))
            }
        }
    }

    fn attempt_t(&mut self, y: &[f64], p: f64, seed: f64, config: &SecantConfig) -> EquilibriumResult<f64> {
        let Self {
            gamma,
            phi,
            pcf,
            pure,
            x,
            ..
        } = self;
        let residual = |t: f64| -> EquilibriumResult<f64> {
            let psat = pure.psat(t, p)?;
            let phis = phi.phi(y, t, p)?;
            let poynting = pcf.factors(&psat, t, p)?;
            let x_gamma: Vec<f64> = (0..y.len())
                .map(|i| y[i] * phis[i] * p / (psat[i] * poynting[i]))
                .collect();
            let next = gamma.solve_x(&x_gamma, t, x.as_deref())?;
            let sum: f64 = next.iter().sum();
            *x = Some(next);
            Ok(1.0 - sum)
        };
        let root = aitken_secant(residual, seed, seed + 0.01, config)?;
        tracing::debug!(t = root.x, iterations = root.iterations, "dew point temperature");
        Ok(root.x)
    }

    /// Dew point pressure [Pa] and liquid composition of vapor `y` at
    /// temperature `t` [K].
    pub fn solve_px(&mut self, y: &[f64], t: f64) -> EquilibriumResult<(f64, Vec<f64>)> {
        let y = validation::composition("y", y, self.pure.len())?;
        let t = validation::temperature(t)?;
        self.t = Some(t);
        let psat = self.pure.psat(t, self.p.unwrap_or(P_ATM_PA))?;
        let ideal = 1.0 / y.iter().zip(&psat).map(|(yi, ps)| yi / ps).sum::<f64>();
        let config = self.options.pressure_secant();
        let seed = self.p.unwrap_or(ideal);

        let result = match self.attempt_p(&y, t, &psat, seed, &config) {
            Err(e) if e.is_convergence() && self.options.retry => {
                tracing::warn!(error = %e, seed = ideal, "dew point pressure failed, retrying from ideal seed");
                self.x = None;
                self.attempt_p(&y, t, &psat, ideal, &config)
            }
            other => other,
        };
        match result {
            Ok(p) => {
                self.p = Some(p);
                Ok((p, self.normalized_x()?))
            }
            Err(e) => {
                self.p = None;
                Err(e.during("dew point pressure"))
            }
        }
    }

    fn attempt_p(
        &mut self,
        y: &[f64],
        t: f64,
        psat: &[f64],
        seed: f64,
        config: &SecantConfig,
    ) -> EquilibriumResult<f64> {
        let Self {
            gamma, phi, pcf, x, ..
        } = self;
        let residual = |p: f64| -> EquilibriumResult<f64> {
            let phis = phi.phi(y, t, p)?;
            let poynting = pcf.factors(psat, t, p)?;
            let x_gamma: Vec<f64> = (0..y.len())
                .map(|i| y[i] * phis[i] * p / (psat[i] * poynting[i]))
                .collect();
            let next = gamma.solve_x(&x_gamma, t, x.as_deref())?;
            let sum: f64 = next.iter().sum();
            *x = Some(next);
            Ok(1.0 - sum)
        };
        let root = aitken_secant(residual, seed, seed - 1.0, config)?;
        tracing::debug!(p = root.x, iterations = root.iterations, "dew point pressure");
        Ok(root.x)
    }

    fn normalized_x(&mut self) -> EquilibriumResult<Vec<f64>> {
        let x = self
            .x
            .as_deref()
            .ok_or_else(|| EquilibriumError::composition("no liquid composition computed"))?;
        let x = pk_core::normalize(x)?;
        self.x = Some(x.clone());
        Ok(x)
    }
}

impl fmt::Debug for DewPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DewPoint")
            .field("chemicals", &self.chemicals())
            .field("t", &self.t)
            .field("p", &self.p)
            .field("x", &self.x)
            .finish()
    }
}

impl fmt::Display for DewPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DewPoint([{}])", self.chemicals().join(", "))
    }
}
