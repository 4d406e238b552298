//! Vapor-phase fugacity coefficients and Poynting corrections.

use crate::error::EquilibriumResult;
use crate::validation;
use std::fmt;

/// Vapor fugacity coefficient model.
pub trait FugacityCoefficients: Send + Sync + fmt::Debug {
    /// Fugacity coefficients of vapor composition `y` at `t` [K] and `p` [Pa].
    fn phi(&self, y: &[f64], t: f64, p: f64) -> EquilibriumResult<Vec<f64>>;

    /// Vapor composition `y` with `y * phi(y, t, p) = y_phi`.
    fn solve_y(
        &self,
        y_phi: &[f64],
        t: f64,
        p: f64,
        y_guess: Option<&[f64]>,
    ) -> EquilibriumResult<Vec<f64>>;
}

/// Ideal gas, phi = 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdealFugacityCoefficients;

impl FugacityCoefficients for IdealFugacityCoefficients {
    fn phi(&self, y: &[f64], t: f64, p: f64) -> EquilibriumResult<Vec<f64>> {
        validation::temperature(t)?;
        validation::pressure(p)?;
        Ok(vec![1.0; y.len()])
    }

    fn solve_y(
        &self,
        y_phi: &[f64],
        _t: f64,
        _p: f64,
        _y_guess: Option<&[f64]>,
    ) -> EquilibriumResult<Vec<f64>> {
        Ok(y_phi.to_vec())
    }
}

/// Liquid fugacity correction for compression above saturation.
pub trait PoyntingCorrection: Send + Sync + fmt::Debug {
    /// Correction factor per chemical at `t` [K] and `p` [Pa], given each
    /// chemical's saturation pressure.
    fn factors(&self, psat: &[f64], t: f64, p: f64) -> EquilibriumResult<Vec<f64>>;
}

/// Incompressible liquid at low pressure, factor = 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdealPoyntingCorrection;

impl PoyntingCorrection for IdealPoyntingCorrection {
    fn factors(&self, psat: &[f64], _t: f64, _p: f64) -> EquilibriumResult<Vec<f64>> {
        Ok(vec![1.0; psat.len()])
    }
}
