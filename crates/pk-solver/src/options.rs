//! Tolerances and budgets for equilibrium solvers.

use crate::fixed_point::FixedPointConfig;
use crate::secant::SecantConfig;
use serde::{Deserialize, Serialize};

/// Solver settings shared by a thermodynamic context.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverOptions {
    /// Temperature step tolerance [K]
    pub t_xtol: f64,
    /// Pressure step tolerance [Pa]
    pub p_xtol: f64,
    /// Mole fraction sum residual tolerance
    pub ytol: f64,
    /// Secant step budget per attempt
    pub max_secant_iterations: usize,
    /// Tolerance of the activity inversion
    pub x_tol: f64,
    /// Cycle budget of the activity inversion
    pub max_x_iterations: usize,
    /// Retry once from the ideal seed after a convergence failure
    pub retry: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            t_xtol: 1e-6,
            p_xtol: 1e-2,
            ytol: 5e-8,
            max_secant_iterations: 50,
            x_tol: 1e-5,
            max_x_iterations: 100,
            retry: true,
        }
    }
}

impl SolverOptions {
    pub fn with_max_x_iterations(mut self, max: usize) -> Self {
        self.max_x_iterations = max;
        self
    }

    pub fn with_x_tol(mut self, tol: f64) -> Self {
        self.x_tol = tol;
        self
    }

    pub fn with_max_secant_iterations(mut self, max: usize) -> Self {
        self.max_secant_iterations = max;
        self
    }

    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    /// Secant settings for a temperature unknown.
    pub fn temperature_secant(&self) -> SecantConfig {
        SecantConfig {
            xtol: self.t_xtol,
            ytol: self.ytol,
            max_iterations: self.max_secant_iterations,
            accelerate: true,
        }
    }

    /// Secant settings for a pressure unknown.
    pub fn pressure_secant(&self) -> SecantConfig {
        SecantConfig {
            xtol: self.p_xtol,
            ..self.temperature_secant()
        }
    }

    pub fn fixed_point(&self) -> FixedPointConfig {
        FixedPointConfig {
            tol: self.x_tol,
            max_iterations: self.max_x_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_equilibrium_tolerances() {
        let options = SolverOptions::default();
        assert_eq!(options.temperature_secant().xtol, 1e-6);
        assert_eq!(options.pressure_secant().xtol, 1e-2);
        assert_eq!(options.pressure_secant().ytol, 5e-8);
        assert_eq!(options.fixed_point(), FixedPointConfig::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: SolverOptions = serde_json::from_str(r#"{"max_x_iterations": 20}"#).unwrap();
        assert_eq!(options.max_x_iterations, 20);
        assert_eq!(options.x_tol, 1e-5);
        assert!(options.retry);
    }
}
