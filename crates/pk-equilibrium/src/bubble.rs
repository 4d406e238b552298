//! Bubble point solver.
//!
//! The bubble point of a liquid `z` is where the vapor in equilibrium with it,
//! `y = z * gamma * Psat / (phi * P)`, sums to one. Temperature or pressure is
//! found by secant iteration on `1 - sum(y)`, warm-started from the previous
//! solution and retried once from the ideal-solution seed on convergence
//! failure.

use crate::activity::ActivityCoefficients;
use crate::chemical::Chemical;
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::fugacity::{
    FugacityCoefficients, IdealFugacityCoefficients, IdealPoyntingCorrection, PoyntingCorrection,
};
use crate::validation;
use pk_core::constants::P_ATM_PA;
use pk_models::{ModelHandle, ModelResult};
use pk_solver::{SecantConfig, SolverOptions, aitken_secant};
use std::fmt;
use std::sync::Arc;

/// Saturation pressure handles and normal boiling points, in chemical order.
#[derive(Debug, Clone)]
pub(crate) struct PureComponents {
    psats: Vec<ModelHandle>,
    tbs: Vec<f64>,
}

impl PureComponents {
    pub(crate) fn new(chemicals: &[&Chemical]) -> Self {
        Self {
            psats: chemicals.iter().map(|c| c.psat().clone()).collect(),
            tbs: chemicals.iter().map(|c| c.tb()).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tbs.len()
    }

    pub(crate) fn psat(&self, t: f64, p: f64) -> ModelResult<Vec<f64>> {
        self.psats.iter().map(|h| h.evaluate(t, p)).collect()
    }

    /// Mole-fraction weighted normal boiling point.
    pub(crate) fn ideal_t(&self, z: &[f64]) -> f64 {
        z.iter().zip(&self.tbs).map(|(zi, tb)| zi * tb).sum()
    }
}

/// Check that an activity model was built for the given chemicals, in order.
pub(crate) fn check_chemicals(
    gamma: &dyn ActivityCoefficients,
    chemicals: &[&Chemical],
) -> EquilibriumResult<()> {
    let ids = gamma.chemicals();
    if ids.len() != chemicals.len() {
        return Err(EquilibriumError::LengthMismatch {
            what: "activity model chemicals",
            expected: chemicals.len(),
            got: ids.len(),
        });
    }
    if ids.iter().zip(chemicals).any(|(id, c)| id != c.id()) {
        return Err(EquilibriumError::InvalidArg {
            what: "activity model chemicals differ from solver chemicals",
        });
    }
    Ok(())
}

/// Bubble point temperature and pressure solver for one chemical list.
pub struct BubblePoint {
    gamma: Arc<dyn ActivityCoefficients>,
    phi: Arc<dyn FugacityCoefficients>,
    pcf: Arc<dyn PoyntingCorrection>,
    pure: PureComponents,
    options: SolverOptions,
    t: Option<f64>,
    p: Option<f64>,
    y: Option<Vec<f64>>,
}

impl BubblePoint {
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
            y: None,
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

    /// Last converged temperature [K].
    pub fn t(&self) -> Option<f64> {
        self.t
    }

    /// Last converged pressure [Pa].
    pub fn p(&self) -> Option<f64> {
        self.p
    }

    /// Last vapor composition.
    pub fn y(&self) -> Option<&[f64]> {
        self.y.as_deref()
    }

    /// Forget warm-start state.
    pub fn reset(&mut self) {
        self.t = None;
        self.p = None;
        self.y = None;
    }

    /// Bubble point temperature [K] and vapor composition of liquid `z` at
    /// pressure `p` [Pa].
    pub fn solve_ty(&mut self, z: &[f64], p: f64) -> EquilibriumResult<(f64, Vec<f64>)> {
        let z = validation::composition("z", z, self.pure.len())?;
        let p = validation::pressure(p)?;
        self.p = Some(p);
        let config = self.options.temperature_secant();
        let seed = self.t.unwrap_or_else(|| self.pure.ideal_t(&z));

        let result = match self.attempt_t(&z, p, seed, &config) {
            Err(e) if e.is_convergence() && self.options.retry => {
                let seed = self.pure.ideal_t(&z);
                tracing::warn!(error = %e, seed, "bubble point temperature failed, retrying from ideal seed");
                self.y = Some(z.clone());
                self.attempt_t(&z, p, seed, &config)
            }
            other => other,
        };
        match result {
            Ok(t) => {
                self.t = Some(t);
                Ok((t, self.normalized_y()?))
            }
            Err(e) => {
                self.t = None;
                Err(e.during("bubble point temperature"))
            }
        }
    }

    fn attempt_t(&mut self, z: &[f64], p: f64, seed: f64, config: &SecantConfig) -> EquilibriumResult<f64> {
        let Self {
            gamma,
            phi,
            pcf,
            pure,
            y,
            ..
        } = self;
        let residual = |t: f64| -> EquilibriumResult<f64> {
            let psat = pure.psat(t, p)?;
            let gammas = gamma.gamma(z, t)?;
            let poynting = pcf.factors(&psat, t, p)?;
            let y_phi: Vec<f64> = (0..z.len())
                .map(|i| z[i] * psat[i] * gammas[i] * poynting[i] / p)
                .collect();
            let next = phi.solve_y(&y_phi, t, p, y.as_deref())?;
            let sum: f64 = next.iter().sum();
            *y = Some(next);
            Ok(1.0 - sum)
        };
        let root = aitken_secant(residual, seed, seed + 0.01, config)?;
        tracing::debug!(t = root.x, iterations = root.iterations, "bubble point temperature");
        Ok(root.x)
    }

    /// Bubble point pressure [Pa] and vapor composition of liquid `z` at
    /// temperature `t` [K].
    pub fn solve_py(&mut self, z: &[f64], t: f64) -> EquilibriumResult<(f64, Vec<f64>)> {
        let z = validation::composition("z", z, self.pure.len())?;
        let t = validation::temperature(t)?;
        self.t = Some(t);
        let psat = self.pure.psat(t, self.p.unwrap_or(P_ATM_PA))?;
        let gammas = self.gamma.gamma(&z, t)?;
        let psat_gamma: Vec<f64> = psat.iter().zip(&gammas).map(|(ps, g)| ps * g).collect();
        let ideal: f64 = z.iter().zip(&psat).map(|(zi, ps)| zi * ps).sum();
        let config = self.options.pressure_secant();
        let seed = self.p.unwrap_or(ideal);

        let result = match self.attempt_p(&z, t, &psat, &psat_gamma, seed, &config) {
            Err(e) if e.is_convergence() && self.options.retry => {
                tracing::warn!(error = %e, seed = ideal, "bubble point pressure failed, retrying from ideal seed");
                self.y = Some(z.clone());
                self.attempt_p(&z, t, &psat, &psat_gamma, ideal, &config)
            }
            other => other,
        };
        match result {
            Ok(p) => {
                self.p = Some(p);
                Ok((p, self.normalized_y()?))
            }
            Err(e) => {
                self.p = None;
                Err(e.during("bubble point pressure"))
            }
        }
    }

    fn attempt_p(
        &mut self,
        z: &[f64],
        t: f64,
        psat: &[f64],
        psat_gamma: &[f64],
        seed: f64,
        config: &SecantConfig,
    ) -> EquilibriumResult<f64> {
        let Self { phi, pcf, y, .. } = self;
        let residual = |p: f64| -> EquilibriumResult<f64> {
            let poynting = pcf.factors(psat, t, p)?;
            let y_phi: Vec<f64> = (0..z.len())
                .map(|i| z[i] * psat_gamma[i] * poynting[i] / p)
                .collect();
            let next = phi.solve_y(&y_phi, t, p, y.as_deref())?;
            let sum: f64 = next.iter().sum();
            *y = Some(next);
            Ok(1.0 - sum)
        };
        let root = aitken_secant(residual, seed, seed - 1.0, config)?;
        tracing::debug!(p = root.x, iterations = root.iterations, "bubble point pressure");
        Ok(root.x)
    }

    fn normalized_y(&mut self) -> EquilibriumResult<Vec<f64>> {
        let y = self
            .y
            .as_deref()
            .ok_or_else(|| EquilibriumError::composition("no vapor composition computed"))?;
        let y = pk_core::normalize(y)?;
        self.y = Some(y.clone());
        Ok(y)
    }
}

impl fmt::Debug for BubblePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BubblePoint")
            .field("chemicals", &self.chemicals())
            .field("t", &self.t)
            .field("p", &self.p)
            .field("y", &self.y)
            .finish()
    }
}

impl fmt::Display for BubblePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BubblePoint([{}])", self.chemicals().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{GroupActivityCoefficients, IdealActivityCoefficients};
    use crate::database::builtin;
    use crate::decomposition::GroupDecomposition;
    use crate::groups::ActivityFlavor;
    use pk_solver::SolverError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Ideal gas whose next `solve_y` stalls once armed.
    #[derive(Debug, Default)]
    struct StallingGas {
        armed: AtomicBool,
        calls: Mutex<Vec<(f64, Option<Vec<f64>>)>>,
    }

    impl StallingGas {
        fn arm(&self) {
            self.calls.lock().unwrap().clear();
            self.armed.store(true, Ordering::SeqCst);
        }
    }

    impl FugacityCoefficients for StallingGas {
        fn phi(&self, y: &[f64], t: f64, p: f64) -> EquilibriumResult<Vec<f64>> {
            IdealFugacityCoefficients.phi(y, t, p)
        }

        fn solve_y(
            &self,
            y_phi: &[f64],
            t: f64,
            p: f64,
            y_guess: Option<&[f64]>,
        ) -> EquilibriumResult<Vec<f64>> {
            self.calls.lock().unwrap().push((t, y_guess.map(<[f64]>::to_vec)));
            if self.armed.swap(false, Ordering::SeqCst) {
                return Err(SolverError::ZeroSlope { x: t, y: 0.0 }.into());
            }
            IdealFugacityCoefficients.solve_y(y_phi, t, p, y_guess)
        }
    }

    fn ethanol_water() -> Vec<Chemical> {
        vec![builtin("Ethanol").unwrap(), builtin("Water").unwrap()]
    }

    fn dortmund(chemicals: &[Chemical]) -> BubblePoint {
        let refs: Vec<&Chemical> = chemicals.iter().collect();
        let d = GroupDecomposition::build(&refs, ActivityFlavor::Dortmund).unwrap();
        BubblePoint::new(&refs, Arc::new(GroupActivityCoefficients::new(Arc::new(d)))).unwrap()
    }

    #[test]
    fn ethanol_water_bubble_temperature() {
        let chemicals = ethanol_water();
        let mut bp = dortmund(&chemicals);
        let (t, y) = bp.solve_ty(&[0.6, 0.4], 101325.0).unwrap();
        assert!((t - 352.28).abs() < 0.1, "T = {t}");
        assert!((y[0] - 0.703).abs() < 0.005, "y = {y:?}");
        assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(bp.t(), Some(t));

        // Warm start from the previous solution reaches the same point.
        let (t_again, _) = bp.solve_ty(&[0.6, 0.4], 101325.0).unwrap();
        assert!((t_again - t).abs() < 1e-4);
    }

    #[test]
    fn ethanol_water_bubble_pressure() {
        let chemicals = ethanol_water();
        let mut bp = dortmund(&chemicals);
        let (p, y) = bp.solve_py(&[0.703, 0.297], 352.28).unwrap();
        assert!((p - 103494.0).abs() / 103494.0 < 0.005, "P = {p}");
        assert!((y[0] - 0.757).abs() < 0.005, "y = {y:?}");
        assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn raoult_law_bubble_pressure_is_exact() {
        let chemicals = ethanol_water();
        let refs: Vec<&Chemical> = chemicals.iter().collect();
        let ideal = IdealActivityCoefficients::new(vec!["Ethanol".into(), "Water".into()]);
        let mut bp = BubblePoint::new(&refs, Arc::new(ideal)).unwrap();
        let t = 350.0;
        let psat: Vec<f64> = chemicals
            .iter()
            .map(|c| c.psat().evaluate(t, 101325.0).unwrap())
            .collect();
        let (p, y) = bp.solve_py(&[0.5, 0.5], t).unwrap();
        let expected = 0.5 * psat[0] + 0.5 * psat[1];
        assert!((p - expected).abs() < 0.05);
        assert!((y[0] - 0.5 * psat[0] / expected).abs() < 1e-8);
    }

    #[test]
    fn composition_is_validated() {
        let chemicals = ethanol_water();
        let mut bp = dortmund(&chemicals);
        assert!(matches!(
            bp.solve_ty(&[1.0], 101325.0),
            Err(EquilibriumError::LengthMismatch { .. })
        ));
        assert!(matches!(
            bp.solve_ty(&[0.0, 0.0], 101325.0),
            Err(EquilibriumError::Composition { .. })
        ));
        assert!(bp.solve_ty(&[0.5, 0.5], 0.0).is_err());
    }

    #[test]
    fn unnormalized_feed_gives_same_point() {
        let chemicals = ethanol_water();
        let (t_frac, _) = dortmund(&chemicals).solve_ty(&[0.6, 0.4], 101325.0).unwrap();
        let (t_mol, _) = dortmund(&chemicals).solve_ty(&[6.0, 4.0], 101325.0).unwrap();
        assert!((t_frac - t_mol).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_pressure_is_a_model_error() {
        let chemicals = ethanol_water();
        let mut bp = dortmund(&chemicals);
        // Boiling at 1 GPa lies above every vapor pressure model.
        let err = bp.solve_ty(&[0.5, 0.5], 1e9).unwrap_err();
        assert!(matches!(err, EquilibriumError::Model(_)), "{err}");
        assert_eq!(bp.t(), None);
    }

    #[test]
    fn mismatched_activity_model_rejected() {
        let chemicals = ethanol_water();
        let refs: Vec<&Chemical> = chemicals.iter().collect();
        let ideal = IdealActivityCoefficients::new(vec!["Water".into(), "Ethanol".into()]);
        assert!(BubblePoint::new(&refs, Arc::new(ideal)).is_err());
        let ideal = IdealActivityCoefficients::new(vec!["Water".into()]);
        assert!(BubblePoint::new(&refs, Arc::new(ideal)).is_err());
    }

    #[test]
    fn stalled_warm_start_retries_from_ideal_seed() {
        let chemicals = ethanol_water();
        let gas = Arc::new(StallingGas::default());
        let mut bp = dortmund(&chemicals).with_fugacity(gas.clone());
        let (warm, _) = bp.solve_ty(&[0.3, 0.7], 101325.0).unwrap();

        gas.arm();
        let (t, y) = bp.solve_ty(&[0.6, 0.4], 101325.0).unwrap();
        assert!((t - 352.29).abs() < 0.05, "T = {t}");
        assert!((y[0] - 0.7025).abs() < 0.002, "y = {y:?}");
        assert_eq!(bp.t(), Some(t));

        let calls = gas.calls.lock().unwrap();
        assert_eq!(calls[0].0, warm);
        let seed = 0.6 * chemicals[0].tb() + 0.4 * chemicals[1].tb();
        assert!((calls[1].0 - seed).abs() < 1e-9, "{calls:?}");
        assert_eq!(calls[1].1.as_deref(), Some(&[0.6, 0.4][..]));
    }

    #[test]
    fn stalled_solve_without_retry_fails() {
        let chemicals = ethanol_water();
        let gas = Arc::new(StallingGas::default());
        let options = SolverOptions {
            retry: false,
            ..SolverOptions::default()
        };
        let mut bp = dortmund(&chemicals)
            .with_fugacity(gas.clone())
            .with_options(options);
        gas.arm();
        let err = bp.solve_ty(&[0.6, 0.4], 101325.0).unwrap_err();
        assert!(err.is_convergence());
        assert!(err.to_string().starts_with("bubble point temperature failed"));
        assert_eq!(bp.t(), None);
        assert_eq!(gas.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn display() {
        let chemicals = ethanol_water();
        assert_eq!(dortmund(&chemicals).to_string(), "BubblePoint([Ethanol, Water])");
    }
}
