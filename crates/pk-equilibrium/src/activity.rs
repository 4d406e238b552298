//! Liquid-phase activity coefficients.
//!
//! [`GroupActivityCoefficients`] implements UNIFAC and Dortmund-modified UNIFAC
//! on top of a shared [`GroupDecomposition`]. `ln gamma` is the sum of a
//! combinatorial (size and shape) term and a residual (group interaction) term.

use crate::decomposition::GroupDecomposition;
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::groups::ActivityFlavor;
use crate::validation;
use nalgebra::{DMatrix, DVector};
use pk_core::LastCall;
use pk_solver::{FixedPointConfig, aitken_fixed_point};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Liquid activity coefficient model for a fixed, ordered list of chemicals.
pub trait ActivityCoefficients: Send + Sync + fmt::Debug {
    /// Chemical identifiers, in composition order.
    fn chemicals(&self) -> &[String];

    /// Natural logarithms of the activity coefficients at mole fractions `x`
    /// and temperature `t` [K].
    fn ln_gamma(&self, x: &[f64], t: f64) -> EquilibriumResult<Vec<f64>>;

    fn gamma(&self, x: &[f64], t: f64) -> EquilibriumResult<Vec<f64>> {
        Ok(self.ln_gamma(x, t)?.into_iter().map(f64::exp).collect())
    }

    /// Settings of the [`solve_x`](Self::solve_x) iteration.
    fn inversion(&self) -> FixedPointConfig {
        FixedPointConfig::default()
    }

    /// Find mole amounts `x` with `x * gamma(x / sum(x), t) = x_gamma`.
    ///
    /// Iterates `x -> x_gamma / gamma(x / sum(x), t)` from `x_guess` (or
    /// `x_gamma`). The result is not normalized; its sum measures how far
    /// `x_gamma` is from a consistent liquid.
    fn solve_x(&self, x_gamma: &[f64], t: f64, x_guess: Option<&[f64]>) -> EquilibriumResult<Vec<f64>> {
        let n = self.chemicals().len();
        validation::length("x_gamma", x_gamma, n)?;
        validation::amounts("x_gamma", x_gamma)?;
        validation::temperature(t)?;
        let start = match x_guess {
            Some(guess) => {
                validation::length("x_guess", guess, n)?;
                guess
            }
            None => x_gamma,
        };

        let target = DVector::from_column_slice(x_gamma);
        let map = |x: &DVector<f64>| -> EquilibriumResult<DVector<f64>> {
            let total = x.sum();
            if !(total > 0.0) {
                return Err(EquilibriumError::composition("liquid amounts vanished"));
            }
            let normalized: Vec<f64> = x.iter().map(|v| v / total).collect();
            let gamma = self.gamma(&normalized, t)?;
            Ok(DVector::from_iterator(
                n,
                target.iter().zip(gamma).map(|(xg, g)| xg / g),
            ))
        };
        let result = aitken_fixed_point(map, DVector::from_column_slice(start), &self.inversion())
            .map_err(|e| e.during("activity inversion"))?;
        Ok(result.x.iter().copied().collect())
    }
}

/// Raoult's law liquid, gamma = 1.
#[derive(Debug, Clone)]
pub struct IdealActivityCoefficients {
    chemicals: Vec<String>,
}

impl IdealActivityCoefficients {
    pub fn new(chemicals: Vec<String>) -> Self {
        Self { chemicals }
    }
}

impl ActivityCoefficients for IdealActivityCoefficients {
    fn chemicals(&self) -> &[String] {
        &self.chemicals
    }

    fn ln_gamma(&self, x: &[f64], t: f64) -> EquilibriumResult<Vec<f64>> {
        validation::length("x", x, self.chemicals.len())?;
        validation::temperature(t)?;
        Ok(vec![0.0; x.len()])
    }

    fn solve_x(&self, x_gamma: &[f64], t: f64, _x_guess: Option<&[f64]>) -> EquilibriumResult<Vec<f64>> {
        validation::length("x_gamma", x_gamma, self.chemicals.len())?;
        validation::temperature(t)?;
        Ok(x_gamma.to_vec())
    }
}

/// Temperature-dependent arrays, recomputed only when T changes.
#[derive(Debug)]
struct TemperatureTables {
    psi: DMatrix<f64>,
    /// chemical x group, ln Gamma of each group in the pure chemical
    pure_ln_gamma: DMatrix<f64>,
}

impl TemperatureTables {
    fn new(decomposition: &GroupDecomposition, t: f64) -> Self {
        let (psi, masked) = decomposition.psi(t);
        let fractions = decomposition.area_fractions();
        let n_chem = decomposition.n_chemicals();
        let n_group = decomposition.n_groups();
        let mut pure_ln_gamma = DMatrix::zeros(n_chem, n_group);
        for i in 0..n_chem {
            let theta = fractions.row(i).transpose();
            let ln_groups = group_ln_gamma(&masked, &theta, decomposition.group_q());
            pure_ln_gamma.set_row(i, &ln_groups.transpose());
        }
        Self { psi, pure_ln_gamma }
    }
}

/// Group residual terms `Q_k (1 - ln S_k - sum_m theta_m psi_km / S_m)` with
/// `S_k = sum_m theta_m psi_mk`. Zero sums are replaced by one.
fn group_ln_gamma(psi: &DMatrix<f64>, theta: &DVector<f64>, q: &DVector<f64>) -> DVector<f64> {
    let sums = (psi.transpose() * theta).map(|s| if s == 0.0 { 1.0 } else { s });
    let weighted = psi * theta.component_div(&sums);
    DVector::from_fn(q.len(), |k, _| q[k] * (1.0 - sums[k].ln() - weighted[k]))
}

/// Combinatorial ln gamma.
fn combinatorial(flavor: ActivityFlavor, r: &DVector<f64>, q: &DVector<f64>, x: &DVector<f64>) -> DVector<f64> {
    let r_net = x.dot(r);
    let q_net = x.dot(q);
    let v = r / r_net;
    let f = q / q_net;
    let v_size = match flavor {
        ActivityFlavor::Unifac => v.clone(),
        ActivityFlavor::Dortmund => {
            let r_p = r.map(|ri| ri.powf(0.75));
            let r_p_net = x.dot(&r_p);
            r_p / r_p_net
        }
    };
    DVector::from_fn(r.len(), |i, _| {
        let v_over_f = v[i] / f[i];
        1.0 - v_size[i] + v_size[i].ln() - 5.0 * q[i] * (1.0 - v_over_f + v_over_f.ln())
    })
}

/// UNIFAC-family activity coefficients.
pub struct GroupActivityCoefficients {
    decomposition: Arc<GroupDecomposition>,
    inversion: FixedPointConfig,
    tables: Mutex<LastCall<f64, Arc<TemperatureTables>>>,
}

impl GroupActivityCoefficients {
    pub fn new(decomposition: Arc<GroupDecomposition>) -> Self {
        Self {
            decomposition,
            inversion: FixedPointConfig::default(),
            tables: Mutex::new(LastCall::new()),
        }
    }

    pub fn with_inversion(mut self, inversion: FixedPointConfig) -> Self {
        self.inversion = inversion;
        self
    }

    pub fn flavor(&self) -> ActivityFlavor {
        self.decomposition.flavor()
    }

    pub fn decomposition(&self) -> &Arc<GroupDecomposition> {
        &self.decomposition
    }

    fn tables(&self, t: f64) -> Arc<TemperatureTables> {
        let mut memo = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let tables = memo.get_or_load(t, |&t| Arc::new(TemperatureTables::new(&self.decomposition, t)));
        Arc::clone(tables)
    }
}

impl ActivityCoefficients for GroupActivityCoefficients {
    fn chemicals(&self) -> &[String] {
        self.decomposition.chemicals()
    }

    fn ln_gamma(&self, x: &[f64], t: f64) -> EquilibriumResult<Vec<f64>> {
        let d = &*self.decomposition;
        validation::length("x", x, d.n_chemicals())?;
        let total = validation::amounts("x", x)?;
        validation::temperature(t)?;

        let x = DVector::from_iterator(x.len(), x.iter().map(|v| v / total));
        let tables = self.tables(t);

        let group_amounts = d.counts().transpose() * &x;
        let area = d.group_q().component_mul(&group_amounts);
        let theta = &area / area.sum();
        let ln_groups = group_ln_gamma(&tables.psi, &theta, d.group_q());

        let counts = d.counts();
        let comb = combinatorial(d.flavor(), d.r(), d.q(), &x);
        Ok((0..d.n_chemicals())
            .map(|i| {
                let residual: f64 = (0..d.n_groups())
                    .map(|k| counts[(i, k)] * (ln_groups[k] - tables.pure_ln_gamma[(i, k)]))
                    .sum();
                comb[i] + residual
            })
            .collect())
    }

    fn inversion(&self) -> FixedPointConfig {
        self.inversion
    }
}

impl fmt::Debug for GroupActivityCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupActivityCoefficients")
            .field("flavor", &self.decomposition.flavor())
            .field("chemicals", &self.decomposition.chemicals())
            .finish()
    }
}

impl fmt::Display for GroupActivityCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ActivityCoefficients([{}])",
            self.decomposition.flavor(),
            self.decomposition.chemicals().join(", ")
        )
    }
}
