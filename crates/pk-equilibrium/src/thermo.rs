//! Thermodynamic context: chemicals plus the models and settings used to
//! build activity engines and bubble/dew point solvers.

use crate::activity::{ActivityCoefficients, GroupActivityCoefficients};
use crate::bubble::BubblePoint;
use crate::chemical::Chemical;
use crate::database;
use crate::decomposition::GroupCache;
use crate::dew::DewPoint;
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::fugacity::{
    FugacityCoefficients, IdealFugacityCoefficients, IdealPoyntingCorrection, PoyntingCorrection,
};
use crate::groups::ActivityFlavor;
use pk_solver::SolverOptions;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Thermo {
    chemicals: Vec<Chemical>,
    flavor: ActivityFlavor,
    phi: Arc<dyn FugacityCoefficients>,
    pcf: Arc<dyn PoyntingCorrection>,
    options: SolverOptions,
    cache: Arc<GroupCache>,
}

impl Thermo {
    /// Context over `chemicals` with Dortmund activity coefficients and an
    /// ideal vapor.
    pub fn new(chemicals: Vec<Chemical>) -> EquilibriumResult<Self> {
        if chemicals.is_empty() {
            return Err(EquilibriumError::InvalidArg {
                what: "thermodynamic context needs at least one chemical",
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = chemicals.iter().find(|c| !seen.insert(c.id())) {
            return Err(EquilibriumError::composition(format!(
                "chemical {} listed twice",
                dup.id()
            )));
        }
        Ok(Self {
            chemicals,
            flavor: ActivityFlavor::default(),
            phi: Arc::new(IdealFugacityCoefficients),
            pcf: Arc::new(IdealPoyntingCorrection),
            options: SolverOptions::default(),
            cache: Arc::new(GroupCache::new()),
        })
    }

    /// Context over built-in chemicals.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> EquilibriumResult<Self> {
        let chemicals = ids
            .iter()
            .map(|id| database::builtin(id.as_ref()))
            .collect::<EquilibriumResult<Vec<_>>>()?;
        Self::new(chemicals)
    }

    pub fn with_flavor(mut self, flavor: ActivityFlavor) -> Self {
        self.flavor = flavor;
        self
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

    /// Share a decomposition cache with other contexts.
    pub fn with_cache(mut self, cache: Arc<GroupCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn chemicals(&self) -> &[Chemical] {
        &self.chemicals
    }

    pub fn ids(&self) -> Vec<&str> {
        self.chemicals.iter().map(|c| c.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.chemicals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chemicals.is_empty()
    }

    pub fn chemical(&self, id: &str) -> Option<&Chemical> {
        self.chemicals.iter().find(|c| c.id() == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.chemicals.iter().position(|c| c.id() == id)
    }

    pub fn flavor(&self) -> ActivityFlavor {
        self.flavor
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<GroupCache> {
        &self.cache
    }

    fn select(&self, indices: &[usize]) -> EquilibriumResult<Vec<&Chemical>> {
        if indices.is_empty() {
            return Err(EquilibriumError::composition("no chemicals selected"));
        }
        indices
            .iter()
            .map(|&i| {
                self.chemicals.get(i).ok_or(EquilibriumError::InvalidArg {
                    what: "chemical index out of range",
                })
            })
            .collect()
    }

    fn all(&self) -> Vec<usize> {
        (0..self.chemicals.len()).collect()
    }

    pub fn activity_coefficients(&self) -> EquilibriumResult<Arc<dyn ActivityCoefficients>> {
        self.activity_for(&self.all())
    }

    /// Activity engine over the chemicals at `indices`, in that order.
    pub fn activity_for(&self, indices: &[usize]) -> EquilibriumResult<Arc<dyn ActivityCoefficients>> {
        let chemicals = self.select(indices)?;
        self.activity_over(&chemicals)
    }

    fn activity_over(&self, chemicals: &[&Chemical]) -> EquilibriumResult<Arc<dyn ActivityCoefficients>> {
        let decomposition = self.cache.get_or_build(chemicals, self.flavor)?;
        Ok(Arc::new(
            GroupActivityCoefficients::new(decomposition).with_inversion(self.options.fixed_point()),
        ))
    }

    pub fn bubble_point(&self) -> EquilibriumResult<BubblePoint> {
        self.bubble_point_for(&self.all())
    }

    pub fn bubble_point_for(&self, indices: &[usize]) -> EquilibriumResult<BubblePoint> {
        let chemicals = self.select(indices)?;
        let gamma = self.activity_over(&chemicals)?;
        Ok(BubblePoint::new(&chemicals, gamma)?
            .with_fugacity(Arc::clone(&self.phi))
            .with_poynting(Arc::clone(&self.pcf))
            .with_options(self.options))
    }

    pub fn dew_point(&self) -> EquilibriumResult<DewPoint> {
        self.dew_point_for(&self.all())
    }

    pub fn dew_point_for(&self, indices: &[usize]) -> EquilibriumResult<DewPoint> {
        let chemicals = self.select(indices)?;
        let gamma = self.activity_over(&chemicals)?;
        Ok(DewPoint::new(&chemicals, gamma)?
            .with_fugacity(Arc::clone(&self.phi))
            .with_poynting(Arc::clone(&self.pcf))
            .with_options(self.options))
    }
}

impl fmt::Display for Thermo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thermo([{}], {})", self.ids().join(", "), self.flavor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_database() {
        let thermo = Thermo::from_ids(&["Ethanol", "Water"]).unwrap();
        assert_eq!(thermo.len(), 2);
        assert_eq!(thermo.index_of("Water"), Some(1));
        assert!(thermo.chemical("Methanol").is_none());
        assert_eq!(thermo.to_string(), "Thermo([Ethanol, Water], Dortmund)");
    }

    #[test]
    fn rejects_bad_chemical_lists() {
        assert!(Thermo::new(Vec::new()).is_err());
        assert!(matches!(
            Thermo::from_ids(&["Ethanol", "Ethanol"]),
            Err(EquilibriumError::Composition { .. })
        ));
        assert!(matches!(
            Thermo::from_ids(&["Unobtainium"]),
            Err(EquilibriumError::UnknownChemical { .. })
        ));
    }

    #[test]
    fn factories_share_the_cache() {
        let thermo = Thermo::from_ids(&["Ethanol", "Water", "n-Hexane"]).unwrap();
        let gamma = thermo.activity_for(&[0, 1]).unwrap();
        assert_eq!(gamma.chemicals(), ["Ethanol", "Water"]);
        let _bp = thermo.bubble_point_for(&[0, 1]).unwrap();
        let _dp = thermo.dew_point_for(&[0, 1]).unwrap();
        assert_eq!(thermo.cache().len(), 1);

        thermo.activity_for(&[1, 0]).unwrap();
        assert_eq!(thermo.cache().len(), 2);
        assert!(thermo.cache().contains(&["Water", "Ethanol"], ActivityFlavor::Dortmund));
    }

    #[test]
    fn subset_indices_validated() {
        let thermo = Thermo::from_ids(&["Ethanol", "Water"]).unwrap();
        assert!(thermo.activity_for(&[]).is_err());
        assert!(matches!(
            thermo.bubble_point_for(&[0, 5]),
            Err(EquilibriumError::InvalidArg { .. })
        ));
    }

    #[test]
    fn flavor_selects_parameters() {
        let thermo = Thermo::from_ids(&["Ethanol", "Water"])
            .unwrap()
            .with_flavor(ActivityFlavor::Unifac);
        let gamma = thermo.activity_coefficients().unwrap();
        let g = gamma.gamma(&[0.6, 0.4], 352.28).unwrap();
        assert!((g[0] - 1.1348).abs() < 1e-3, "{g:?}");
        assert!(thermo.cache().contains(&["Ethanol", "Water"], ActivityFlavor::Unifac));
    }

    #[test]
    fn options_flow_into_solvers() {
        let options = SolverOptions::default().with_max_secant_iterations(1).with_retry(false);
        let thermo = Thermo::from_ids(&["Ethanol", "Water"]).unwrap().with_options(options);
        let mut bp = thermo.bubble_point().unwrap();
        let err = bp.solve_ty(&[0.6, 0.4], 101325.0).unwrap_err();
        assert!(err.is_convergence(), "{err}");
        assert!(err.to_string().starts_with("bubble point temperature failed"));
    }
}
