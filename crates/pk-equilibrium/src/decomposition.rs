//! Per-mixture group decomposition and its cache.
//!
//! A [`GroupDecomposition`] holds everything the activity model needs that does
//! not depend on composition or temperature. Building one walks the parameter
//! tables, so [`GroupCache`] keeps each decomposition for the lifetime of the
//! thermodynamic context.

use crate::chemical::Chemical;
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::groups::{ActivityFlavor, Interaction};
use nalgebra::{DMatrix, DVector};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

/// Precomputed group arrays for an ordered list of chemicals.
#[derive(Debug, Clone)]
pub struct GroupDecomposition {
    flavor: ActivityFlavor,
    chemicals: Vec<String>,
    /// Subgroup ids in ascending order; column order of every group array.
    subgroups: Vec<u32>,
    main_groups: Vec<u32>,
    /// chemical x group
    counts: DMatrix<f64>,
    group_q: DVector<f64>,
    group_r: DVector<f64>,
    chemical_r: DVector<f64>,
    chemical_q: DVector<f64>,
    /// chemical x group, rows sum to one
    area_fractions: DMatrix<f64>,
    /// group x group, `interactions[(m, k)]` runs from group m to group k
    interactions: DMatrix<Interaction>,
    /// group x group pairs present together in at least one chemical
    mask: DMatrix<bool>,
}

impl GroupDecomposition {
    pub fn build(chemicals: &[&Chemical], flavor: ActivityFlavor) -> EquilibriumResult<Self> {
        if chemicals.is_empty() {
            return Err(EquilibriumError::composition("no chemicals"));
        }
        let decompositions = chemicals
            .iter()
            .map(|c| c.require_groups(flavor))
            .collect::<EquilibriumResult<Vec<_>>>()?;

        let subgroups: Vec<u32> = decompositions
            .iter()
            .flat_map(|groups| groups.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let params = subgroups
            .iter()
            .map(|&id| {
                flavor
                    .subgroup(id)
                    .ok_or(EquilibriumError::UnknownSubgroup { flavor, id })
            })
            .collect::<EquilibriumResult<Vec<_>>>()?;

        let n_chem = chemicals.len();
        let n_group = subgroups.len();
        let mut counts = DMatrix::zeros(n_chem, n_group);
        for (i, groups) in decompositions.iter().enumerate() {
            for (col, id) in subgroups.iter().enumerate() {
                if let Some(&count) = groups.get(id) {
                    counts[(i, col)] = f64::from(count);
                }
            }
        }

        let group_q = DVector::from_iterator(n_group, params.iter().map(|s| s.q));
        let group_r = DVector::from_iterator(n_group, params.iter().map(|s| s.r));
        let chemical_r = &counts * &group_r;
        let chemical_q = &counts * &group_q;

        let area_fractions = DMatrix::from_fn(n_chem, n_group, |i, g| {
            let total = chemical_q[i];
            if total > 0.0 {
                counts[(i, g)] * group_q[g] / total
            } else {
                0.0
            }
        });

        let main_groups: Vec<u32> = params.iter().map(|s| s.main_group).collect();
        let mut interactions = DMatrix::from_element(n_group, n_group, Interaction::NONE);
        for (m, &from) in main_groups.iter().enumerate() {
            for (k, &to) in main_groups.iter().enumerate() {
                interactions[(m, k)] =
                    flavor
                        .interaction(from, to)
                        .ok_or(EquilibriumError::MissingInteraction {
                            flavor,
                            first: from,
                            second: to,
                        })?;
            }
        }

        let mut mask = DMatrix::from_element(n_group, n_group, false);
        for i in 0..n_chem {
            let present: Vec<usize> = (0..n_group)
                .filter(|&g| area_fractions[(i, g)] != 0.0)
                .collect();
            for &m in &present {
                for &k in &present {
                    mask[(m, k)] = true;
                }
            }
        }

        Ok(Self {
            flavor,
            chemicals: chemicals.iter().map(|c| c.id().to_string()).collect(),
            subgroups,
            main_groups,
            counts,
            group_q,
            group_r,
            chemical_r,
            chemical_q,
            area_fractions,
            interactions,
            mask,
        })
    }

    pub fn flavor(&self) -> ActivityFlavor {
        self.flavor
    }

    pub fn chemicals(&self) -> &[String] {
        &self.chemicals
    }

    pub fn subgroups(&self) -> &[u32] {
        &self.subgroups
    }

    pub fn main_groups(&self) -> &[u32] {
        &self.main_groups
    }

    pub fn n_chemicals(&self) -> usize {
        self.counts.nrows()
    }

    pub fn n_groups(&self) -> usize {
        self.counts.ncols()
    }

    pub fn counts(&self) -> &DMatrix<f64> {
        &self.counts
    }

    pub fn group_q(&self) -> &DVector<f64> {
        &self.group_q
    }

    pub fn group_r(&self) -> &DVector<f64> {
        &self.group_r
    }

    /// Per-chemical volume parameter `r = counts * R`.
    pub fn r(&self) -> &DVector<f64> {
        &self.chemical_r
    }

    /// Per-chemical area parameter `q = counts * Q`.
    pub fn q(&self) -> &DVector<f64> {
        &self.chemical_q
    }

    pub fn area_fractions(&self) -> &DMatrix<f64> {
        &self.area_fractions
    }

    pub fn interactions(&self) -> &DMatrix<Interaction> {
        &self.interactions
    }

    pub fn mask(&self) -> &DMatrix<bool> {
        &self.mask
    }

    /// Group interaction factors at `t`: all pairs and the masked copy used for
    /// pure-component reference states (unavailable pairs are zero).
    pub fn psi(&self, t: f64) -> (DMatrix<f64>, DMatrix<f64>) {
        let psi = self.interactions.map(|ij| ij.psi(t));
        let masked = psi.zip_map(&self.mask, |v, keep| if keep { v } else { 0.0 });
        (psi, masked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    chemicals: Vec<String>,
    flavor: ActivityFlavor,
}

/// Shared store of group decompositions keyed by ordered chemical ids and flavor.
///
/// Different orderings of the same chemicals are separate entries.
#[derive(Debug, Default)]
pub struct GroupCache {
    entries: Mutex<HashMap<CacheKey, Arc<GroupDecomposition>>>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the decomposition for `chemicals`, building it on first use.
    pub fn get_or_build(
        &self,
        chemicals: &[&Chemical],
        flavor: ActivityFlavor,
    ) -> EquilibriumResult<Arc<GroupDecomposition>> {
        let key = CacheKey {
            chemicals: chemicals.iter().map(|c| c.id().to_string()).collect(),
            flavor,
        };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(&key) {
            return Ok(Arc::clone(entry));
        }
        let entry = Arc::new(GroupDecomposition::build(chemicals, flavor)?);
        tracing::debug!(
            chemicals = ?key.chemicals,
            %flavor,
            groups = entry.n_groups(),
            "built group decomposition"
        );
        entries.insert(key, Arc::clone(&entry));
        Ok(entry)
    }

    pub fn contains(&self, chemicals: &[&str], flavor: ActivityFlavor) -> bool {
        let key = CacheKey {
            chemicals: chemicals.iter().map(|c| c.to_string()).collect(),
            flavor,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::builtin;
    use pk_models::ModelHandle;

    fn ethanol_water() -> (Chemical, Chemical) {
        (builtin("Ethanol").unwrap(), builtin("Water").unwrap())
    }

    #[test]
    fn columns_are_sorted_subgroup_ids() {
        let (ethanol, water) = ethanol_water();
        let d = GroupDecomposition::build(&[&water, &ethanol], ActivityFlavor::Dortmund).unwrap();
        assert_eq!(d.subgroups(), &[1, 2, 14, 16]);
        assert_eq!(d.main_groups(), &[1, 1, 5, 7]);
        assert_eq!(d.counts()[(0, 3)], 1.0);
        assert_eq!(d.counts()[(1, 0)], 1.0);
        assert_eq!(d.counts()[(1, 3)], 0.0);
    }

    #[test]
    fn volume_and_area_parameters() {
        let (ethanol, water) = ethanol_water();
        let d = GroupDecomposition::build(&[&ethanol, &water], ActivityFlavor::Unifac).unwrap();
        assert!((d.r()[0] - (0.9011 + 0.6744 + 1.0)).abs() < 1e-12);
        assert!((d.q()[0] - (0.848 + 0.540 + 1.2)).abs() < 1e-12);
        assert!((d.r()[1] - 0.92).abs() < 1e-12);
        for row in d.area_fractions().row_iter() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn mask_marks_groups_sharing_a_chemical() {
        let (ethanol, water) = ethanol_water();
        let d = GroupDecomposition::build(&[&ethanol, &water], ActivityFlavor::Dortmund).unwrap();
        // CH3 and OH share ethanol; CH3 and H2O never meet.
        assert!(d.mask()[(0, 2)]);
        assert!(!d.mask()[(0, 3)]);
        assert!(d.mask()[(3, 3)]);
        let (psi, masked) = d.psi(350.0);
        assert_eq!(masked[(0, 3)], 0.0);
        assert!(psi[(0, 3)] > 0.0);
        assert_eq!(psi[(0, 1)], 1.0);
    }

    #[test]
    fn missing_decomposition_names_chemical() {
        let bare = Chemical::new("Mystery", 10.0, 300.0, ModelHandle::new("Mystery.Psat")).unwrap();
        let err = GroupDecomposition::build(&[&bare], ActivityFlavor::Unifac).unwrap_err();
        assert!(err.to_string().contains("Mystery"));
    }

    #[test]
    fn unknown_subgroup_and_missing_interaction() {
        let psat = ModelHandle::new("X.Psat");
        let odd = Chemical::new("Odd", 10.0, 300.0, psat.clone())
            .unwrap()
            .with_groups(ActivityFlavor::Dortmund, [(9999, 1)].into_iter().collect());
        assert!(matches!(
            GroupDecomposition::build(&[&odd], ActivityFlavor::Dortmund),
            Err(EquilibriumError::UnknownSubgroup { id: 9999, .. })
        ));

        // Methanol (main group 6) has no ketone (main group 9) parameters.
        let methanol = Chemical::new("Methanol", 32.04, 337.7, psat.clone())
            .unwrap()
            .with_groups(ActivityFlavor::Unifac, [(15, 1)].into_iter().collect());
        let acetone = Chemical::new("Acetone", 58.08, 329.2, psat)
            .unwrap()
            .with_groups(ActivityFlavor::Unifac, [(1, 1), (18, 1)].into_iter().collect());
        assert!(matches!(
            GroupDecomposition::build(&[&methanol, &acetone], ActivityFlavor::Unifac),
            Err(EquilibriumError::MissingInteraction { .. })
        ));
    }

    #[test]
    fn cache_is_keyed_by_order_and_flavor() {
        let (ethanol, water) = ethanol_water();
        let cache = GroupCache::new();
        let ab = cache
            .get_or_build(&[&ethanol, &water], ActivityFlavor::Dortmund)
            .unwrap();
        let again = cache
            .get_or_build(&[&ethanol, &water], ActivityFlavor::Dortmund)
            .unwrap();
        assert!(Arc::ptr_eq(&ab, &again));
        assert_eq!(cache.len(), 1);

        let ba = cache
            .get_or_build(&[&water, &ethanol], ActivityFlavor::Dortmund)
            .unwrap();
        assert!(!Arc::ptr_eq(&ab, &ba));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&["Water", "Ethanol"], ActivityFlavor::Dortmund));
        assert!(!cache.contains(&["Water", "Ethanol"], ActivityFlavor::Unifac));

        cache
            .get_or_build(&[&ethanol, &water], ActivityFlavor::Unifac)
            .unwrap();
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_builds_are_not_cached() {
        let bare = Chemical::new("Mystery", 10.0, 300.0, ModelHandle::new("Mystery.Psat")).unwrap();
        let cache = GroupCache::new();
        assert!(cache.get_or_build(&[&bare], ActivityFlavor::Dortmund).is_err());
        assert!(cache.is_empty());
    }
}
