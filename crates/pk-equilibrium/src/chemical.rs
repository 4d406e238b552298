//! Pure chemicals and their serializable records.

use crate::error::{EquilibriumError, EquilibriumResult};
use crate::groups::ActivityFlavor;
use pk_models::{ModelHandle, ModelRecord, handle_from_records};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Subgroup id -> count.
pub type GroupCounts = BTreeMap<u32, u32>;

/// Pure-component data needed for vapor/liquid equilibrium.
#[derive(Debug, Clone)]
pub struct Chemical {
    id: String,
    mw: f64,
    tb: f64,
    psat: ModelHandle,
    unifac: Option<GroupCounts>,
    dortmund: Option<GroupCounts>,
}

impl Chemical {
    /// Create a chemical from its molar weight [g/mol], normal boiling point [K]
    /// and vapor pressure handle [Pa].
    pub fn new(id: impl Into<String>, mw: f64, tb: f64, psat: ModelHandle) -> EquilibriumResult<Self> {
        if !(mw.is_finite() && mw > 0.0) {
            return Err(EquilibriumError::InvalidArg {
                what: "molar weight must be positive and finite",
            });
        }
        if !(tb.is_finite() && tb > 0.0) {
            return Err(EquilibriumError::InvalidArg {
                what: "boiling point must be positive and finite",
            });
        }
        Ok(Self {
            id: id.into(),
            mw,
            tb,
            psat,
            unifac: None,
            dortmund: None,
        })
    }

    pub fn with_groups(mut self, flavor: ActivityFlavor, groups: GroupCounts) -> Self {
        match flavor {
            ActivityFlavor::Unifac => self.unifac = Some(groups),
            ActivityFlavor::Dortmund => self.dortmund = Some(groups),
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Molar weight [g/mol].
    pub fn mw(&self) -> f64 {
        self.mw
    }

    /// Normal boiling point [K].
    pub fn tb(&self) -> f64 {
        self.tb
    }

    pub fn psat(&self) -> &ModelHandle {
        &self.psat
    }

    pub fn psat_mut(&mut self) -> &mut ModelHandle {
        &mut self.psat
    }

    pub fn groups(&self, flavor: ActivityFlavor) -> Option<&GroupCounts> {
        match flavor {
            ActivityFlavor::Unifac => self.unifac.as_ref(),
            ActivityFlavor::Dortmund => self.dortmund.as_ref(),
        }
    }

    /// Group decomposition, or an error naming the chemical.
    pub fn require_groups(&self, flavor: ActivityFlavor) -> EquilibriumResult<&GroupCounts> {
        self.groups(flavor).ok_or_else(|| EquilibriumError::MissingGroups {
            chemical: self.id.clone(),
            flavor,
        })
    }
}

impl fmt::Display for Chemical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chemical: {} (MW={:.3}, Tb={:.2} K)", self.id, self.mw, self.tb)
    }
}

/// Serializable chemical definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChemicalRecord {
    pub id: String,
    pub mw: f64,
    pub tb: f64,
    pub psat: Vec<ModelRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unifac: Option<GroupCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dortmund: Option<GroupCounts>,
}

impl ChemicalRecord {
    pub fn into_chemical(self) -> EquilibriumResult<Chemical> {
        if self.psat.is_empty() {
            return Err(EquilibriumError::InvalidArg {
                what: "chemical record without vapor pressure models",
            });
        }
        let psat = handle_from_records(format!("{}.Psat", self.id), self.psat)?;
        let mut chemical = Chemical::new(self.id, self.mw, self.tb, psat)?;
        chemical.unifac = self.unifac;
        chemical.dortmund = self.dortmund;
        Ok(chemical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"
id: Acetone
mw: 58.08
tb: 329.2
psat:
  - name: Antoine
    t_min: 259.16
    t_max: 507.6
    var: Psat
    correlation:
      type: Antoine
      a: 4.42448
      b: 1312.253
      c: -32.445
      factor: 100000.0
unifac:
  1: 1
  18: 1
"#;

    #[test]
    fn record_from_yaml() {
        let record: ChemicalRecord = serde_yaml::from_str(RECORD).unwrap();
        let chemical = record.into_chemical().unwrap();
        assert_eq!(chemical.id(), "Acetone");
        assert_eq!(chemical.psat().name(), "Acetone.Psat");
        let p = chemical.psat().evaluate(chemical.tb(), 101325.0).unwrap();
        assert!((p - 101325.0).abs() / 101325.0 < 0.01);
        assert_eq!(chemical.groups(ActivityFlavor::Unifac).unwrap()[&18], 1);
        assert!(matches!(
            chemical.require_groups(ActivityFlavor::Dortmund),
            Err(EquilibriumError::MissingGroups { .. })
        ));
    }

    #[test]
    fn invalid_properties_rejected() {
        let psat = ModelHandle::new("X.Psat");
        assert!(Chemical::new("X", -1.0, 300.0, psat.clone()).is_err());
        assert!(Chemical::new("X", 10.0, f64::NAN, psat).is_err());
    }

    #[test]
    fn record_requires_psat() {
        let record = ChemicalRecord {
            id: "X".into(),
            mw: 10.0,
            tb: 300.0,
            psat: Vec::new(),
            unifac: None,
            dortmund: None,
        };
        assert!(record.into_chemical().is_err());
    }
}
