//! Group contribution parameter tables.
//!
//! Each flavor carries a subgroup table (main group, volume R, area Q) and a
//! main-group interaction table. UNIFAC interactions have only the `a` term;
//! Dortmund-modified UNIFAC adds the temperature-dependent `b` and `c` terms.

mod dortmund;
mod unifac;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group contribution model variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFlavor {
    Unifac,
    #[default]
    Dortmund,
}

impl ActivityFlavor {
    pub fn subgroup(self, id: u32) -> Option<&'static Subgroup> {
        let table = match self {
            ActivityFlavor::Unifac => unifac::SUBGROUPS,
            ActivityFlavor::Dortmund => dortmund::SUBGROUPS,
        };
        table.iter().find(|s| s.id == id)
    }

    /// Interaction parameters from main group `first` to main group `second`.
    ///
    /// Groups of the same main group never interact.
    pub fn interaction(self, first: u32, second: u32) -> Option<Interaction> {
        if first == second {
            return Some(Interaction::NONE);
        }
        match self {
            ActivityFlavor::Unifac => unifac::interaction(first, second),
            ActivityFlavor::Dortmund => dortmund::interaction(first, second),
        }
    }
}

impl fmt::Display for ActivityFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityFlavor::Unifac => write!(f, "UNIFAC"),
            ActivityFlavor::Dortmund => write!(f, "Dortmund"),
        }
    }
}

/// A functional subgroup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subgroup {
    pub id: u32,
    pub name: &'static str,
    pub main_group: u32,
    /// Relative van der Waals volume
    pub r: f64,
    /// Relative van der Waals surface area
    pub q: f64,
}

/// Main group interaction, `psi = exp(-a/T - b - c T)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Interaction {
    pub const NONE: Interaction = Interaction {
        a: 0.0,
        b: 0.0,
        c: 0.0,
    };

    pub const fn a(a: f64) -> Self {
        Self { a, b: 0.0, c: 0.0 }
    }

    pub const fn abc(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn psi(&self, t: f64) -> f64 {
        (-self.a / t - self.b - self.c * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_main_group_is_neutral() {
        for flavor in [ActivityFlavor::Unifac, ActivityFlavor::Dortmund] {
            let none = flavor.interaction(1, 1).unwrap();
            assert_eq!(none, Interaction::NONE);
            assert_eq!(none.psi(300.0), 1.0);
        }
    }

    #[test]
    fn interactions_are_directional() {
        let forward = ActivityFlavor::Unifac.interaction(1, 5).unwrap();
        let backward = ActivityFlavor::Unifac.interaction(5, 1).unwrap();
        assert_eq!(forward.a, 986.5);
        assert_eq!(backward.a, 156.4);
        assert!((forward.psi(300.0) - (-986.5_f64 / 300.0).exp()).abs() < 1e-15);
    }

    #[test]
    fn dortmund_psi_has_temperature_terms() {
        let ab = ActivityFlavor::Dortmund.interaction(1, 7).unwrap();
        let t = 350.0_f64;
        let expected = (-1391.3_f64 / t + 3.6156 - 0.001144 * t).exp();
        assert!((ab.psi(t) - expected).abs() < 1e-12);
    }

    #[test]
    fn subgroup_lookup() {
        let oh = ActivityFlavor::Dortmund.subgroup(14).unwrap();
        assert_eq!(oh.main_group, 5);
        assert_eq!(ActivityFlavor::Unifac.subgroup(16).unwrap().name, "H2O");
        assert!(ActivityFlavor::Dortmund.subgroup(9999).is_none());
    }

    #[test]
    fn flavor_serde_names() {
        let flavor: ActivityFlavor = serde_json::from_str("\"unifac\"").unwrap();
        assert_eq!(flavor, ActivityFlavor::Unifac);
        assert_eq!(ActivityFlavor::default(), ActivityFlavor::Dortmund);
    }
}
