//! Built-in chemical data.
//!
//! Vapor pressures use a narrow-range Antoine fit (NIST, bar) first and a
//! wide-range DIPPR-101 fit (Pa) as fallback, so the Antoine model wins where
//! both apply.

use crate::chemical::{Chemical, GroupCounts};
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::groups::ActivityFlavor;
use pk_models::{Antoine, CorrelationModel, Dippr101, Domain, ModelHandle, ModelResult};

struct Entry {
    id: &'static str,
    mw: f64,
    tb: f64,
    /// (t_min, t_max, a, b, c)
    antoine: (f64, f64, f64, f64, f64),
    /// (t_min, t_max, a, b, c, d, e)
    dippr: (f64, f64, f64, f64, f64, f64, f64),
    /// UNIFAC and Dortmund share subgroup ids for these chemicals.
    groups: &'static [(u32, u32)],
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "Ethanol",
        mw: 46.06844,
        tb: 351.44,
        antoine: (292.77, 366.63, 5.24677, 1598.673, -46.424),
        dippr: (159.05, 514.0, 74.475, -7164.3, -7.327, 3.134e-6, 2.0),
        groups: &[(1, 1), (2, 1), (14, 1)],
    },
    Entry {
        id: "Water",
        mw: 18.01528,
        tb: 373.124,
        antoine: (344.0, 373.0, 5.08354, 1663.125, -45.622),
        dippr: (273.16, 647.1, 73.649, -7258.2, -7.3037, 4.1653e-6, 2.0),
        groups: &[(16, 1)],
    },
    Entry {
        id: "1-Propanol",
        mw: 60.09502,
        tb: 370.35,
        antoine: (329.92, 370.93, 4.87601, 1441.629, -74.299),
        dippr: (146.95, 536.8, 84.664, -8307.2, -8.5767, 7.5091e-18, 6.0),
        groups: &[(1, 1), (2, 2), (14, 1)],
    },
    Entry {
        id: "1-Butanol",
        mw: 74.1216,
        tb: 390.81,
        antoine: (296.1, 390.6, 4.54607, 1351.555, -93.34),
        dippr: (183.85, 563.05, 106.29, -9866.4, -11.655, 1.0832e-17, 6.0),
        groups: &[(1, 1), (2, 3), (14, 1)],
    },
    Entry {
        id: "n-Hexane",
        mw: 86.17536,
        tb: 341.88,
        antoine: (286.18, 342.69, 4.00266, 1171.53, -48.784),
        dippr: (177.83, 507.6, 104.65, -6995.5, -12.702, 1.2381e-5, 2.0),
        groups: &[(1, 2), (2, 4)],
    },
    Entry {
        id: "n-Heptane",
        mw: 100.20194,
        tb: 371.58,
        antoine: (299.07, 372.43, 4.02832, 1268.636, -56.199),
        dippr: (182.57, 540.2, 87.829, -6996.4, -9.8802, 7.2099e-6, 2.0),
        groups: &[(1, 2), (2, 5)],
    },
];

/// Identifiers of every built-in chemical.
pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|e| e.id)
}

/// Look up a built-in chemical by identifier (case-insensitive).
pub fn builtin(id: &str) -> EquilibriumResult<Chemical> {
    let entry = ENTRIES
        .iter()
        .find(|e| e.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| EquilibriumError::UnknownChemical { id: id.to_string() })?;
    build(entry)
}

fn psat_handle(entry: &Entry) -> ModelResult<ModelHandle> {
    let (t_min, t_max, a, b, c) = entry.antoine;
    let (d_min, d_max, da, db, dc, dd, de) = entry.dippr;
    let mut handle = ModelHandle::new(format!("{}.Psat", entry.id));
    handle
        .model(
            CorrelationModel::new(
                "Antoine",
                Domain::t(t_min, t_max)?,
                Antoine::new(a, b, c).with_factor(1e5),
            )
            .with_var("Psat"),
        )
        .model(
            CorrelationModel::new(
                "DIPPR101",
                Domain::t(d_min, d_max)?,
                Dippr101::new(da, db, dc, dd, de),
            )
            .with_var("Psat"),
        );
    Ok(handle)
}

fn build(entry: &Entry) -> EquilibriumResult<Chemical> {
    let groups: GroupCounts = entry.groups.iter().copied().collect();
    Ok(Chemical::new(entry.id, entry.mw, entry.tb, psat_handle(entry)?)?
        .with_groups(ActivityFlavor::Unifac, groups.clone())
        .with_groups(ActivityFlavor::Dortmund, groups))
}
