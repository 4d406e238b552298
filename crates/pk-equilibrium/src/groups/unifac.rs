//! Original UNIFAC parameters (VLE revision).

use super::{Interaction, Subgroup};

const fn sg(id: u32, name: &'static str, main_group: u32, r: f64, q: f64) -> Subgroup {
    Subgroup {
        id,
        name,
        main_group,
        r,
        q,
    }
}

pub(super) const SUBGROUPS: &[Subgroup] = &[
    // CH2
    sg(1, "CH3", 1, 0.9011, 0.848),
    sg(2, "CH2", 1, 0.6744, 0.540),
    sg(3, "CH", 1, 0.4469, 0.228),
    sg(4, "C", 1, 0.2195, 0.000),
    // ACH
    sg(9, "ACH", 3, 0.5313, 0.400),
    sg(10, "AC", 3, 0.3652, 0.120),
    // OH
    sg(14, "OH", 5, 1.0000, 1.200),
    // CH3OH
    sg(15, "CH3OH", 6, 1.4311, 1.432),
    // H2O
    sg(16, "H2O", 7, 0.9200, 1.400),
    // CH2CO
    sg(18, "CH3CO", 9, 1.6724, 1.488),
    sg(19, "CH2CO", 9, 1.4457, 1.180),
];

/// `a` parameters [K] as (from, to, a).
const INTERACTIONS: &[(u32, u32, f64)] = &[
    (1, 3, 61.13),
    (3, 1, -11.12),
    (1, 5, 986.5),
    (5, 1, 156.4),
    (1, 6, 697.2),
    (6, 1, 16.51),
    (1, 7, 1318.0),
    (7, 1, 300.0),
    (1, 9, 476.4),
    (9, 1, 26.76),
    (3, 5, 636.1),
    (5, 3, 89.6),
    (3, 6, 637.3),
    (6, 3, -50.0),
    (3, 7, 903.8),
    (7, 3, 362.3),
    (3, 9, 25.77),
    (9, 3, 140.1),
    (5, 6, -137.1),
    (6, 5, 249.1),
    (5, 7, 353.5),
    (7, 5, -229.1),
    (5, 9, 84.0),
    (9, 5, 164.5),
    (6, 7, -181.0),
    (7, 6, 289.6),
    (7, 9, -195.4),
    (9, 7, 472.5),
];

pub(super) fn interaction(first: u32, second: u32) -> Option<Interaction> {
    INTERACTIONS
        .iter()
        .find(|(i, j, _)| *i == first && *j == second)
        .map(|&(_, _, a)| Interaction::a(a))
}
