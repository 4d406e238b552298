//! Dortmund-modified UNIFAC parameters.

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
    sg(1, "CH3", 1, 0.6325, 1.0608),
    sg(2, "CH2", 1, 0.6325, 0.7081),
    sg(3, "CH", 1, 0.6325, 0.3554),
    sg(4, "C", 1, 0.6325, 0.0000),
    sg(14, "OH(P)", 5, 1.2302, 0.8927),
    sg(16, "H2O", 7, 1.7334, 2.4561),
];

/// (from, to, a [K], b, c [1/K])
const INTERACTIONS: &[(u32, u32, f64, f64, f64)] = &[
    (1, 5, 2777.0, -4.674, 0.001551),
    (5, 1, 1606.0, -4.746, 0.0009181),
    (1, 7, 1391.3, -3.6156, 0.001144),
    (7, 1, -17.253, 0.8389, 0.0009021),
    (5, 7, -801.9, 3.824, -0.007514),
    (7, 5, 1460.0, -8.673, 0.01641),
];

pub(super) fn interaction(first: u32, second: u32) -> Option<Interaction> {
    INTERACTIONS
        .iter()
        .find(|(i, j, ..)| *i == first && *j == second)
        .map(|&(_, _, a, b, c)| Interaction::abc(a, b, c))
}
