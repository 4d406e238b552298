//! Ethanol/water vapor-liquid equilibrium at atmospheric pressure.

use pk_equilibrium::{ActivityFlavor, EquilibriumError, Thermo};
use pk_solver::SolverOptions;

const P_ATM: f64 = 101_325.0;

fn thermo() -> Thermo {
    Thermo::from_ids(&["Ethanol", "Water"]).unwrap()
}

#[test]
fn bubble_point_regression() {
    let thermo = thermo();
    let mut bubble = thermo.bubble_point().unwrap();

    let (t, y) = bubble.solve_ty(&[0.6, 0.4], P_ATM).unwrap();
    println!("T_bubble = {t:.4} K, y = {y:?}");
    assert!((t - 352.28).abs() < 0.1);
    assert!((y[0] - 0.703).abs() < 0.005);
    assert!((y[1] - 0.297).abs() < 0.005);
    assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-12);

    let (p, y) = bubble.solve_py(&[0.703, 0.297], 352.28).unwrap();
    println!("P_bubble = {p:.1} Pa, y = {y:?}");
    assert!((p - 103_494.0).abs() / 103_494.0 < 0.005);
    assert!((y[0] - 0.757).abs() < 0.005);
    assert!((y[1] - 0.243).abs() < 0.005);
}

#[test]
fn dew_of_bubble_vapor_recovers_liquid_at_fixed_p() {
    let thermo = thermo();
    let mut bubble = thermo.bubble_point().unwrap();
    let mut dew = thermo.dew_point().unwrap();

    for x0 in [0.05, 0.3, 0.6] {
        let x = [x0, 1.0 - x0];
        let (t_bubble, y) = bubble.solve_ty(&x, P_ATM).unwrap();
        let (t_dew, x_dew) = dew.solve_tx(&y, P_ATM).unwrap();
        println!("x = {x0}: T_bubble = {t_bubble:.4}, T_dew = {t_dew:.4}, x_dew = {x_dew:?}");
        assert!((t_bubble - t_dew).abs() < 1e-3);
        assert!((x_dew[0] - x[0]).abs() < 1e-4);
    }
}

#[test]
fn dew_of_bubble_vapor_recovers_liquid_at_fixed_t() {
    let thermo = thermo();
    let mut bubble = thermo.bubble_point().unwrap();
    let mut dew = thermo.dew_point().unwrap();

    let x = [0.4, 0.6];
    let (p_bubble, y) = bubble.solve_py(&x, 350.0).unwrap();
    let (p_dew, x_dew) = dew.solve_px(&y, 350.0).unwrap();
    assert!((p_bubble - p_dew).abs() / p_bubble < 1e-5);
    assert!((x_dew[0] - x[0]).abs() < 1e-4);
}

#[test]
fn bubble_temperature_falls_with_ethanol() {
    let thermo = thermo();
    let mut bubble = thermo.bubble_point().unwrap();
    let mut last = f64::INFINITY;
    for x0 in [0.02, 0.1, 0.3, 0.5, 0.7] {
        let (t, y) = bubble.solve_ty(&[x0, 1.0 - x0], P_ATM).unwrap();
        assert!(t < last, "bubble T not decreasing at x = {x0}");
        assert!(y[0] > x0, "ethanol not enriched in vapor at x = {x0}");
        last = t;
    }
}

#[test]
fn pure_components_boil_at_their_normal_boiling_points() {
    let thermo = thermo();
    let mut bubble = thermo.bubble_point().unwrap();
    let (t, y) = bubble.solve_ty(&[0.0, 1.0], P_ATM).unwrap();
    assert!((t - 373.15).abs() < 0.2);
    assert_eq!(y[0], 0.0);
    let (t, _) = bubble.solve_ty(&[1.0, 0.0], P_ATM).unwrap();
    assert!((t - 351.44).abs() < 0.2);
}

#[test]
fn unifac_and_dortmund_agree_roughly() {
    let dortmund = thermo();
    let unifac = thermo().with_flavor(ActivityFlavor::Unifac);
    let (t_d, _) = dortmund.bubble_point().unwrap().solve_ty(&[0.3, 0.7], P_ATM).unwrap();
    let (t_u, _) = unifac.bubble_point().unwrap().solve_ty(&[0.3, 0.7], P_ATM).unwrap();
    assert!((t_d - t_u).abs() < 1.0, "Dortmund {t_d}, UNIFAC {t_u}");
}

#[test]
fn exhausted_budget_reports_the_operation() {
    let options = SolverOptions::default().with_max_secant_iterations(1);
    let thermo = thermo().with_options(options);
    let mut dew = thermo.dew_point().unwrap();
    let err = dew.solve_tx(&[0.5, 0.5], P_ATM).unwrap_err();
    assert!(err.is_convergence());
    assert!(matches!(
        err,
        EquilibriumError::Convergence {
            operation: "dew point temperature",
            ..
        }
    ));
    assert_eq!(dew.t(), None);
}
