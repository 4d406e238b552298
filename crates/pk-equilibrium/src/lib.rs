//! pk-equilibrium: vapor/liquid equilibrium of ideal-gas / nonideal-liquid
//! mixtures.
//!
//! Provides:
//! - Chemical records and a small built-in database
//! - UNIFAC and Dortmund-modified UNIFAC group decompositions with a shared cache
//! - Activity coefficients and their inversion (`solve_x`)
//! - Ideal vapor fugacity and Poynting models behind traits
//! - Bubble point (`solve_ty`, `solve_py`) and dew point (`solve_tx`,
//!   `solve_px`) solvers with warm starts
//! - `Thermo` contexts, YAML/JSON configuration and material streams
//!
//! # Example
//!
//! ```
//! use pk_equilibrium::Thermo;
//!
//! let thermo = Thermo::from_ids(&["Ethanol", "Water"]).unwrap();
//! let mut bubble = thermo.bubble_point().unwrap();
//! let (t, y) = bubble.solve_ty(&[0.6, 0.4], 101325.0).unwrap();
//! assert!((t - 352.3).abs() < 0.2);
//! assert!(y[0] > 0.6);
//! ```

pub mod activity;
pub mod bubble;
pub mod chemical;
pub mod config;
pub mod database;
pub mod decomposition;
pub mod dew;
pub mod error;
pub mod fugacity;
pub mod groups;
pub mod stream;
pub mod thermo;

mod validation;

pub use activity::{ActivityCoefficients, GroupActivityCoefficients, IdealActivityCoefficients};
pub use bubble::BubblePoint;
pub use chemical::{Chemical, ChemicalRecord, GroupCounts};
pub use config::{ConfigError, ThermoConfig, load_json, load_yaml, save_json, save_yaml};
pub use decomposition::{GroupCache, GroupDecomposition};
pub use dew::DewPoint;
pub use error::{EquilibriumError, EquilibriumResult};
pub use fugacity::{
    FugacityCoefficients, IdealFugacityCoefficients, IdealPoyntingCorrection, PoyntingCorrection,
};
pub use groups::ActivityFlavor;
pub use stream::{EquilibriumPoint, MultiStream, Phase, SingleStream, Stream, ThermalCondition};
pub use thermo::Thermo;
