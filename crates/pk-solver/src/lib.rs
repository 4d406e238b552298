//! Iterative numerical solvers for phase equilibrium.
//!
//! Two building blocks are provided: a scalar Aitken-accelerated secant root
//! finder (bubble and dew point temperatures and pressures) and a vector
//! Aitken-accelerated fixed-point iteration (activity coefficient inversion).
//! Both are generic over the caller's error type so that model errors raised
//! inside the iterated function pass through unchanged.

pub mod error;
pub mod fixed_point;
pub mod options;
pub mod secant;

pub use error::{SolverError, SolverResult};
pub use fixed_point::{FixedPointConfig, FixedPointResult, aitken_fixed_point};
pub use options::SolverOptions;
pub use secant::{SecantConfig, SecantResult, aitken_secant};
