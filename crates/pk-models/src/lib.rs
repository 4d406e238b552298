//! pk-models: temperature/pressure dependent property correlations.
//!
//! Provides:
//! - Domain-bounded correlation functions (constant, polynomial, Antoine,
//!   DIPPR-101, caller-supplied closures)
//! - `CorrelationModel`: a named correlation with its valid domain
//! - `ModelHandle`: an ordered set of models for one property with first-match
//!   dispatch, piecewise integration across adjacent domains and locking
//! - Serializable correlation records for loading data files
//!
//! # Example
//!
//! ```
//! use pk_models::{Antoine, CorrelationModel, Domain, ModelHandle};
//!
//! let mut psat = ModelHandle::new("Water.Psat");
//! psat.model(CorrelationModel::new(
//!     "Antoine",
//!     Domain::t(344.0, 373.0).unwrap(),
//!     Antoine::new(5.08354, 1663.125, -45.622).with_factor(1e5),
//! ));
//! let p = psat.evaluate(350.0, 101325.0).unwrap();
//! assert!(p > 40_000.0 && p < 43_000.0);
//! ```

pub mod correlation;
pub mod domain;
pub mod error;
pub mod handle;
pub mod model;
pub mod record;

pub use correlation::{Antoine, Constant, Correlation, Custom, Dippr101, Polynomial};
pub use domain::Domain;
pub use error::{ModelError, ModelResult};
pub use handle::ModelHandle;
pub use model::CorrelationModel;
pub use record::{CorrelationRecord, ModelRecord, handle_from_records};
