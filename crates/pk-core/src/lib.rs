//! pk-core: shared foundation for phasekit.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float checks + normalization)
//! - memo (single-entry memoization of the last call)
//! - error (shared error types)

pub mod error;
pub mod memo;
pub mod numeric;
pub mod units;

pub use error::{PkError, PkResult};
pub use memo::LastCall;
pub use numeric::*;
pub use units::*;
