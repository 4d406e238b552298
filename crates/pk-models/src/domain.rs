//! Valid temperature (and optional pressure) ranges of a correlation.

use crate::error::{ModelError, ModelResult};

/// Closed validity box `[t_min, t_max]` x `[p_min, p_max]`.
///
/// A domain without pressure bounds describes a temperature-only correlation and
/// accepts any pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    t_min: f64,
    t_max: f64,
    p_range: Option<(f64, f64)>,
}

fn check(what: &'static str, lower: f64, upper: f64) -> ModelResult<()> {
    // Infinite upper bounds are allowed; NaN and reversed bounds are not.
    if lower.is_nan() || upper.is_nan() || lower >= upper || lower == f64::INFINITY {
        return Err(ModelError::InvalidDomain { what, lower, upper });
    }
    Ok(())
}

impl Domain {
    /// Temperature-only domain.
    pub fn t(t_min: f64, t_max: f64) -> ModelResult<Self> {
        check("temperature", t_min, t_max)?;
        Ok(Self {
            t_min,
            t_max,
            p_range: None,
        })
    }

    /// Temperature and pressure domain.
    pub fn tp(t_min: f64, t_max: f64, p_min: f64, p_max: f64) -> ModelResult<Self> {
        check("temperature", t_min, t_max)?;
        check("pressure", p_min, p_max)?;
        Ok(Self {
            t_min,
            t_max,
            p_range: Some((p_min, p_max)),
        })
    }

    /// Domain accepting every positive temperature and any pressure.
    pub fn unbounded() -> Self {
        Self {
            t_min: 0.0,
            t_max: f64::INFINITY,
            p_range: None,
        }
    }

    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    pub fn p_min(&self) -> Option<f64> {
        self.p_range.map(|(lo, _)| lo)
    }

    pub fn p_max(&self) -> Option<f64> {
        self.p_range.map(|(_, hi)| hi)
    }

    pub fn p_range(&self) -> Option<(f64, f64)> {
        self.p_range
    }

    pub fn is_pressure_dependent(&self) -> bool {
        self.p_range.is_some()
    }

    pub fn contains_t(&self, t: f64) -> bool {
        self.t_min <= t && t <= self.t_max
    }

    /// Always true for temperature-only domains.
    pub fn contains_p(&self, p: f64) -> bool {
        match self.p_range {
            Some((lo, hi)) => lo <= p && p <= hi,
            None => true,
        }
    }

    pub fn indomain(&self, t: f64, p: f64) -> bool {
        self.contains_t(t) && self.contains_p(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_closed() {
        let d = Domain::t(100.0, 200.0).unwrap();
        assert!(d.contains_t(100.0));
        assert!(d.contains_t(200.0));
        assert!(!d.contains_t(99.999));
        assert!(!d.contains_t(200.001));
    }

    #[test]
    fn temperature_only_domain_accepts_any_pressure() {
        let d = Domain::t(100.0, 200.0).unwrap();
        assert!(d.indomain(150.0, 1e9));
        assert!(!d.is_pressure_dependent());
        assert_eq!(d.p_min(), None);
    }

    #[test]
    fn pressure_bounds_apply() {
        let d = Domain::tp(100.0, 200.0, 1e4, 1e6).unwrap();
        assert!(d.indomain(150.0, 1e5));
        assert!(!d.indomain(150.0, 1e7));
        assert_eq!(d.p_range(), Some((1e4, 1e6)));
    }

    #[test]
    fn reversed_or_degenerate_bounds_rejected() {
        assert!(Domain::t(200.0, 100.0).is_err());
        assert!(Domain::t(100.0, 100.0).is_err());
        assert!(Domain::t(f64::NAN, 100.0).is_err());
        assert!(Domain::tp(100.0, 200.0, 1e6, 1e4).is_err());
        assert!(Domain::t(0.0, f64::INFINITY).is_ok());
    }
}
