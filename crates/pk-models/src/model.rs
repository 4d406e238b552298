//! A correlation bound to its domain.

use crate::correlation::{Constant, Correlation};
use crate::domain::Domain;
use std::fmt;
use std::sync::Arc;

/// A named, domain-bounded correlation for one property.
///
/// Cloning is cheap: the correlation itself is shared.
#[derive(Clone)]
pub struct CorrelationModel {
    name: String,
    var: Option<String>,
    domain: Domain,
    function: Arc<dyn Correlation>,
    locked: bool,
}

impl CorrelationModel {
    pub fn new<C>(name: impl Into<String>, domain: Domain, function: C) -> Self
    where
        C: Correlation + 'static,
    {
        Self {
            name: name.into(),
            var: None,
            domain,
            function: Arc::new(function),
            locked: false,
        }
    }

    /// Wrap an already shared correlation.
    pub fn from_shared(name: impl Into<String>, domain: Domain, function: Arc<dyn Correlation>) -> Self {
        Self {
            name: name.into(),
            var: None,
            domain,
            function,
            locked: false,
        }
    }

    /// Constant value over `domain`.
    pub fn constant(value: f64, domain: Domain) -> Self {
        Self::new("Constant", domain, Constant(value))
    }

    /// Constant produced by locking a handle at a fixed state.
    pub(crate) fn locked(value: f64, domain: Domain) -> Self {
        let mut model = Self::constant(value, domain);
        model.locked = true;
        model
    }

    /// Tag the property variable this model computes (e.g. `"Psat"`).
    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = Some(var.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var(&self) -> Option<&str> {
        self.var.as_deref()
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn t_min(&self) -> f64 {
        self.domain.t_min()
    }

    pub fn t_max(&self) -> f64 {
        self.domain.t_max()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn constant_value(&self) -> Option<f64> {
        self.function.constant_value()
    }

    pub fn indomain(&self, t: f64, p: f64) -> bool {
        self.domain.indomain(t, p)
    }

    pub fn evaluate(&self, t: f64, p: f64) -> f64 {
        self.function.evaluate(t, p)
    }

    pub fn differentiate_by_t(&self, t: f64, p: f64) -> f64 {
        self.function.differentiate_by_t(t, p)
    }

    pub fn differentiate_by_p(&self, t: f64, p: f64) -> f64 {
        self.function.differentiate_by_p(t, p)
    }

    pub fn integrate_by_t(&self, ta: f64, tb: f64, p: f64) -> Option<f64> {
        self.function.integrate_by_t(ta, tb, p)
    }

    pub fn integrate_by_t_over_t(&self, ta: f64, tb: f64, p: f64) -> Option<f64> {
        self.function.integrate_by_t_over_t(ta, tb, p)
    }

    pub fn integrate_by_p(&self, pa: f64, pb: f64, t: f64) -> Option<f64> {
        self.function.integrate_by_p(pa, pb, t)
    }
}

impl fmt::Debug for CorrelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationModel")
            .field("name", &self.name)
            .field("var", &self.var)
            .field("domain", &self.domain)
            .field("function", &self.function)
            .field("locked", &self.locked)
            .finish()
    }
}

impl fmt::Display for CorrelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (T={:.2}-{:.2} K",
            self.name,
            self.domain.t_min(),
            self.domain.t_max()
        )?;
        if let Some((lo, hi)) = self.domain.p_range() {
            write!(f, ", P={lo:.5e}-{hi:.5e} Pa")?;
        }
        write!(f, ")")
    }
}
