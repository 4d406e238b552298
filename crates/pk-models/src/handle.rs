//! Ordered collections of correlation models for one property.
//!
//! Dispatch picks the first model (in insertion order) whose domain contains the
//! query point, so overlapping domains are resolved by order. Integrals over a
//! range are assembled piecewise from adjacent models.

use crate::domain::Domain;
use crate::error::{ModelError, ModelResult};
use crate::model::CorrelationModel;
use std::fmt;

/// Which variable a piecewise integration runs over.
#[derive(Clone, Copy)]
enum Axis {
    Temperature,
    Pressure,
}

impl Axis {
    fn symbol(self) -> &'static str {
        match self {
            Axis::Temperature => "T",
            Axis::Pressure => "P",
        }
    }
}

/// Ordered set of correlation models for one (chemical, property) pair.
#[derive(Debug, Clone, Default)]
pub struct ModelHandle {
    name: String,
    models: Vec<CorrelationModel>,
}

impl ModelHandle {
    /// Create an empty handle. The name shows up in domain errors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
        }
    }

    pub fn with_models(name: impl Into<String>, models: Vec<CorrelationModel>) -> Self {
        Self {
            name: name.into(),
            models,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property variable of the first tagged model.
    pub fn var(&self) -> Option<&str> {
        self.models.iter().find_map(|m| m.var())
    }

    pub fn models(&self) -> &[CorrelationModel] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CorrelationModel> {
        self.models.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorrelationModel> {
        self.models.iter()
    }

    /// Append a model; it is consulted after every existing model.
    pub fn model(&mut self, model: CorrelationModel) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Insert a model in front; it takes priority over every existing model.
    pub fn model_first(&mut self, model: CorrelationModel) -> &mut Self {
        self.models.insert(0, model);
        self
    }

    /// Replace the model at `index`.
    pub fn set(&mut self, index: usize, model: CorrelationModel) -> ModelResult<()> {
        let len = self.models.len();
        match self.models.get_mut(index) {
            Some(slot) => {
                *slot = model;
                Ok(())
            }
            None => Err(self.index_error(index, len)),
        }
    }

    /// Remove and return the model at `index`.
    pub fn remove(&mut self, index: usize) -> ModelResult<CorrelationModel> {
        let len = self.models.len();
        if index >= len {
            return Err(self.index_error(index, len));
        }
        Ok(self.models.remove(index))
    }

    fn index_error(&self, index: usize, len: usize) -> ModelError {
        ModelError::IndexOutOfBounds {
            handle: self.name.clone(),
            index,
            len,
        }
    }

    /// Lowest temperature covered by any model.
    pub fn t_min(&self) -> Option<f64> {
        self.models.iter().map(|m| m.t_min()).reduce(f64::min)
    }

    /// Highest temperature covered by any model.
    pub fn t_max(&self) -> Option<f64> {
        self.models.iter().map(|m| m.t_max()).reduce(f64::max)
    }

    /// Lowest pressure over pressure-bounded models.
    pub fn p_min(&self) -> Option<f64> {
        self.models
            .iter()
            .filter_map(|m| m.domain().p_min())
            .reduce(f64::min)
    }

    /// Highest pressure over pressure-bounded models.
    pub fn p_max(&self) -> Option<f64> {
        self.models
            .iter()
            .filter_map(|m| m.domain().p_max())
            .reduce(f64::max)
    }

    pub fn is_pressure_dependent(&self) -> bool {
        self.models.iter().any(|m| m.domain().is_pressure_dependent())
    }

    /// First model valid at (T, P).
    pub fn find(&self, t: f64, p: f64) -> ModelResult<&CorrelationModel> {
        self.models
            .iter()
            .find(|m| m.indomain(t, p))
            .ok_or_else(|| ModelError::OutOfDomain {
                handle: self.name.clone(),
                t,
                p,
            })
    }

    pub fn evaluate(&self, t: f64, p: f64) -> ModelResult<f64> {
        Ok(self.find(t, p)?.evaluate(t, p))
    }

    pub fn differentiate_by_t(&self, t: f64, p: f64) -> ModelResult<f64> {
        Ok(self.find(t, p)?.differentiate_by_t(t, p))
    }

    pub fn differentiate_by_p(&self, t: f64, p: f64) -> ModelResult<f64> {
        Ok(self.find(t, p)?.differentiate_by_p(t, p))
    }

    /// Integral of the property dT from `ta` to `tb` at pressure `p`.
    pub fn integrate_by_t(&self, ta: f64, tb: f64, p: f64) -> ModelResult<f64> {
        self.piecewise(
            Axis::Temperature,
            ta,
            tb,
            |m| m.domain().contains_p(p).then(|| (m.t_min(), m.t_max())),
            |m, a, b| m.integrate_by_t(a, b, p),
        )
    }

    /// Integral of property/T dT from `ta` to `tb` at pressure `p`.
    pub fn integrate_by_t_over_t(&self, ta: f64, tb: f64, p: f64) -> ModelResult<f64> {
        self.piecewise(
            Axis::Temperature,
            ta,
            tb,
            |m| m.domain().contains_p(p).then(|| (m.t_min(), m.t_max())),
            |m, a, b| m.integrate_by_t_over_t(a, b, p),
        )
    }

    /// Integral of the property dP from `pa` to `pb` at temperature `t`.
    ///
    /// A handle without pressure-bounded models treats the property as
    /// pressure-independent: `(pb - pa) * value(t)`.
    pub fn integrate_by_p(&self, pa: f64, pb: f64, t: f64) -> ModelResult<f64> {
        if !self.is_pressure_dependent() {
            return Ok((pb - pa) * self.evaluate(t, pa)?);
        }
        self.piecewise(
            Axis::Pressure,
            pa,
            pb,
            |m| {
                let domain = m.domain();
                match domain.p_range() {
                    Some(range) if domain.contains_t(t) => Some(range),
                    _ => None,
                }
            },
            |m, a, b| m.integrate_by_p(a, b, t),
        )
    }

    /// Scan models in order, accumulating partial integrals over `[lower, upper]`.
    ///
    /// `bounds` yields a model's range along the axis, or `None` when the model is
    /// not applicable at the fixed other variable. `integrate` yields `None` for
    /// models that cannot integrate. The scan ends at the first model covering
    /// what is left of the range; running out of models is an error.
    fn piecewise<B, I>(
        &self,
        axis: Axis,
        lower: f64,
        upper: f64,
        bounds: B,
        integrate: I,
    ) -> ModelResult<f64>
    where
        B: Fn(&CorrelationModel) -> Option<(f64, f64)>,
        I: Fn(&CorrelationModel, f64, f64) -> Option<f64>,
    {
        if lower == upper {
            return Ok(0.0);
        }
        if lower > upper {
            return self
                .piecewise(axis, upper, lower, bounds, integrate)
                .map(|v| -v);
        }

        let (mut a, mut b) = (lower, upper);
        let mut integral = 0.0;
        for model in &self.models {
            let Some((lo, hi)) = bounds(model) else {
                continue;
            };
            if a >= lo {
                if b <= hi {
                    if let Some(part) = integrate(model, a, b) {
                        return Ok(integral + part);
                    }
                } else if a < hi {
                    if let Some(part) = integrate(model, a, hi) {
                        integral += part;
                        a = hi;
                    }
                }
            } else if b <= hi && lo < b {
                if let Some(part) = integrate(model, lo, b) {
                    integral += part;
                    b = lo;
                }
            }
        }
        Err(ModelError::NoCoverage {
            handle: self.name.clone(),
            variable: axis.symbol(),
            lower,
            upper,
        })
    }

    /// Freeze the property at (T, P).
    ///
    /// Reuses a constant model already valid at the point, or evaluates the handle
    /// and stores the value as a constant spanning the handle's whole range. The
    /// constant moves to the front, so later evaluations return it directly until
    /// [`unlock`](Self::unlock) is called.
    pub fn lock_tp(&mut self, t: f64, p: f64) -> ModelResult<f64> {
        let existing = self
            .models
            .iter()
            .position(|m| m.constant_value().is_some() && m.indomain(t, p));
        if let Some(index) = existing {
            let model = self.models.remove(index);
            let value = model.constant_value().unwrap_or_else(|| model.evaluate(t, p));
            self.models.insert(0, model);
            return Ok(value);
        }

        let value = self.evaluate(t, p)?;
        let domain = self.extent()?;
        tracing::debug!(handle = %self.name, t, p, value, "locking model handle");
        self.models.insert(0, CorrelationModel::locked(value, domain));
        Ok(value)
    }

    /// Drop every constant produced by [`lock_tp`](Self::lock_tp).
    pub fn unlock(&mut self) {
        self.models.retain(|m| !m.is_locked());
    }

    pub fn is_locked(&self) -> bool {
        self.models.first().is_some_and(|m| m.is_locked())
    }

    /// Bounding domain of all models. Pressure stays unbounded unless every
    /// model bounds it.
    fn extent(&self) -> ModelResult<Domain> {
        let (Some(t_min), Some(t_max)) = (self.t_min(), self.t_max()) else {
            return Err(ModelError::Empty {
                handle: self.name.clone(),
            });
        };
        if !self.models.iter().all(|m| m.domain().is_pressure_dependent()) {
            return Domain::t(t_min, t_max);
        }
        match (self.p_min(), self.p_max()) {
            (Some(p_min), Some(p_max)) => Domain::tp(t_min, t_max, p_min, p_max),
            _ => Domain::t(t_min, t_max),
        }
    }
}

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ModelHandle({})", self.name)?;
        if self.models.is_empty() {
            return write!(f, "(no models available)");
        }
        for (i, model) in self.models.iter().enumerate() {
            writeln!(f, "[{i}] {model}")?;
        }
        Ok(())
    }
}
