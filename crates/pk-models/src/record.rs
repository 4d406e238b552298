//! Serializable correlation definitions.
//!
//! Records are plain data for YAML/JSON data files. They become models through
//! [`ModelRecord::into_model`], which validates the domain.

use crate::correlation::{Antoine, Constant, Dippr101, Polynomial};
use crate::domain::Domain;
use crate::error::ModelResult;
use crate::handle::ModelHandle;
use crate::model::CorrelationModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CorrelationRecord {
    Constant {
        value: f64,
    },
    Polynomial {
        coeffs: Vec<f64>,
    },
    Antoine {
        a: f64,
        b: f64,
        c: f64,
        #[serde(default = "default_factor")]
        factor: f64,
    },
    Dippr101 {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
    },
}

fn default_factor() -> f64 {
    1.0
}

impl CorrelationRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            CorrelationRecord::Constant { .. } => "Constant",
            CorrelationRecord::Polynomial { .. } => "Polynomial",
            CorrelationRecord::Antoine { .. } => "Antoine",
            CorrelationRecord::Dippr101 { .. } => "Dippr101",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub t_min: f64,
    pub t_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<String>,
    pub correlation: CorrelationRecord,
}

impl ModelRecord {
    pub fn into_model(self) -> ModelResult<CorrelationModel> {
        let domain = match (self.p_min, self.p_max) {
            (None, None) => Domain::t(self.t_min, self.t_max)?,
            (p_min, p_max) => Domain::tp(
                self.t_min,
                self.t_max,
                p_min.unwrap_or(0.0),
                p_max.unwrap_or(f64::INFINITY),
            )?,
        };
        let name = self
            .name
            .unwrap_or_else(|| self.correlation.kind().to_string());
        let model = match self.correlation {
            CorrelationRecord::Constant { value } => {
                CorrelationModel::new(name, domain, Constant(value))
            }
            CorrelationRecord::Polynomial { coeffs } => {
                CorrelationModel::new(name, domain, Polynomial::new(coeffs))
            }
            CorrelationRecord::Antoine { a, b, c, factor } => {
                CorrelationModel::new(name, domain, Antoine::new(a, b, c).with_factor(factor))
            }
            CorrelationRecord::Dippr101 { a, b, c, d, e } => {
                CorrelationModel::new(name, domain, Dippr101::new(a, b, c, d, e))
            }
        };
        Ok(match self.var {
            Some(var) => model.with_var(var),
            None => model,
        })
    }
}

/// Build a handle from records, preserving their order.
pub fn handle_from_records(
    name: impl Into<String>,
    records: impl IntoIterator<Item = ModelRecord>,
) -> ModelResult<ModelHandle> {
    let models = records
        .into_iter()
        .map(ModelRecord::into_model)
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(ModelHandle::with_models(name, models))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn antoine_record_defaults_factor() {
        let json = r#"{"t_min": 344.0, "t_max": 373.0,
            "correlation": {"type": "Antoine", "a": 5.08354, "b": 1663.125, "c": -45.622}}"#;
        let record: ModelRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.correlation,
            CorrelationRecord::Antoine {
                a: 5.08354,
                b: 1663.125,
                c: -45.622,
                factor: 1.0
            }
        );
        let model = record.into_model().unwrap();
        assert_eq!(model.name(), "Antoine");
        assert!(model.domain().p_range().is_none());
    }

    #[test]
    fn partial_pressure_bounds_open_up() {
        let record = ModelRecord {
            name: Some("V".into()),
            t_min: 200.0,
            t_max: 400.0,
            p_min: Some(1e5),
            p_max: None,
            var: Some("V".into()),
            correlation: CorrelationRecord::Constant { value: 1e-3 },
        };
        let model = record.into_model().unwrap();
        assert_eq!(model.domain().p_range(), Some((1e5, f64::INFINITY)));
        assert_eq!(model.var(), Some("V"));
    }

    #[test]
    fn invalid_domain_is_rejected() {
        let record = ModelRecord {
            name: None,
            t_min: 400.0,
            t_max: 300.0,
            p_min: None,
            p_max: None,
            var: None,
            correlation: CorrelationRecord::Polynomial { coeffs: vec![1.0] },
        };
        assert!(matches!(
            record.into_model(),
            Err(ModelError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn handle_keeps_record_order() {
        let records = vec![
            ModelRecord {
                name: Some("first".into()),
                t_min: 0.0,
                t_max: 100.0,
                p_min: None,
                p_max: None,
                var: None,
                correlation: CorrelationRecord::Constant { value: 1.0 },
            },
            ModelRecord {
                name: Some("second".into()),
                t_min: 0.0,
                t_max: 200.0,
                p_min: None,
                p_max: None,
                var: None,
                correlation: CorrelationRecord::Constant { value: 2.0 },
            },
        ];
        let handle = handle_from_records("X.Cp", records).unwrap();
        assert_eq!(handle.evaluate(50.0, 0.0).unwrap(), 1.0);
        assert_eq!(handle.evaluate(150.0, 0.0).unwrap(), 2.0);
    }
}
