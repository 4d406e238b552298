//! YAML/JSON configuration of a thermodynamic context.

use crate::chemical::ChemicalRecord;
use crate::database;
use crate::error::EquilibriumResult;
use crate::groups::ActivityFlavor;
use crate::thermo::Thermo;
use pk_solver::SolverOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Chemicals, activity flavor and solver settings of a [`Thermo`].
///
/// Chemicals are resolved against `records` first, then the built-in database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermoConfig {
    pub chemicals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<ChemicalRecord>,
    #[serde(default)]
    pub flavor: ActivityFlavor,
    #[serde(default)]
    pub solver: SolverOptions,
}

impl ThermoConfig {
    pub fn new<S: Into<String>>(chemicals: impl IntoIterator<Item = S>) -> Self {
        Self {
            chemicals: chemicals.into_iter().map(Into::into).collect(),
            records: Vec::new(),
            flavor: ActivityFlavor::default(),
            solver: SolverOptions::default(),
        }
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build the context described by this configuration.
    pub fn build(&self) -> EquilibriumResult<Thermo> {
        let chemicals = self
            .chemicals
            .iter()
            .map(|id| match self.records.iter().find(|r| &r.id == id) {
                Some(record) => record.clone().into_chemical(),
                None => database::builtin(id),
            })
            .collect::<EquilibriumResult<Vec<_>>>()?;
        tracing::debug!(chemicals = ?self.chemicals, flavor = %self.flavor, "building thermo");
        Ok(Thermo::new(chemicals)?
            .with_flavor(self.flavor)
            .with_options(self.solver))
    }
}

pub fn load_yaml(path: &Path) -> ConfigResult<ThermoConfig> {
    let content = std::fs::read_to_string(path)?;
    ThermoConfig::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &ThermoConfig) -> ConfigResult<()> {
    std::fs::write(path, config.to_yaml_string()?)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ConfigResult<ThermoConfig> {
    let content = std::fs::read_to_string(path)?;
    ThermoConfig::from_json_str(&content)
}

pub fn save_json(path: &Path, config: &ThermoConfig) -> ConfigResult<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
