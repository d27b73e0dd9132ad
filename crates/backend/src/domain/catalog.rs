//! Module catalog manifests.
//!
//! A catalog is a TOML snapshot of what a host reports at runtime: the
//! installed modules and the endpoints its discovery pipeline found. Code
//! units are referenced by name in the file and get one identity per
//! distinct name when the catalog is resolved.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{
  config::ConfigError,
  module::{CodeUnit, ModuleDescriptor, ModuleState},
  operation::{ApiDescription, Method, ParameterDescriptor},
};

#[derive(Debug, Deserialize)]
struct RawCatalog {
  #[serde(default)]
  modules: Vec<RawModule>,
  #[serde(default)]
  endpoints: Vec<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
  name: String,
  #[serde(default)]
  title: Option<String>,
  #[serde(default)]
  description: String,
  unit: String,
  #[serde(default)]
  state: ModuleState,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
  method: Method,
  path: String,
  action: String,
  unit: String,
  #[serde(default)]
  parameters: Vec<ParameterDescriptor>,
}

/// Resolved catalog: modules in registry order plus every discovered endpoint.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  pub modules: Vec<ModuleDescriptor>,
  pub endpoints: Vec<ApiDescription>,
}

impl Catalog {
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let raw: RawCatalog = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Self::resolve(raw)
  }

  pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
    let raw: RawCatalog = toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    Self::resolve(raw)
  }

  fn resolve(raw: RawCatalog) -> Result<Self, ConfigError> {
    let mut units: HashMap<String, CodeUnit> = HashMap::new();
    let mut unit_for = |name: &str| {
      units
        .entry(name.to_string())
        .or_insert_with(|| CodeUnit::new(name))
        .clone()
    };

    let mut modules = Vec::with_capacity(raw.modules.len());
    for module in raw.modules {
      if module.name.is_empty() {
        return Err(ConfigError::Invalid("module with empty name".to_string()));
      }
      if modules.iter().any(|m: &ModuleDescriptor| m.name == module.name) {
        return Err(ConfigError::Invalid(format!("duplicate module '{}'", module.name)));
      }
      modules.push(ModuleDescriptor {
        title: module.title.unwrap_or_else(|| module.name.clone()),
        name: module.name,
        description: module.description,
        unit: unit_for(&module.unit),
        state: module.state,
      });
    }

    let endpoints = raw
      .endpoints
      .into_iter()
      .map(|e| ApiDescription {
        method: e.method,
        path: e.path,
        action: e.action,
        unit: unit_for(&e.unit),
        parameters: e.parameters,
      })
      .collect();

    Ok(Self { modules, endpoints })
  }
}
