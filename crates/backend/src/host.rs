//! Interfaces to the host application: module registry and settings store.
//!
//! The document pipeline only reads through these; it never mutates the
//! module list or persists settings.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::module::ModuleDescriptor;

/// Setting holding the description text of every generated document.
pub const DESCRIPTION_SETTING: &str = "docs.description";
/// Setting holding the text shown by the host's export wizard.
pub const EXPORT_DESCRIPTION_SETTING: &str = "docs.export.description";

/// Enumerates installed modules in registration order.
pub trait ModuleRegistry: Send + Sync {
  fn modules(&self) -> Vec<ModuleDescriptor>;

  fn loaded_modules(&self) -> Vec<ModuleDescriptor> {
    self.modules().into_iter().filter(|m| m.is_loaded()).collect()
  }
}

/// Key-value settings lookup. A missing key is never an error.
pub trait SettingsStore: Send + Sync {
  fn get_value(&self, key: &str) -> Option<String>;

  fn get_or_default(&self, key: &str) -> String {
    self.get_value(key).unwrap_or_default()
  }
}

/// Registry over a fixed module list.
///
/// Modules can be replaced wholesale to model a host that loads or unloads
/// modules after startup.
#[derive(Debug, Default)]
pub struct StaticRegistry {
  modules: RwLock<Vec<ModuleDescriptor>>,
}

impl StaticRegistry {
  pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
    Self {
      modules: RwLock::new(modules),
    }
  }

  pub fn replace(&self, modules: Vec<ModuleDescriptor>) {
    match self.modules.write() {
      Ok(mut guard) => *guard = modules,
      Err(poisoned) => *poisoned.into_inner() = modules,
    }
  }
}

impl ModuleRegistry for StaticRegistry {
  fn modules(&self) -> Vec<ModuleDescriptor> {
    match self.modules.read() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }
}

/// In-memory settings, usually the `[settings]` table of the config file.
#[derive(Debug, Clone, Default)]
pub struct MapSettings {
  values: BTreeMap<String, String>,
}

impl MapSettings {
  pub fn new(values: BTreeMap<String, String>) -> Self {
    Self { values }
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.values.insert(key.into(), value.into());
    self
  }
}

impl SettingsStore for MapSettings {
  fn get_value(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }
}
