use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a compiled code unit.
///
/// Two units are the same only if their ids are equal. Names are for display
/// and for the platform-core check, never for ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(Uuid);

impl UnitId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn from_uuid(id: Uuid) -> Self {
    Self(id)
  }

  pub fn as_uuid(&self) -> &Uuid {
    &self.0
  }
}

impl Default for UnitId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for UnitId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A loaded code unit that owns endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeUnit {
  pub id: UnitId,
  pub name: String,
}

impl CodeUnit {
  /// Mint a unit with a fresh identity.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: UnitId::new(),
      name: name.into(),
    }
  }

  pub fn with_id(id: UnitId, name: impl Into<String>) -> Self {
    Self { id, name: name.into() }
  }

  /// Identity comparison; names are ignored.
  pub fn same_unit(&self, other: &CodeUnit) -> bool {
    self.id == other.id
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
  #[default]
  Loaded,
  NotLoaded,
}

/// Registry record describing one installed module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
  /// Module identity, also used as the per-module scope key
  pub name: String,
  /// Display title, used as the tag name
  pub title: String,
  pub description: String,
  /// Code unit whose endpoints belong to this module
  pub unit: CodeUnit,
  pub state: ModuleState,
}

impl ModuleDescriptor {
  pub fn new(name: impl Into<String>, title: impl Into<String>, description: impl Into<String>, unit: CodeUnit) -> Self {
    Self {
      name: name.into(),
      title: title.into(),
      description: description.into(),
      unit,
      state: ModuleState::Loaded,
    }
  }

  pub fn not_loaded(mut self) -> Self {
    self.state = ModuleState::NotLoaded;
    self
  }

  pub fn is_loaded(&self) -> bool {
    self.state == ModuleState::Loaded
  }
}
