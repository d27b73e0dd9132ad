//! Decides which module owns an operation.

use crate::domain::module::{CodeUnit, ModuleDescriptor};

/// Owner of an operation's code unit.
#[derive(Debug, Clone, Copy)]
pub enum Owner<'a> {
  Module(&'a ModuleDescriptor),
  Platform,
  Unowned,
}

impl Owner<'_> {
  /// Tag name an owned operation receives, if any.
  pub fn tag<'t>(&'t self, platform_tag: &'t str) -> Option<&'t str> {
    match self {
      Owner::Module(module) => Some(module.title.as_str()),
      Owner::Platform => Some(platform_tag),
      Owner::Unowned => None,
    }
  }
}

/// Classify the code unit an operation was compiled into.
///
/// The first loaded module whose unit has the same identity wins, so if two
/// modules ever shared a unit the earliest registered one owns it. Failing
/// that, a unit named `platform_unit` belongs to the platform core.
pub fn classify<'a>(unit: &CodeUnit, modules: &'a [ModuleDescriptor], platform_unit: &str) -> Owner<'a> {
  if let Some(module) = modules.iter().find(|m| m.is_loaded() && m.unit.same_unit(unit)) {
    return Owner::Module(module);
  }
  if unit.name == platform_unit {
    return Owner::Platform;
  }
  Owner::Unowned
}
