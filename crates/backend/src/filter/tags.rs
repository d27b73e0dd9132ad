//! Document info metadata and per-module tagging.

use std::sync::Arc;

use utoipa::openapi::{ContactBuilder, LicenseBuilder, OpenApi, path::Operation, tag::TagBuilder};

use super::{
  DocumentFilter, FilterContext, OperationFilter,
  classify::{Owner, classify},
};
use crate::{
  domain::{config::DocsConfig, module::ModuleDescriptor, operation::ApiDescription},
  host::{DESCRIPTION_SETTING, SettingsStore},
};

/// Overwrite info metadata and the tag list of `document`.
///
/// Tags are one per loaded module, in registry order, with the platform tag
/// last. The list is replaced, so repeated calls never accumulate tags.
pub fn annotate_document(
  document: &mut OpenApi,
  modules: &[ModuleDescriptor],
  settings: &dyn SettingsStore,
  config: &DocsConfig,
) {
  let info = &mut document.info;
  info.description = Some(settings.get_or_default(DESCRIPTION_SETTING));
  info.contact = Some(
    ContactBuilder::new()
      .name(Some(config.contact.name.clone()))
      .email(Some(config.contact.email.clone()))
      .url(Some(config.contact.url.clone()))
      .build(),
  );
  info.license = Some(
    LicenseBuilder::new()
      .name(config.license.name.clone())
      .url(Some(config.license.url.clone()))
      .build(),
  );

  let mut tags: Vec<_> = modules
    .iter()
    .filter(|m| m.is_loaded())
    .map(|m| {
      TagBuilder::new()
        .name(m.title.clone())
        .description(Some(m.description.clone()))
        .build()
    })
    .collect();
  tags.push(
    TagBuilder::new()
      .name(config.platform_tag.name.clone())
      .description(Some(config.platform_tag.description.clone()))
      .build(),
  );
  document.tags = Some(tags);
}

/// Tag an operation with its owner. Unowned operations keep their tags.
pub fn annotate_operation(
  operation: &mut Operation,
  description: &ApiDescription,
  modules: &[ModuleDescriptor],
  config: &DocsConfig,
) {
  let owner = classify(&description.unit, modules, &config.platform_unit);
  if let Some(tag) = owner.tag(&config.platform_tag.name) {
    operation.tags = Some(vec![tag.to_string()]);
  }
  if let Owner::Unowned = owner {
    tracing::trace!(action = %description.action, unit = %description.unit.name, "Operation has no owning module");
  }
}

/// Applies [`annotate_document`] and [`annotate_operation`].
pub struct TagsFilter {
  settings: Arc<dyn SettingsStore>,
  config: Arc<DocsConfig>,
}

impl TagsFilter {
  pub fn new(settings: Arc<dyn SettingsStore>, config: Arc<DocsConfig>) -> Self {
    Self { settings, config }
  }
}

impl DocumentFilter for TagsFilter {
  fn apply_document(&self, document: &mut OpenApi, ctx: &FilterContext) {
    annotate_document(document, &ctx.modules, self.settings.as_ref(), &self.config);
  }
}

impl OperationFilter for TagsFilter {
  fn apply_operation(&self, operation: &mut Operation, description: &ApiDescription, ctx: &FilterContext) {
    annotate_operation(operation, description, &ctx.modules, &self.config);
  }
}
