//! Post-processing filters applied to a draft before it is cached.
//!
//! Filters come in two kinds, mirroring how API description generators are
//! usually extended:
//!
//! - [`DocumentFilter`] rewrites document-level data once per generation
//! - [`OperationFilter`] rewrites one operation, given the [`ApiDescription`]
//!   it was generated from
//!
//! ## Available Filters
//!
//! - [`tags::TagsFilter`] - info metadata and module tags
//! - [`optional::OptionalParametersFilter`] - clears `required` on declared-optional parameters

pub mod classify;
pub mod optional;
pub mod tags;

use std::sync::Arc;

use tracing::trace;
use utoipa::openapi::OpenApi;
use utoipa::openapi::path::Operation;

use crate::{
  domain::{module::ModuleDescriptor, operation::ApiDescription},
  draft::Draft,
};

/// Read-only state shared by all filters during one generation.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
  /// Loaded modules in registry order, snapshotted when the generation started
  pub modules: Vec<ModuleDescriptor>,
}

impl FilterContext {
  pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
    Self {
      modules: modules.into_iter().filter(|m| m.is_loaded()).collect(),
    }
  }
}

pub trait DocumentFilter: Send + Sync {
  fn apply_document(&self, document: &mut OpenApi, ctx: &FilterContext);
}

pub trait OperationFilter: Send + Sync {
  fn apply_operation(&self, operation: &mut Operation, description: &ApiDescription, ctx: &FilterContext);
}

/// Ordered set of filters run over every draft.
#[derive(Clone, Default)]
pub struct FilterPipeline {
  document_filters: Vec<Arc<dyn DocumentFilter>>,
  operation_filters: Vec<Arc<dyn OperationFilter>>,
}

impl FilterPipeline {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn document_filter(mut self, filter: Arc<dyn DocumentFilter>) -> Self {
    self.document_filters.push(filter);
    self
  }

  pub fn operation_filter(mut self, filter: Arc<dyn OperationFilter>) -> Self {
    self.operation_filters.push(filter);
    self
  }

  /// Run operation filters over every described operation, then document filters.
  pub fn apply(&self, draft: &mut Draft, ctx: &FilterContext) {
    let Draft { document, descriptions } = draft;

    for description in descriptions.iter() {
      let Some(operation) = Draft::operation_mut(document, description) else {
        trace!(path = %description.path, method = %description.method, "No generated operation for description");
        continue;
      };
      for filter in &self.operation_filters {
        filter.apply_operation(operation, description, ctx);
      }
    }

    for filter in &self.document_filters {
      filter.apply_document(document, ctx);
    }
  }
}

impl std::fmt::Debug for FilterPipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FilterPipeline")
      .field("document_filters", &self.document_filters.len())
      .field("operation_filters", &self.operation_filters.len())
      .finish()
  }
}
