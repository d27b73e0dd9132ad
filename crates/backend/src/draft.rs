//! Draft documents and the builders that produce them.
//!
//! A [`DraftBuilder`] stands for the host's description-extraction pipeline:
//! it discovers endpoints for one scope and assembles an unfiltered document.
//! Scope restriction is configured on the builder by whoever creates it.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use utoipa::openapi::{
  InfoBuilder, OpenApi, OpenApiBuilder, Paths, Required,
  path::{Operation, Parameter, ParameterIn, PathItem},
  security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{
  domain::{
    config::SecurityConfig,
    module::UnitId,
    operation::{ApiDescription, Method},
  },
  error::BuildError,
};

/// An in-progress document plus the descriptions its operations came from.
#[derive(Debug, Clone)]
pub struct Draft {
  pub document: OpenApi,
  /// One entry per generated operation, correlated by method + path
  pub descriptions: Vec<ApiDescription>,
}

impl Draft {
  pub fn new(document: OpenApi) -> Self {
    Self {
      document,
      descriptions: Vec::new(),
    }
  }

  /// Add a generated operation at the description's method + path.
  pub fn push_operation(&mut self, description: ApiDescription, operation: Operation) {
    let item = self
      .document
      .paths
      .paths
      .entry(description.path.clone())
      .or_insert_with(PathItem::default);
    *operation_slot(item, description.method) = Some(operation);
    self.descriptions.push(description);
  }

  /// The generated operation for a description, if one exists.
  pub fn operation_mut<'a>(document: &'a mut OpenApi, description: &ApiDescription) -> Option<&'a mut Operation> {
    let item = document.paths.paths.get_mut(&description.path)?;
    operation_slot(item, description.method).as_mut()
  }
}

fn operation_slot(item: &mut PathItem, method: Method) -> &mut Option<Operation> {
  match method {
    Method::Get => &mut item.get,
    Method::Put => &mut item.put,
    Method::Post => &mut item.post,
    Method::Delete => &mut item.delete,
    Method::Options => &mut item.options,
    Method::Head => &mut item.head,
    Method::Patch => &mut item.patch,
    Method::Trace => &mut item.trace,
  }
}

#[async_trait::async_trait]
pub trait DraftBuilder: Send + Sync {
  /// Discover endpoints and assemble an unfiltered draft.
  async fn build(&self) -> Result<Draft, BuildError>;
}

/// Which endpoints a builder includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
  All,
  /// Only endpoints compiled into this unit
  Unit(UnitId),
}

impl ScopeFilter {
  pub fn includes(&self, description: &ApiDescription) -> bool {
    match self {
      ScopeFilter::All => true,
      ScopeFilter::Unit(id) => description.unit.id == *id,
    }
  }
}

/// Builds drafts from a fixed list of discovered endpoints.
pub struct CatalogDraftBuilder {
  endpoints: Arc<Vec<ApiDescription>>,
  filter: ScopeFilter,
  title: String,
  version: String,
  security: SecurityConfig,
}

impl CatalogDraftBuilder {
  pub fn new(
    endpoints: Arc<Vec<ApiDescription>>,
    filter: ScopeFilter,
    title: impl Into<String>,
    version: impl Into<String>,
  ) -> Self {
    Self {
      endpoints,
      filter,
      title: title.into(),
      version: version.into(),
      security: SecurityConfig::default(),
    }
  }

  pub fn with_security(mut self, security: SecurityConfig) -> Self {
    self.security = security;
    self
  }

  fn operation_for(description: &ApiDescription) -> Result<Operation, BuildError> {
    if !description.path.starts_with('/') {
      return Err(BuildError::extraction(format!(
        "path '{}' of action '{}' is not absolute",
        description.path, description.action
      )));
    }

    let path_names: Vec<&str> = description.path_parameters().collect();
    if path_names.iter().any(|n| n.is_empty()) {
      return Err(BuildError::extraction(format!(
        "path '{}' has an unnamed parameter",
        description.path
      )));
    }

    let mut parameters: Vec<Parameter> = path_names
      .iter()
      .map(|name| {
        let mut parameter = Parameter::new(*name);
        parameter.parameter_in = ParameterIn::Path;
        parameter.required = Required::True;
        parameter
      })
      .collect();

    // Declared parameters not bound to the path go to the query string. The
    // generator cannot see the optional marker, so they start out required.
    parameters.extend(
      description
        .parameters
        .iter()
        .filter(|p| !path_names.contains(&p.name.as_str()))
        .map(|p| {
          let mut parameter = Parameter::new(p.name.clone());
          parameter.parameter_in = ParameterIn::Query;
          parameter.required = Required::True;
          parameter
        }),
    );

    let mut operation = Operation::new();
    operation.operation_id = Some(description.action.clone());
    if !parameters.is_empty() {
      operation.parameters = Some(parameters);
    }
    Ok(operation)
  }
}

#[async_trait::async_trait]
impl DraftBuilder for CatalogDraftBuilder {
  async fn build(&self) -> Result<Draft, BuildError> {
    let mut document = OpenApiBuilder::new()
      .info(InfoBuilder::new().title(self.title.clone()).version(self.version.clone()).build())
      .paths(Paths::new())
      .build();
    document.components.get_or_insert_with(Default::default).add_security_scheme(
      self.security.scheme.clone(),
      SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
        self.security.header.clone(),
        self.security.description.clone(),
      ))),
    );

    let mut draft = Draft::new(document);
    let mut seen: HashSet<(String, Method)> = HashSet::new();

    for description in self.endpoints.iter().filter(|d| self.filter.includes(d)) {
      // Conflicting actions on one method + path: the first one is documented
      if !seen.insert((description.path.clone(), description.method)) {
        debug!(path = %description.path, method = %description.method, action = %description.action, "Skipping conflicting action");
        continue;
      }
      let operation = Self::operation_for(description)?;
      draft.push_operation(description.clone(), operation);
    }

    Ok(draft)
  }
}
