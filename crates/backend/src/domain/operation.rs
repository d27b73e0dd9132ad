use std::fmt;

use serde::{Deserialize, Serialize};

use super::module::CodeUnit;

/// HTTP method of a described endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
  Trace,
}

impl Method {
  pub fn as_str(&self) -> &'static str {
    match self {
      Method::Get => "get",
      Method::Put => "put",
      Method::Post => "post",
      Method::Delete => "delete",
      Method::Options => "options",
      Method::Head => "head",
      Method::Patch => "patch",
      Method::Trace => "trace",
    }
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A parameter as declared on the endpoint handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
  pub name: String,
  /// Carries the declared-optional marker
  #[serde(default)]
  pub optional: bool,
}

impl ParameterDescriptor {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
    }
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: true,
    }
  }
}

/// One discovered endpoint, as reported by the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDescription {
  pub method: Method,
  /// Path template, e.g. `/api/catalog/products/{id}`
  pub path: String,
  /// Handler name, becomes the operation id
  pub action: String,
  /// Code unit the handler was compiled into
  pub unit: CodeUnit,
  pub parameters: Vec<ParameterDescriptor>,
}

impl ApiDescription {
  pub fn new(method: Method, path: impl Into<String>, action: impl Into<String>, unit: CodeUnit) -> Self {
    Self {
      method,
      path: path.into(),
      action: action.into(),
      unit,
      parameters: Vec::new(),
    }
  }

  pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
    self.parameters.push(parameter);
    self
  }

  /// Names of `{placeholder}` segments in the path template.
  pub fn path_parameters(&self) -> impl Iterator<Item = &str> {
    self
      .path
      .split('/')
      .filter_map(|segment| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
  }

  pub fn optional_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
    self.parameters.iter().filter(|p| p.optional)
  }
}
