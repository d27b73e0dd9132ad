//! Error types for document generation.

use std::sync::Arc;

/// Failure reported by a draft builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  /// Endpoint metadata could not be turned into a document.
  #[error("Extraction failed: {0}")]
  Extraction(String),
  /// Any other builder failure.
  #[error("Internal error: {0}")]
  Internal(String),
}

impl BuildError {
  pub fn extraction(msg: impl Into<String>) -> Self {
    Self::Extraction(msg.into())
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::Internal(msg.into())
  }
}

/// Error surfaced to a document request.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
  /// The build for `scope` failed. Every caller that waited on that build
  /// receives the same shared source.
  #[error("Document build failed for scope '{scope}': {source}")]
  Build {
    scope: String,
    #[source]
    source: Arc<BuildError>,
  },
  /// No documentation route matches the requested path.
  #[error("No documentation route for '{0}'")]
  RouteNotFound(String),
  /// The route matched but names a version that is not served.
  #[error("Unknown API version '{0}'")]
  UnknownApiVersion(String),
  /// No route is registered for the scope.
  #[error("Unknown document scope '{0}'")]
  UnknownScope(String),
  #[error("Serialization error: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl DocsError {
  pub fn build(scope: impl Into<String>, source: Arc<BuildError>) -> Self {
    Self::Build {
      scope: scope.into(),
      source,
    }
  }

  /// The shared builder failure, if this error came from one.
  pub fn build_source(&self) -> Option<&Arc<BuildError>> {
    match self {
      Self::Build { source, .. } => Some(source),
      _ => None,
    }
  }
}
