//! Documentation routes and the service that answers them.
//!
//! One route is registered for the whole platform and one per loaded module.
//! Each route has a fixed scope key and draft builder; answering it goes
//! through the shared [`ScopedDocumentCache`].
//!
//! ```text
//! {prefix}docs/{apiVersion}           scope ""        (swagger_docs)
//! {prefix}docs/{module}/{apiVersion}  scope {module}  (swagger_{module})
//! ```

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};
use utoipa::openapi::OpenApi;

use crate::{
  cache::{PLATFORM_SCOPE, ScopedDocumentCache},
  domain::{
    catalog::Catalog,
    config::{Config, DocsConfig},
    module::ModuleDescriptor,
  },
  draft::{CatalogDraftBuilder, DraftBuilder, ScopeFilter},
  error::DocsError,
  filter::{FilterContext, FilterPipeline, optional::OptionalParametersFilter, tags::TagsFilter},
  host::{EXPORT_DESCRIPTION_SETTING, MapSettings, ModuleRegistry, SettingsStore, StaticRegistry},
};

const API_VERSION_PLACEHOLDER: &str = "{apiVersion}";

/// What a documentation route covers.
#[derive(Debug, Clone)]
pub enum DocsScope {
  Platform,
  Module(ModuleDescriptor),
}

impl DocsScope {
  /// Cache key: empty for the platform, the module name otherwise.
  pub fn key(&self) -> &str {
    match self {
      DocsScope::Platform => PLATFORM_SCOPE,
      DocsScope::Module(module) => &module.name,
    }
  }

  pub fn title(&self, config: &DocsConfig) -> String {
    match self {
      DocsScope::Platform => config.platform_title.clone(),
      DocsScope::Module(module) => config.module_title(&module.name),
    }
  }

  /// Endpoints a builder for this scope should include.
  pub fn filter(&self) -> ScopeFilter {
    match self {
      DocsScope::Platform => ScopeFilter::All,
      DocsScope::Module(module) => ScopeFilter::Unit(module.unit.id),
    }
  }

  fn route_name(&self) -> String {
    match self {
      DocsScope::Platform => "swagger_docs".to_string(),
      DocsScope::Module(module) => format!("swagger_{}", module.name),
    }
  }

  fn route_template(&self, config: &DocsConfig) -> String {
    match self {
      DocsScope::Platform => format!("{}docs/{}", config.route_prefix, API_VERSION_PLACEHOLDER),
      DocsScope::Module(module) => format!("{}docs/{}/{}", config.route_prefix, module.name, API_VERSION_PLACEHOLDER),
    }
  }
}

/// A registered documentation route.
pub struct DocsRoute {
  pub name: String,
  pub template: String,
  pub scope: DocsScope,
  builder: Arc<dyn DraftBuilder>,
}

impl DocsRoute {
  /// Match a request path against the template, returning the requested version.
  fn matches<'p>(&self, path: &'p str) -> Option<&'p str> {
    let template: Vec<&str> = self.template.trim_matches('/').split('/').collect();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if template.len() != segments.len() {
      return None;
    }

    let mut version = None;
    for (expected, actual) in template.iter().zip(&segments) {
      if *expected == API_VERSION_PLACEHOLDER {
        version = Some(*actual);
      } else if expected != actual {
        return None;
      }
    }
    version
  }
}

impl std::fmt::Debug for DocsRoute {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DocsRoute")
      .field("name", &self.name)
      .field("template", &self.template)
      .field("scope", &self.scope.key())
      .finish()
  }
}

/// Serves generated documents for every registered route.
pub struct DocsService {
  config: Arc<DocsConfig>,
  registry: Arc<dyn ModuleRegistry>,
  settings: Arc<dyn SettingsStore>,
  cache: Arc<ScopedDocumentCache>,
  pipeline: FilterPipeline,
  routes: Vec<DocsRoute>,
}

impl DocsService {
  /// Register the platform route and one route per loaded module.
  ///
  /// `builder_for` creates the draft builder of each scope; restricting a
  /// module's builder to that module's endpoints is its job.
  pub fn register<F>(
    config: Arc<DocsConfig>,
    registry: Arc<dyn ModuleRegistry>,
    settings: Arc<dyn SettingsStore>,
    cache: Arc<ScopedDocumentCache>,
    builder_for: F,
  ) -> Self
  where
    F: Fn(&DocsScope) -> Arc<dyn DraftBuilder>,
  {
    let tags = Arc::new(TagsFilter::new(settings.clone(), config.clone()));
    let pipeline = FilterPipeline::new()
      .document_filter(tags.clone())
      .operation_filter(tags)
      .operation_filter(Arc::new(OptionalParametersFilter));

    let scopes = std::iter::once(DocsScope::Platform).chain(registry.loaded_modules().into_iter().map(DocsScope::Module));

    let routes: Vec<DocsRoute> = scopes
      .map(|scope| {
        let route = DocsRoute {
          name: scope.route_name(),
          template: scope.route_template(&config),
          builder: builder_for(&scope),
          scope,
        };
        info!(route = %route.name, template = %route.template, "Registered documentation route");
        route
      })
      .collect();

    Self {
      config,
      registry,
      settings,
      cache,
      pipeline,
      routes,
    }
  }

  /// Wire a service from a catalog manifest, using catalog builders for every scope.
  pub fn from_catalog(config: &Config, catalog: Catalog) -> Self {
    let docs = Arc::new(config.docs.clone());
    let endpoints = Arc::new(catalog.endpoints);
    let registry: Arc<dyn ModuleRegistry> = Arc::new(StaticRegistry::new(catalog.modules));
    let settings: Arc<dyn SettingsStore> = Arc::new(MapSettings::new(config.settings.clone()));
    let cache = Arc::new(ScopedDocumentCache::with_initial_capacity(config.cache.initial_capacity));

    let builder_config = docs.clone();
    Self::register(docs, registry, settings, cache, move |scope| -> Arc<dyn DraftBuilder> {
      Arc::new(
        CatalogDraftBuilder::new(
          endpoints.clone(),
          scope.filter(),
          scope.title(&builder_config),
          builder_config.api_version.clone(),
        )
        .with_security(builder_config.security.clone()),
      )
    })
  }

  pub fn routes(&self) -> &[DocsRoute] {
    &self.routes
  }

  pub fn cache(&self) -> &ScopedDocumentCache {
    &self.cache
  }

  /// Find the route serving `path` and check the requested version.
  pub fn resolve(&self, path: &str) -> Result<&DocsRoute, DocsError> {
    let (route, version) = self
      .routes
      .iter()
      .find_map(|route| route.matches(path).map(|version| (route, version)))
      .ok_or_else(|| DocsError::RouteNotFound(path.to_string()))?;

    if version != self.config.api_version {
      return Err(DocsError::UnknownApiVersion(version.to_string()));
    }
    Ok(route)
  }

  /// Generated document for a scope key ("" for the platform).
  pub async fn document(&self, scope: &str) -> Result<Arc<OpenApi>, DocsError> {
    let route = self
      .routes
      .iter()
      .find(|r| r.scope.key() == scope)
      .ok_or_else(|| DocsError::UnknownScope(scope.to_string()))?;
    self.generate(route).await
  }

  /// Answer a request path with the pretty-printed document.
  pub async fn serve(&self, path: &str) -> Result<String, DocsError> {
    let route = self.resolve(path)?;
    debug!(path, route = %route.name, "Serving document");
    let document = self.generate(route).await?;
    Ok(document.to_pretty_json()?)
  }

  /// Generate every registered scope concurrently.
  pub async fn warm_up(&self) -> Result<(), DocsError> {
    try_join_all(self.routes.iter().map(|route| self.generate(route))).await?;
    Ok(())
  }

  async fn generate(&self, route: &DocsRoute) -> Result<Arc<OpenApi>, DocsError> {
    self
      .cache
      .get_or_build(route.scope.key(), async {
        let mut draft = route.builder.build().await?;
        let ctx = FilterContext::new(self.registry.modules());
        self.pipeline.apply(&mut draft, &ctx);
        Ok(draft.document)
      })
      .await
  }

  /// Drop a scope's cached document, e.g. after its module was reloaded.
  ///
  /// A generation already running for `scope` keeps its module snapshot and
  /// still caches its result; see [`ScopedDocumentCache::invalidate`].
  pub async fn invalidate(&self, scope: &str) {
    self.cache.invalidate(scope).await;
  }

  pub fn invalidate_all(&self) {
    self.cache.invalidate_all();
  }

  pub fn export_description(&self) -> String {
    self.settings.get_or_default(EXPORT_DESCRIPTION_SETTING)
  }

  /// Nothing to export; documents are derived state.
  pub fn do_export(&self, _out: &mut dyn std::io::Write) -> Result<(), DocsError> {
    Ok(())
  }

  /// Nothing to import; documents are derived state.
  pub fn do_import(&self, _input: &mut dyn std::io::Read) -> Result<(), DocsError> {
    Ok(())
  }
}
