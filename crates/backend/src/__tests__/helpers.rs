//! Shared fixtures for service-level tests.

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use utoipa::openapi::{OpenApi, Required, path::Operation};

use crate::{
  cache::ScopedDocumentCache,
  domain::{
    config::DocsConfig,
    module::{CodeUnit, ModuleDescriptor},
    operation::{ApiDescription, Method, ParameterDescriptor},
  },
  draft::{CatalogDraftBuilder, Draft, DraftBuilder},
  driver::DocsService,
  error::BuildError,
  host::{DESCRIPTION_SETTING, MapSettings, StaticRegistry},
};

/// Draft builder that counts invocations and can be told to fail.
pub struct CountingBuilder {
  inner: CatalogDraftBuilder,
  pub calls: Arc<AtomicUsize>,
  failures_left: AtomicUsize,
}

impl CountingBuilder {
  pub fn new(inner: CatalogDraftBuilder, calls: Arc<AtomicUsize>) -> Self {
    Self {
      inner,
      calls,
      failures_left: AtomicUsize::new(0),
    }
  }

  pub fn failing_first(self, count: usize) -> Self {
    self.failures_left.store(count, Ordering::SeqCst);
    self
  }
}

#[async_trait::async_trait]
impl DraftBuilder for CountingBuilder {
  async fn build(&self) -> Result<Draft, BuildError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let remaining = self.failures_left.load(Ordering::SeqCst);
    if remaining > 0 {
      self.failures_left.store(remaining - 1, Ordering::SeqCst);
      return Err(BuildError::extraction("malformed endpoint metadata"));
    }
    self.inner.build().await
  }
}

/// Test host: two modules, platform endpoints and one unowned endpoint.
pub struct TestHost {
  pub config: Arc<DocsConfig>,
  pub registry: Arc<StaticRegistry>,
  pub alpha: ModuleDescriptor,
  pub beta: ModuleDescriptor,
  pub endpoints: Arc<Vec<ApiDescription>>,
  /// Builder invocations per scope key, "" first
  pub calls: Vec<(String, Arc<AtomicUsize>)>,
  pub service: DocsService,
}

impl TestHost {
  pub fn new() -> Self {
    Self::with_failures(0)
  }

  /// Every scope's builder fails its first `failures` invocations.
  pub fn with_failures(failures: usize) -> Self {
    let config = Arc::new(DocsConfig::default());
    let alpha = ModuleDescriptor::new("A", "Alpha", "Alpha module", CodeUnit::new("Alpha.Web"));
    let beta = ModuleDescriptor::new("B", "Beta", "Beta module", CodeUnit::new("Beta.Web"));
    let platform = CodeUnit::new(config.platform_unit.clone());
    let stray = CodeUnit::new("Stray.Web");

    let endpoints = Arc::new(vec![
      ApiDescription::new(Method::Get, "/api/alpha/items", "SearchAlpha", alpha.unit.clone())
        .with_parameter(ParameterDescriptor::required("keyword"))
        .with_parameter(ParameterDescriptor::optional("filter"))
        .with_parameter(ParameterDescriptor::optional("skip")),
      ApiDescription::new(Method::Get, "/api/alpha/items/{id}", "GetAlpha", alpha.unit.clone())
        .with_parameter(ParameterDescriptor::required("id")),
      ApiDescription::new(Method::Post, "/api/beta/orders", "CreateOrder", beta.unit.clone())
        .with_parameter(ParameterDescriptor::optional("Filter")),
      ApiDescription::new(Method::Get, "/api/platform/modules", "GetModules", platform),
      ApiDescription::new(Method::Get, "/api/stray", "Stray", stray),
    ]);

    let registry = Arc::new(StaticRegistry::new(vec![alpha.clone(), beta.clone()]));
    let settings = Arc::new(MapSettings::default().with(DESCRIPTION_SETTING, "Test platform"));
    let cache = Arc::new(ScopedDocumentCache::new());

    let calls: Vec<(String, Arc<AtomicUsize>)> = ["", "A", "B"]
      .iter()
      .map(|key| (key.to_string(), Arc::new(AtomicUsize::new(0))))
      .collect();

    let builder_config = config.clone();
    let builder_endpoints = endpoints.clone();
    let builder_calls = calls.clone();
    let service = DocsService::register(config.clone(), registry.clone(), settings, cache, move |scope| {
      let counter = builder_calls
        .iter()
        .find(|(key, _)| key == scope.key())
        .map(|(_, counter)| counter.clone())
        .unwrap_or_default();
      let inner = CatalogDraftBuilder::new(
        builder_endpoints.clone(),
        scope.filter(),
        scope.title(&builder_config),
        builder_config.api_version.clone(),
      );
      Arc::new(CountingBuilder::new(inner, counter).failing_first(failures)) as Arc<dyn DraftBuilder>
    });

    Self {
      config,
      registry,
      alpha,
      beta,
      endpoints,
      calls,
      service,
    }
  }

  pub fn calls(&self, scope: &str) -> usize {
    self
      .calls
      .iter()
      .find(|(key, _)| key == scope)
      .map(|(_, counter)| counter.load(Ordering::SeqCst))
      .unwrap_or(0)
  }
}

pub fn operation<'a>(document: &'a OpenApi, path: &str, method: Method) -> &'a Operation {
  let item = &document.paths.paths[path];
  let operation = match method {
    Method::Get => &item.get,
    Method::Post => &item.post,
    Method::Put => &item.put,
    Method::Delete => &item.delete,
    Method::Patch => &item.patch,
    Method::Options => &item.options,
    Method::Head => &item.head,
    Method::Trace => &item.trace,
  };
  operation.as_ref().expect("operation present")
}

pub fn tag_names(document: &OpenApi) -> Vec<String> {
  document
    .tags
    .as_ref()
    .map(|tags| tags.iter().map(|t| t.name.clone()).collect())
    .unwrap_or_default()
}

/// (name, required) for each generated parameter of an operation
pub fn parameters(operation: &Operation) -> Vec<(String, bool)> {
  operation
    .parameters
    .as_ref()
    .map(|ps| ps.iter().map(|p| (p.name.clone(), matches!(p.required, Required::True))).collect())
    .unwrap_or_default()
}
