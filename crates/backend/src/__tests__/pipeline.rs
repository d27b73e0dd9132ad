//! End-to-end document generation through the service.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::helpers::{TestHost, operation, parameters, tag_names};
use crate::{cache::PLATFORM_SCOPE, domain::operation::Method, error::DocsError};

#[tokio::test]
async fn test_platform_document_contains_every_endpoint() {
  let host = TestHost::new();
  let doc = host.service.document(PLATFORM_SCOPE).await.unwrap();

  assert_eq!(doc.info.title, host.config.platform_title);
  assert_eq!(doc.paths.paths.len(), host.endpoints.len());
  assert_eq!(tag_names(&doc), vec!["Alpha", "Beta", "VirtoCommerce platform"]);
  assert_eq!(doc.info.description.as_deref(), Some("Test platform"));
}

#[tokio::test]
async fn test_operations_tagged_by_owner() {
  let host = TestHost::new();
  let doc = host.service.document(PLATFORM_SCOPE).await.unwrap();

  let tags = |path: &str, method: Method| operation(&doc, path, method).tags.clone();
  assert_eq!(tags("/api/alpha/items", Method::Get), Some(vec![host.alpha.title.clone()]));
  assert_eq!(tags("/api/beta/orders", Method::Post), Some(vec![host.beta.title.clone()]));
  assert_eq!(
    tags("/api/platform/modules", Method::Get),
    Some(vec!["VirtoCommerce platform".to_string()])
  );
  assert_eq!(tags("/api/stray", Method::Get), None);
}

#[tokio::test]
async fn test_optional_parameters_relaxed() {
  let host = TestHost::new();
  let doc = host.service.document(PLATFORM_SCOPE).await.unwrap();

  assert_eq!(
    parameters(operation(&doc, "/api/alpha/items", Method::Get)),
    vec![
      ("keyword".to_string(), true),
      ("filter".to_string(), false),
      ("skip".to_string(), false),
    ]
  );
  assert_eq!(
    parameters(operation(&doc, "/api/alpha/items/{id}", Method::Get)),
    vec![("id".to_string(), true)]
  );
}

#[tokio::test]
async fn test_module_document_is_isolated() {
  let host = TestHost::new();
  let doc = host.service.document("A").await.unwrap();

  assert_eq!(doc.info.title, "A REST API documentation");
  let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
  assert_eq!(paths, vec!["/api/alpha/items", "/api/alpha/items/{id}"]);
  // Document tags still list every module
  assert_eq!(tag_names(&doc), vec!["Alpha", "Beta", "VirtoCommerce platform"]);

  let beta = host.service.document("B").await.unwrap();
  assert_eq!(beta.paths.paths.len(), 1);
  assert!(!Arc::ptr_eq(&doc, &beta));
}

#[tokio::test]
async fn test_serve_by_path() {
  let host = TestHost::new();
  let json = host.service.serve("docs/B/v1").await.unwrap();
  let value: serde_json::Value = serde_json::from_str(&json).unwrap();

  assert_eq!(value["info"]["title"], "B REST API documentation");
  assert_eq!(value["paths"]["/api/beta/orders"]["post"]["tags"][0], "Beta");
  assert_eq!(value["components"]["securitySchemes"]["apiKey"]["name"], "api_key");
  assert_eq!(value["components"]["securitySchemes"]["apiKey"]["in"], "header");
  assert_eq!(value["info"]["license"]["url"], "http://virtocommerce.com/opensourcelicense");

  assert!(matches!(host.service.serve("docs/C/v1").await, Err(DocsError::RouteNotFound(_))));
}

#[tokio::test]
async fn test_repeated_requests_build_once() {
  let host = TestHost::new();
  let first = host.service.serve("docs/v1").await.unwrap();
  let second = host.service.serve("/docs/v1/").await.unwrap();

  assert_eq!(first, second);
  assert_eq!(host.calls(PLATFORM_SCOPE), 1);
  assert_eq!(host.calls("A"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_single_build_per_scope() {
  let host = Arc::new(TestHost::new());

  let mut handles = Vec::new();
  for i in 0..24 {
    let host = host.clone();
    let scope = ["", "A", "B"][i % 3];
    handles.push(tokio::spawn(async move { host.service.document(scope).await }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  assert_eq!(host.calls(""), 1);
  assert_eq!(host.calls("A"), 1);
  assert_eq!(host.calls("B"), 1);
  assert_eq!(host.service.cache().stats().await.entry_count, 3);
}

#[tokio::test]
async fn test_failed_build_is_retried() {
  let host = TestHost::with_failures(1);

  let err = host.service.document("A").await.unwrap_err();
  assert!(matches!(err, DocsError::Build { ref scope, .. } if scope == "A"));

  let doc = host.service.document("A").await.unwrap();
  assert_eq!(doc.paths.paths.len(), 2);
  assert_eq!(host.calls("A"), 2);
}

#[tokio::test]
async fn test_failure_does_not_poison_other_scopes() {
  let host = TestHost::with_failures(1);
  assert!(host.service.document("A").await.is_err());
  // B has its own builder and its own first failure
  assert!(host.service.document("B").await.is_err());
  assert!(host.service.document("B").await.is_ok());
  assert!(host.service.document("A").await.is_ok());
}

#[tokio::test]
async fn test_warm_up_builds_every_scope() {
  let host = TestHost::new();
  host.service.warm_up().await.unwrap();

  for scope in ["", "A", "B"] {
    assert!(host.service.cache().contains(scope));
    assert_eq!(host.calls(scope), 1);
  }
}
