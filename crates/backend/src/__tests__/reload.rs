//! Module set changes after documents were cached.

use pretty_assertions::assert_eq;

use super::helpers::{TestHost, operation, tag_names};
use crate::{
  cache::PLATFORM_SCOPE,
  domain::{
    module::{CodeUnit, ModuleDescriptor},
    operation::Method,
  },
  error::DocsError,
};

#[tokio::test]
async fn test_cached_document_is_stale_until_invalidated() {
  let host = TestHost::new();
  let before = host.service.document(PLATFORM_SCOPE).await.unwrap();
  assert_eq!(tag_names(&before), vec!["Alpha", "Beta", "VirtoCommerce platform"]);

  let gamma = ModuleDescriptor::new("C", "Gamma", "Hot loaded", CodeUnit::new("Gamma.Web"));
  host
    .registry
    .replace(vec![host.alpha.clone(), host.beta.clone(), gamma]);

  let cached = host.service.document(PLATFORM_SCOPE).await.unwrap();
  assert_eq!(tag_names(&cached), vec!["Alpha", "Beta", "VirtoCommerce platform"]);

  host.service.invalidate(PLATFORM_SCOPE).await;
  let after = host.service.document(PLATFORM_SCOPE).await.unwrap();
  assert_eq!(tag_names(&after), vec!["Alpha", "Beta", "Gamma", "VirtoCommerce platform"]);
  assert_eq!(host.calls(PLATFORM_SCOPE), 2);

  // Routes are fixed at registration
  assert!(matches!(host.service.document("C").await, Err(DocsError::UnknownScope(_))));
}

#[tokio::test]
async fn test_unloaded_module_loses_tags_after_invalidate_all() {
  let host = TestHost::new();
  host.service.document(PLATFORM_SCOPE).await.unwrap();
  host.service.document("A").await.unwrap();

  host
    .registry
    .replace(vec![host.alpha.clone(), host.beta.clone().not_loaded()]);
  host.service.invalidate_all();

  let doc = host.service.document(PLATFORM_SCOPE).await.unwrap();
  assert_eq!(tag_names(&doc), vec!["Alpha", "VirtoCommerce platform"]);
  assert_eq!(operation(&doc, "/api/beta/orders", Method::Post).tags, None);
  assert_eq!(
    operation(&doc, "/api/alpha/items", Method::Get).tags,
    Some(vec!["Alpha".to_string()])
  );
  assert_eq!(host.calls(PLATFORM_SCOPE), 2);

  host.service.document("A").await.unwrap();
  assert_eq!(host.calls("A"), 2);
}
