//! Per-scope document cache.
//!
//! Generating a document walks every endpoint and runs all filters, so each
//! scope is built once and the result shared by every later request.
//!
//! Key: scope ("" for the whole platform, otherwise a module name)
//! Value: the finished, immutable document

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use tracing::{debug, warn};
use utoipa::openapi::OpenApi;

use crate::error::{BuildError, DocsError};

/// Scope key of the whole-platform document.
pub const PLATFORM_SCOPE: &str = "";

/// Single-flight cache of finished documents.
///
/// Concurrent callers for one scope share a single build; callers for
/// different scopes never wait on each other. Failed builds are not stored,
/// so the next request retries. Entries are never evicted or expired; the
/// number of scopes is bounded by the registered routes. Use
/// [`invalidate`](Self::invalidate) after the module set changes.
pub struct ScopedDocumentCache {
  cache: Cache<String, Arc<OpenApi>>,
  builds: AtomicU64,
  failures: AtomicU64,
}

impl ScopedDocumentCache {
  /// Create a cache with default settings.
  ///
  /// Default initial capacity: 16 scopes
  pub fn new() -> Self {
    Self::with_initial_capacity(16)
  }

  /// Create a cache preallocated for `capacity` scopes. This is a sizing
  /// hint only; the cache grows past it without evicting.
  pub fn with_initial_capacity(capacity: usize) -> Self {
    Self {
      cache: Cache::builder().initial_capacity(capacity).build(),
      builds: AtomicU64::new(0),
      failures: AtomicU64::new(0),
    }
  }

  /// Return the cached document for `scope`, running `build` on a miss.
  ///
  /// `build` is only polled by the caller that wins the race for a missing
  /// scope. Every caller waiting on a failed build receives that failure.
  pub async fn get_or_build<F>(&self, scope: &str, build: F) -> Result<Arc<OpenApi>, DocsError>
  where
    F: Future<Output = Result<OpenApi, BuildError>>,
  {
    let mut built = false;
    let result = self
      .cache
      .try_get_with(scope.to_string(), async {
        built = true;
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(scope, "Building document");
        build.await.map(Arc::new)
      })
      .await;

    match result {
      Ok(document) => {
        if !built {
          debug!(scope, "Document cache hit");
        }
        Ok(document)
      }
      Err(source) => {
        if built {
          self.failures.fetch_add(1, Ordering::Relaxed);
          warn!(scope, error = %source, "Document build failed");
        }
        Err(DocsError::build(scope, source))
      }
    }
  }

  /// Get the cached document for a scope without building.
  pub async fn get(&self, scope: &str) -> Option<Arc<OpenApi>> {
    self.cache.get(scope).await
  }

  pub fn contains(&self, scope: &str) -> bool {
    self.cache.contains_key(scope)
  }

  /// Drop one scope's document so the next request rebuilds it.
  ///
  /// A build already in flight for `scope` is not cancelled and stores its
  /// result when it finishes, so a document built from the old module set
  /// can land after this call. Invalidate again once that build completes.
  pub async fn invalidate(&self, scope: &str) {
    debug!(scope, "Invalidating document");
    self.cache.invalidate(scope).await;
  }

  /// Drop every cached document.
  pub fn invalidate_all(&self) {
    debug!("Invalidating all documents");
    self.cache.invalidate_all();
  }

  /// Get cache statistics.
  pub async fn stats(&self) -> CacheStats {
    self.cache.run_pending_tasks().await;
    CacheStats {
      entry_count: self.cache.entry_count(),
      builds: self.builds.load(Ordering::Relaxed),
      failures: self.failures.load(Ordering::Relaxed),
    }
  }
}

impl Default for ScopedDocumentCache {
  fn default() -> Self {
    Self::new()
  }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
  pub entry_count: u64,
  /// Builds started, successful or not
  pub builds: u64,
  pub failures: u64,
}
