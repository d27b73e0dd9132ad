//! Per-scope OpenAPI document generation for modular hosts.
//!
//! The host registers one documentation route for the whole platform and one
//! per loaded module. A request for a route builds the scope's draft through
//! the host's extraction pipeline, runs the filters that tag operations by
//! owning module and relax declared-optional parameters, and caches the
//! finished document per scope.

pub mod cache;
pub mod domain;
pub mod draft;
pub mod driver;
pub mod error;
pub mod filter;
pub mod host;

pub use domain::{catalog, config};
pub use driver::{DocsScope, DocsService};
pub use error::{BuildError, DocsError};

#[cfg(test)]
mod __tests__;
