//! Domain types - modules, code units and API descriptions
//!
//! These are the records handed to the document pipeline by its collaborators
//! (module registry, endpoint discovery). The pipeline only reads them.

pub mod catalog;
pub mod config;
pub mod module;
pub mod operation;
