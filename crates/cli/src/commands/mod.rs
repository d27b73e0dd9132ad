//! CLI command implementations

mod config;
mod docs;

pub use config::{cmd_config_init, cmd_config_show};
pub use docs::{cmd_generate, cmd_routes, cmd_serve};
