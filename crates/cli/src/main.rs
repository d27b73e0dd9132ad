//! plugdocs CLI - OpenAPI documents for modular hosts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plugdocs::config::Config;
use std::path::PathBuf;

mod commands;
mod logging;

use commands::{cmd_config_init, cmd_config_show, cmd_generate, cmd_routes, cmd_serve};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "plugdocs")]
#[command(about = "Generate per-module OpenAPI documents from a module catalog")]
#[command(after_help = "\
EXAMPLES:
  plugdocs routes -c catalog.toml                  # List documentation routes
  plugdocs generate -c catalog.toml                # Whole-platform document
  plugdocs generate -c catalog.toml -m Catalog     # One module's document
  plugdocs serve -c catalog.toml docs/Catalog/v1   # Answer a route")]
struct Cli {
  /// Config file (default: .plugdocs/config.toml, then user config)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List the documentation routes for a catalog
  Routes {
    /// Module catalog manifest
    #[arg(short, long, value_name = "FILE")]
    catalog: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Generate a document
  Generate {
    /// Module catalog manifest
    #[arg(short, long, value_name = "FILE")]
    catalog: PathBuf,
    /// Module name (default: whole platform)
    #[arg(short, long)]
    module: Option<String>,
    /// Write to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
  /// Answer a documentation route path
  Serve {
    /// Module catalog manifest
    #[arg(short, long, value_name = "FILE")]
    catalog: PathBuf,
    /// Request path, e.g. docs/v1 or docs/Catalog/v1
    path: String,
    /// Write to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
  /// Configuration management
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[derive(Subcommand)]
enum ConfigCommand {
  /// Show effective configuration
  Show,
  /// Create .plugdocs/config.toml with defaults
  Init,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let config = match &cli.config {
    Some(path) => Config::load_from_path(path).with_context(|| format!("Failed to load config {:?}", path))?,
    None => Config::load_for_project(&std::env::current_dir()?),
  };
  init_logging(&config.logging.level);

  match cli.command {
    Commands::Routes { catalog, json } => cmd_routes(&config, &catalog, json).await,
    Commands::Generate {
      catalog,
      module,
      output,
    } => cmd_generate(&config, &catalog, module.as_deref(), output.as_deref()).await,
    Commands::Serve { catalog, path, output } => cmd_serve(&config, &catalog, &path, output.as_deref()).await,
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&config).await,
      ConfigCommand::Init => cmd_config_init().await,
    },
  }
}
