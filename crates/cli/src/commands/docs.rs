use std::path::Path;

use anyhow::{Context, Result};
use plugdocs::{DocsService, cache::PLATFORM_SCOPE, catalog::Catalog, config::Config};
use tracing::info;

fn load_service(config: &Config, catalog_path: &Path) -> Result<DocsService> {
  let catalog =
    Catalog::from_path(catalog_path).with_context(|| format!("Failed to load catalog {:?}", catalog_path))?;
  info!(
    modules = catalog.modules.len(),
    endpoints = catalog.endpoints.len(),
    "Loaded catalog"
  );
  Ok(DocsService::from_catalog(config, catalog))
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
  match output {
    Some(path) => {
      std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
      info!("Wrote {:?}", path);
    }
    None => println!("{}", json),
  }
  Ok(())
}

/// List the documentation routes a host would register
pub async fn cmd_routes(config: &Config, catalog_path: &Path, json: bool) -> Result<()> {
  let service = load_service(config, catalog_path)?;

  if json {
    let routes: Vec<_> = service
      .routes()
      .iter()
      .map(|r| {
        serde_json::json!({
          "name": r.name,
          "template": r.template,
          "scope": r.scope.key(),
        })
      })
      .collect();
    println!("{}", serde_json::to_string_pretty(&routes)?);
    return Ok(());
  }

  for route in service.routes() {
    let scope = match route.scope.key() {
      PLATFORM_SCOPE => "(platform)",
      name => name,
    };
    println!("{:<32} {:<48} {}", route.name, route.template, scope);
  }
  Ok(())
}

/// Generate the platform document, or one module's document
pub async fn cmd_generate(
  config: &Config,
  catalog_path: &Path,
  module: Option<&str>,
  output: Option<&Path>,
) -> Result<()> {
  let service = load_service(config, catalog_path)?;
  let scope = module.unwrap_or(PLATFORM_SCOPE);
  let document = service.document(scope).await?;
  write_output(&document.to_pretty_json()?, output)
}

/// Answer a documentation request path, e.g. `docs/Catalog/v1`
pub async fn cmd_serve(config: &Config, catalog_path: &Path, path: &str, output: Option<&Path>) -> Result<()> {
  let service = load_service(config, catalog_path)?;
  let json = service.serve(path).await?;
  write_output(&json, output)
}
