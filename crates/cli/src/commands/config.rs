use anyhow::Result;
use plugdocs::config::Config;
use tracing::error;

/// Show the effective configuration
pub async fn cmd_config_show(config: &Config) -> Result<()> {
  let cwd = std::env::current_dir()?;
  let project_config = Config::project_config_path(&cwd);
  let user_config = Config::user_config_path();

  if project_config.exists() {
    println!("Using project config: {:?}", project_config);
  } else if let Some(ref user_path) = user_config
    && user_path.exists()
  {
    println!("Using user config: {:?}", user_path);
  } else {
    println!("Using default configuration (no config file found)");
  }
  println!();

  let toml_str = toml::to_string_pretty(config)?;
  println!("{}", toml_str);

  Ok(())
}

/// Initialize project configuration file
pub async fn cmd_config_init() -> Result<()> {
  let cwd = std::env::current_dir()?;
  let config_path = Config::project_config_path(&cwd);

  if config_path.exists() {
    error!("Config file already exists: {:?}", config_path);
    println!("Delete it first if you want to regenerate");
    std::process::exit(1);
  }

  if let Some(parent) = config_path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&config_path, Config::generate_template())?;

  println!("Created project config: {:?}", config_path);
  Ok(())
}
