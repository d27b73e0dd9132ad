//! Configuration for document generation with per-project overrides.
//!
//! Config priority: project-relative (.plugdocs/config.toml) > user (~/.config/plugdocs/config.toml) > defaults

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors reading an explicitly requested config or manifest file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
  #[error("Invalid manifest: {0}")]
  Invalid(String),
}

// ============================================================================
// Document Metadata
// ============================================================================

/// Contact block written into every document's info section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
  pub name: String,
  pub email: String,
  pub url: String,
}

impl Default for ContactConfig {
  fn default() -> Self {
    Self {
      name: "VirtoCommerce".to_string(),
      email: "support@virtocommerce.com".to_string(),
      url: "http://virtocommerce.com".to_string(),
    }
  }
}

/// License block written into every document's info section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
  pub name: String,
  pub url: String,
}

impl Default for LicenseConfig {
  fn default() -> Self {
    Self {
      name: "Virto Commerce Open Software License 3.0".to_string(),
      url: "http://virtocommerce.com/opensourcelicense".to_string(),
    }
  }
}

/// The tag given to endpoints of the platform core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTagConfig {
  pub name: String,
  pub description: String,
}

impl Default for PlatformTagConfig {
  fn default() -> Self {
    Self {
      name: "VirtoCommerce platform".to_string(),
      description: "Platform functionality represent common resources and operations".to_string(),
    }
  }
}

/// API key security scheme advertised by generated documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
  /// Name of the scheme in `components.securitySchemes`
  pub scheme: String,
  /// Header carrying the key
  pub header: String,
  pub description: String,
}

impl Default for SecurityConfig {
  fn default() -> Self {
    Self {
      scheme: "apiKey".to_string(),
      header: "api_key".to_string(),
      description: "API Key Authentication".to_string(),
    }
  }
}

/// Route, identity and metadata settings for generated documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
  /// Prefix prepended to every documentation route (e.g. "api/")
  pub route_prefix: String,

  /// The single API version served
  pub api_version: String,

  /// Title of the whole-platform document
  pub platform_title: String,

  /// Code unit name identifying endpoints of the platform core
  pub platform_unit: String,

  pub contact: ContactConfig,
  pub license: LicenseConfig,
  pub platform_tag: PlatformTagConfig,
  pub security: SecurityConfig,
}

impl Default for DocsConfig {
  fn default() -> Self {
    Self {
      route_prefix: String::new(),
      api_version: "v1".to_string(),
      platform_title: "VirtoCommerce Solution REST API documentation".to_string(),
      platform_unit: "VirtoCommerce.Platform.Web".to_string(),
      contact: ContactConfig::default(),
      license: LicenseConfig::default(),
      platform_tag: PlatformTagConfig::default(),
      security: SecurityConfig::default(),
    }
  }
}

impl DocsConfig {
  /// Title of a per-module document
  pub fn module_title(&self, module_name: &str) -> String {
    format!("{} REST API documentation", module_name)
  }
}

// ============================================================================
// Cache / Logging
// ============================================================================

/// Document cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Scope documents to preallocate for (default: 16). Documents are never
  /// evicted regardless of this value.
  pub initial_capacity: usize,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self { initial_capacity: 16 }
  }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: error, warn, info, debug, trace (default: info)
  pub level: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
  #[serde(default)]
  pub docs: DocsConfig,

  #[serde(default)]
  pub cache: CacheConfig,

  #[serde(default)]
  pub logging: LoggingConfig,

  /// Values served by the settings store (e.g. "docs.description")
  #[serde(default)]
  pub settings: BTreeMap<String, String>,
}

impl Config {
  /// Load config for a project, with fallback to user config
  pub fn load_for_project(project_path: &Path) -> Self {
    // Try project-relative first
    let project_config = Self::project_config_path(project_path);
    if project_config.exists()
      && let Ok(content) = std::fs::read_to_string(&project_config)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    // Fall back to user config
    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
      && let Ok(content) = std::fs::read_to_string(&user_config_path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    Self::default()
  }

  /// Load an explicitly named config file. Unlike discovery, failures are reported.
  pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("plugdocs").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("plugdocs").join("config.toml"))
  }

  /// Get the project-relative config path
  pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(".plugdocs").join("config.toml")
  }

  /// Generate a commented config file with the default values
  pub fn generate_template() -> String {
    let defaults = DocsConfig::default();
    format!(
      r#"# plugdocs configuration
# Place in .plugdocs/config.toml (project) or ~/.config/plugdocs/config.toml (user)

[docs]
# Prefix for documentation routes: {{prefix}}docs/{{apiVersion}} and {{prefix}}docs/{{module}}/{{apiVersion}}
route_prefix = "{route_prefix}"
api_version = "{api_version}"
platform_title = "{platform_title}"
# Endpoints compiled into this unit are tagged with the platform tag
platform_unit = "{platform_unit}"

[docs.contact]
name = "{contact_name}"
email = "{contact_email}"
url = "{contact_url}"

[docs.license]
name = "{license_name}"
url = "{license_url}"

[docs.platform_tag]
name = "{tag_name}"
description = "{tag_description}"

[docs.security]
scheme = "{scheme}"
header = "{header}"
description = "{security_description}"

[cache]
initial_capacity = {initial_capacity}

[logging]
level = "info"

[settings]
# "docs.description" = "Shown at the top of every document"
# "docs.export.description" = "Shown by the export wizard"
"#,
      route_prefix = defaults.route_prefix,
      api_version = defaults.api_version,
      platform_title = defaults.platform_title,
      platform_unit = defaults.platform_unit,
      contact_name = defaults.contact.name,
      contact_email = defaults.contact.email,
      contact_url = defaults.contact.url,
      license_name = defaults.license.name,
      license_url = defaults.license.url,
      tag_name = defaults.platform_tag.name,
      tag_description = defaults.platform_tag.description,
      scheme = defaults.security.scheme,
      header = defaults.security.header,
      security_description = defaults.security.description,
      initial_capacity = CacheConfig::default().initial_capacity,
    )
  }
}
