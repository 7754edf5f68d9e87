use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::MatchMode;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_by_location_limit")]
    pub by_location_limit: usize,
    #[serde(default)]
    pub default_mode: MatchMode,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            by_location_limit: default_by_location_limit(),
            default_mode: MatchMode::default(),
        }
    }
}

fn default_limit() -> usize { 20 }
fn default_max_limit() -> usize { 100 }
fn default_by_location_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SAFARI__)
    /// 5. CATALOG_PATH for the catalog file
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SAFARI__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_overrides(settings)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SAFARI")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known environment variables that sit outside the SAFARI__ prefix
fn apply_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(path) = std::env::var("CATALOG_PATH") {
        builder = builder.set_override("catalog.path", path)?;
    }

    builder.build()
}
