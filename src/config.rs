//! Configuration resolution for tzdb-import
//!
//! Provides two-tier configuration resolution with ENV → TOML priority.
//! The config file lives at `<platform config dir>/tzdb-import/config.toml`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// TimeZoneDB API base URL used when the config file does not override it.
pub const DEFAULT_BASE_URL: &str = "http://api.timezonedb.com/v2.1";

/// Default request-rate ceiling, in requests per second.
pub const DEFAULT_RATE_LIMIT: f64 = 1.0;

/// Default buffer added to the per-request spacing, in seconds. Absorbs
/// variations in the remote server's own rate tracking.
pub const DEFAULT_BUFFER_SECS: f64 = 1.0;

/// Raw TOML config file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api_key: Option<String>,
    pub database_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub rate_limit: Option<f64>,
    pub buffer_secs: Option<f64>,
}

/// Fully resolved importer configuration
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub api_key: String,
    pub database_path: PathBuf,
    pub base_url: String,
    pub rate_limit: f64,
    pub buffer_secs: f64,
}

impl ImporterConfig {
    /// Load configuration from the platform config file (if present) and the
    /// environment.
    pub fn load() -> Result<Self> {
        let toml_config = match config_file_path() {
            Some(path) if path.exists() => read_toml_config(&path)?,
            _ => TomlConfig::default(),
        };
        Self::resolve(toml_config)
    }

    /// Resolve final values from a parsed TOML config plus the environment.
    ///
    /// **Priority:** ENV → TOML → compiled default.
    pub fn resolve(toml_config: TomlConfig) -> Result<Self> {
        let env_key = std::env::var("TZDB_API_KEY").ok().filter(|k| is_valid_key(k));
        let toml_key = toml_config.api_key.clone().filter(|k| is_valid_key(k));

        if env_key.is_some() && toml_key.is_some() {
            warn!(
                "TimeZoneDB API key found in both environment and TOML. \
                 Using environment (highest priority)."
            );
        }

        let api_key = match (env_key, toml_key) {
            (Some(key), _) => {
                info!("TimeZoneDB API key loaded from environment variable");
                key
            }
            (None, Some(key)) => {
                info!("TimeZoneDB API key loaded from TOML config");
                key
            }
            (None, None) => {
                return Err(Error::Config(
                    "TimeZoneDB API key not configured. Please configure using one of:\n\
                     1. Environment: TZDB_API_KEY=your-key-here\n\
                     2. TOML config: config.toml (api_key = \"your-key\")\n\
                     \n\
                     Obtain API key at: https://timezonedb.com/api"
                        .to_string(),
                ));
            }
        };

        let database_path = std::env::var("TZDB_DATABASE_PATH")
            .ok()
            .map(PathBuf::from)
            .or(toml_config.database_path)
            .unwrap_or_else(default_database_path);

        let rate_limit = toml_config.rate_limit.unwrap_or(DEFAULT_RATE_LIMIT);
        if rate_limit <= 0.0 {
            return Err(Error::Config(format!(
                "rate_limit must be positive (got {})",
                rate_limit
            )));
        }

        let buffer_secs = toml_config.buffer_secs.unwrap_or(DEFAULT_BUFFER_SECS);
        if buffer_secs < 0.0 {
            return Err(Error::Config(format!(
                "buffer_secs must not be negative (got {})",
                buffer_secs
            )));
        }

        Ok(Self {
            api_key,
            database_path,
            base_url: toml_config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            rate_limit,
            buffer_secs,
        })
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tzdb-import").join("config.toml"))
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tzdb-import"))
        .unwrap_or_else(|| PathBuf::from("./tzdb_data"))
        .join("tzdb.db")
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}
