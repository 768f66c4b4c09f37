//! Configuration file
//!
//! A JSON object; every field is optional:
//!
//! ```json
//! {
//!   "data_dir": "./primdb_data",
//!   "query_cache_enabled": true,
//!   "query_cache_max_entries": 1000,
//!   "log_level": "warn",
//!   "confirm_destructive": true
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::QueryCacheConfig;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

use super::errors::{CliError, CliResult};

/// Config path used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./primdb.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding db_meta.json and data/
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Memoize select results
    #[serde(default = "default_true")]
    pub query_cache_enabled: bool,

    /// Maximum cached select results
    #[serde(default = "default_query_cache_max_entries")]
    pub query_cache_max_entries: usize,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Ask before drop_table and delete
    #[serde(default = "default_true")]
    pub confirm_destructive: bool,
}

fn default_data_dir() -> String {
    "./primdb_data".to_string()
}
fn default_true() -> bool {
    true
}
fn default_query_cache_max_entries() -> usize {
    1000
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            query_cache_enabled: true,
            query_cache_max_entries: default_query_cache_max_entries(),
            log_level: default_log_level(),
            confirm_destructive: true,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {:?}: {}", path, e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolves the configuration for a command.
    ///
    /// An explicit path must exist. Without one, `./primdb.json` is used if
    /// present, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        Logger::set_min_severity(config.severity()?);
        log_event_with_fields(Event::ConfigLoaded, &[("data_dir", config.data_dir.as_str())]);
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::from_name(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn cache_config(&self) -> QueryCacheConfig {
        if self.query_cache_enabled {
            QueryCacheConfig {
                enabled: true,
                max_entries: self.query_cache_max_entries,
            }
        } else {
            QueryCacheConfig::disabled()
        }
    }
}
