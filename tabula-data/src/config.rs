//! Data-layer configuration loaded from YAML, `.env` files and environment variables.
//!
//! Resolution order (lowest to highest priority):
//! 1. the YAML file passed to [`DataConfig::load`] (skipped when absent)
//! 2. `.env` file (loaded into the process environment, never overwriting)
//! 3. `TABULA_*` environment variables
//!
//! ```yaml
//! datasource:
//!   url: "postgres://app@localhost/app"
//!   max_connections: 8
//! sql:
//!   dialect: postgres
//!   identifier_policy: quote
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sql::{AnsiSqlGenerator, Dialect, IdentifierPolicy};

pub const ENV_DATASOURCE_URL: &str = "TABULA_DATASOURCE_URL";
pub const ENV_DATASOURCE_MAX_CONNECTIONS: &str = "TABULA_DATASOURCE_MAX_CONNECTIONS";
pub const ENV_SQL_DIALECT: &str = "TABULA_SQL_DIALECT";
pub const ENV_SQL_IDENTIFIER_POLICY: &str = "TABULA_SQL_IDENTIFIER_POLICY";

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading the config file.
    Load(String),
    /// A value was present but could not be interpreted.
    Invalid { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_max_connections() -> u32 {
    1
}

/// Connection settings consumed by executor backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// SQL generation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlConfig {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub identifier_policy: IdentifierPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub datasource: DataSourceConfig,
    #[serde(default)]
    pub sql: SqlConfig,
}

impl DataConfig {
    /// Parse a YAML document (no environment overlay; useful for testing).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.datasource.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "datasource.max_connections".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    /// Load `path` if it exists, then `.env`, then overlay `TABULA_*` variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
            Self::from_yaml_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        // .env never overwrites variables that are already set
        let _ = dotenvy::dotenv();

        config.apply_env()?;
        Ok(config)
    }

    /// Overlay `TABULA_*` environment variables onto this config.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(ENV_DATASOURCE_URL) {
            self.datasource.url = url;
        }
        if let Ok(raw) = std::env::var(ENV_DATASOURCE_MAX_CONNECTIONS) {
            self.datasource.max_connections = raw
                .trim()
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: ENV_DATASOURCE_MAX_CONNECTIONS.to_string(),
                    message: format!("'{raw}' is not a positive integer"),
                })?;
        }
        if let Ok(raw) = std::env::var(ENV_SQL_DIALECT) {
            self.sql.dialect = raw.parse().map_err(|message| ConfigError::Invalid {
                key: ENV_SQL_DIALECT.to_string(),
                message,
            })?;
        }
        if let Ok(raw) = std::env::var(ENV_SQL_IDENTIFIER_POLICY) {
            self.sql.identifier_policy = raw.parse().map_err(|message| ConfigError::Invalid {
                key: ENV_SQL_IDENTIFIER_POLICY.to_string(),
                message,
            })?;
        }
        Ok(())
    }
}

impl AnsiSqlGenerator {
    pub fn from_config(config: &SqlConfig) -> Self {
        AnsiSqlGenerator::new(config.dialect).identifier_policy(config.identifier_policy)
    }
}
