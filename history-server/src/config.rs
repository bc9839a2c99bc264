//! Server configuration
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `HISTORY__`-prefixed environment variables (`HISTORY__SERVER__PORT=9000`,
//! `HISTORY__DATABASE__URL=postgres://...`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Origins allowed by CORS; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Tracker History API".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; without one the server runs on empty in-memory stores
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret bearer tokens are signed with; without one every bearer
    /// token is rejected and callers are served anonymously
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 30,
            max_page_size: 1000,
        }
    }
}

impl HistoryConfig {
    /// Load configuration from `path` (if it exists) and the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or a value has the
    /// wrong type.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::new(path, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix("HISTORY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a YAML string, without the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}
