// Configuration module
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Main gateway configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub limits: LimitsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of HTTP workers. 0 means one per CPU core.
    #[serde(default)]
    pub workers: usize,
}

/// Connection settings for the external relational store.
///
/// Credentials can be overridden via `DATABASE_*` environment variables so
/// the password never has to live in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_name")]
    pub database: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Resource limits applied to every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSettings {
    /// Hard cap on materialized rows per query, regardless of the SQL text.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Client-side execution budget. Also set server-side on each
    /// connection as `statement_timeout`.
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
    /// How long a request may wait for a pooled connection.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    /// Upper bound for the `page_size` parameter of the table listing.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Per-target level overrides, e.g. `"sqlx" = "debug"`.
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_db_host() -> String {
    "localhost".to_string()
}
fn default_db_port() -> u16 {
    5432
}
fn default_db_name() -> String {
    "postgres".to_string()
}
fn default_db_user() -> String {
    "postgres".to_string()
}
fn default_min_connections() -> u32 {
    2
}
fn default_max_connections() -> u32 {
    10
}
fn default_max_rows() -> usize {
    5000
}
fn default_statement_timeout_ms() -> u64 {
    30_000
}
fn default_acquire_timeout_ms() -> u64 {
    5_000
}
fn default_max_page_size() -> u32 {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> String {
    "logs/gateway.log".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            database: default_db_name(),
            user: default_db_user(),
            password: String::new(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            statement_timeout_ms: default_statement_timeout_ms(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file(),
            log_to_console: default_true(),
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: GatewayConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from file when present, otherwise fall back to defaults.
    /// `DATABASE_*` environment overrides are applied in both cases.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            GatewayConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override database connection settings from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = env::var("DATABASE_HOST") {
            self.database.host = host;
        }
        if let Ok(port) = env::var("DATABASE_PORT") {
            if let Ok(port) = port.parse() {
                self.database.port = port;
            }
        }
        if let Ok(name) = env::var("DATABASE_NAME") {
            self.database.database = name;
        }
        if let Ok(user) = env::var("DATABASE_USER") {
            self.database.user = user;
        }
        if let Ok(password) = env::var("DATABASE_PASSWORD") {
            self.database.password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.limits.max_rows, 5000);
        assert_eq!(config.limits.max_page_size, 100);
        assert_eq!(config.limits.statement_timeout_ms, 30_000);
    }

    #[test]
    fn parses_partial_toml() {
        let toml = r#"
            [server]
            port = 9090

            [database]
            host = "db.internal"
            database = "warehouse"

            [limits]
            max_rows = 250
        "#;
        let config: GatewayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.database, "warehouse");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.limits.max_rows, 250);
        assert_eq!(config.limits.max_page_size, 100);
    }

    #[test]
    fn parses_empty_toml() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }
}
