//! Server configuration
//!
//! Resolved in three layers: built-in defaults, an optional TOML file named
//! by `ITEMBOOK_CONFIG`, then individual environment overrides.
//!
//! ```toml
//! addr = "0.0.0.0:5000"
//! database = "/var/lib/itembook/data.db"
//! log_filter = "itembook_server=debug,tower_http=info"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ServerError;

pub const CONFIG_ENV: &str = "ITEMBOOK_CONFIG";
pub const ADDR_ENV: &str = "ITEMBOOK_ADDR";
pub const DATABASE_ENV: &str = "ITEMBOOK_DATABASE";
pub const LOG_ENV: &str = "ITEMBOOK_LOG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub addr: String,
    /// SQLite database file
    pub database: PathBuf,
    /// `tracing-subscriber` env-filter directive
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
            database: PathBuf::from("data.db"),
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ServerError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| ServerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get(ADDR_ENV) {
            self.addr = addr;
        }
        if let Some(database) = get(DATABASE_ENV) {
            self.database = PathBuf::from(database);
        }
        if let Some(filter) = get(LOG_ENV) {
            self.log_filter = filter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:5000");
        assert_eq!(config.database, PathBuf::from("data.db"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str("addr = \"0.0.0.0:8080\"").unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.database, PathBuf::from("data.db"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = ServerConfig::from_toml_str("addr = 5").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let err = ServerConfig::from_toml_str("port = 80").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ADDR_ENV, "10.0.0.1:9000"),
            (DATABASE_ENV, "/tmp/items.db"),
            (LOG_ENV, ""),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.addr, "10.0.0.1:9000");
        assert_eq!(config.database, PathBuf::from("/tmp/items.db"));
        assert_eq!(config.log_filter, "info");
    }
}
