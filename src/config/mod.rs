//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address to bind
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite connection string for the pre-populated catalog
    pub database_url: String,

    /// Upper bound on pooled store connections
    pub database_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .context("DATABASE_URL is required")?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite://catalog.db")]).unwrap();

        assert_eq!(
            config,
            Config {
                host: "0.0.0.0".to_string(),
                port: 8000,
                database_url: "sqlite://catalog.db".to_string(),
                database_max_connections: 10,
            }
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "sqlite://catalog.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
        ])
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_max_connections, 3);
    }

    #[test]
    fn test_database_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_URL is required");

        assert!(load(&[("DATABASE_URL", "")]).is_err());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DATABASE_URL", "sqlite://catalog.db"), ("PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid PORT");
    }
}
