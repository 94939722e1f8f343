//! Application configuration sourced from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `DB_USER` | `postgres` |
//! | `DB_PASSWORD` | `postgres` |
//! | `DB_ADDRESS` | `localhost` |
//! | `DB_PORT` | `5432` |
//! | `DB_NAME` | `clinic` |
//! | `DB_MAX_CONNECTIONS` | `5` |
//! | `JWT_SECRET` | required |

use std::env;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// PostgreSQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub address: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("address", &self.address)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

/// Everything the server needs at startup. Built once in `main` and handed
/// to the components that need it.
#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            server: ServerConfig {
                host: get("HOST", "0.0.0.0"),
                port: parse_number("PORT", get("PORT", "8080"))?,
            },
            database: DatabaseConfig {
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", "postgres"),
                address: get("DB_ADDRESS", "localhost"),
                port: parse_number("DB_PORT", get("DB_PORT", "5432"))?,
                name: get("DB_NAME", "clinic"),
                max_connections: parse_number(
                    "DB_MAX_CONNECTIONS",
                    get("DB_MAX_CONNECTIONS", "5"),
                )?,
            },
            jwt_secret,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
