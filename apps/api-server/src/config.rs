//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::database::{DatabaseConfig, MongoConfig, PostgresConfig};

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

/// Configuration errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown STORE_BACKEND {0:?} (expected mongodb, postgres or memory)")]
    UnknownBackend(String),

    #[error("STORE_BACKEND={backend} requires {variable} to be set")]
    MissingUrl {
        backend: &'static str,
        variable: &'static str,
    },

    #[error("no blog store configured: set MONGODB_URI or DATABASE_URL, or STORE_BACKEND=memory")]
    NoStore,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database: Self::database(&lookup)?,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        })
    }

    /// Pick the store backend. Without STORE_BACKEND the first configured URL
    /// wins, MongoDB before PostgreSQL. The in-memory store is only used when
    /// asked for by name.
    fn database<F>(lookup: &F) -> Result<DatabaseConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup("MONGODB_URI");
        let database_url = lookup("DATABASE_URL");

        let backend = match lookup("STORE_BACKEND") {
            Some(name) => name.to_lowercase(),
            None if mongo_uri.is_some() => "mongodb".to_string(),
            None if database_url.is_some() => "postgres".to_string(),
            None => return Err(ConfigError::NoStore),
        };

        match backend.as_str() {
            "mongodb" | "mongo" => {
                let uri = mongo_uri.ok_or(ConfigError::MissingUrl {
                    backend: "mongodb",
                    variable: "MONGODB_URI",
                })?;
                Ok(DatabaseConfig::MongoDb(MongoConfig {
                    uri,
                    database: lookup("MONGODB_DATABASE").unwrap_or_else(|| "blog".to_string()),
                    collection: lookup("MONGODB_COLLECTION")
                        .unwrap_or_else(|| "blogs".to_string()),
                }))
            }
            "postgres" | "postgresql" => {
                let url = database_url.ok_or(ConfigError::MissingUrl {
                    backend: "postgres",
                    variable: "DATABASE_URL",
                })?;
                Ok(DatabaseConfig::Postgres(PostgresConfig {
                    url,
                    max_connections: lookup("DB_MAX_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(100),
                    min_connections: lookup("DB_MIN_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(10),
                }))
            }
            "memory" => Ok(DatabaseConfig::Memory),
            _ => Err(ConfigError::UnknownBackend(backend)),
        }
    }
}
