//! Centralized configuration (environment variables + defaults).
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `VISIT_STORE` | `sqlite` | `memory`, `sqlite` or `postgres` |
//! | `SQLITE_PATH` | `data/atendimentos.db` | `:memory:` allowed |
//! | `DATABASE_URL` | | required for `postgres` |
//! | `DB_MAX_CONNECTIONS` | `5` | |
//! | `BIND_ADDR` | `0.0.0.0:3000` | |
//! | `LOG_LEVEL` | `info` | overridden by `RUST_LOG` |
//! | `APP_ENV` | `development` | `production` hides internal error detail |
//! | `SEED_SAMPLE_DATA` | `true` outside production | |

use crate::error::ConfigError;
use std::fmt;
use std::net::SocketAddr;

pub const DEFAULT_SQLITE_PATH: &str = "data/atendimentos.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which backing store to open at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite { path: String, max_connections: u32 },
    Postgres { url: String, max_connections: u32 },
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite { path, .. } => write!(f, "sqlite ({})", path),
            // The URL may carry credentials.
            StoreBackend::Postgres { .. } => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub production: bool,
    pub seed_sample_data: bool,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let production = get("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    name: "DB_MAX_CONNECTIONS",
                    value: raw,
                    reason: "expected a positive integer".to_string(),
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let kind = get("VISIT_STORE").unwrap_or_else(|| "sqlite".to_string());
        let store = match kind.to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "sqlite" => StoreBackend::Sqlite {
                path: get("SQLITE_PATH").unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string()),
                max_connections,
            },
            "postgres" | "postgresql" => StoreBackend::Postgres {
                url: get("DATABASE_URL").ok_or(ConfigError::Missing {
                    name: "DATABASE_URL",
                })?,
                max_connections,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    name: "VISIT_STORE",
                    value: kind,
                    reason: "expected memory, sqlite or postgres".to_string(),
                })
            }
        };

        let raw_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let seed_sample_data = match get("SEED_SAMPLE_DATA") {
            Some(raw) => parse_bool("SEED_SAMPLE_DATA", raw)?,
            None => !production,
        };

        Ok(Self {
            store,
            bind_addr,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            production,
            seed_sample_data,
        })
    }
}

fn parse_bool(name: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected true or false".to_string(),
        }),
    }
}
