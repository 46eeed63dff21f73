//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use domain::PriceFallbackPolicy;
use pricing::CatalogConfig;
use thiserror::Error;

/// A variable is set but its value cannot be used.
#[derive(Debug, Error)]
#[error("invalid value for {var}: {value:?} ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8003`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — PostgreSQL connection string; unset keeps orders in memory
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `10`)
/// - `DATABASE_ACQUIRE_TIMEOUT_MS` — pool acquisition timeout (default: `5000`)
/// - `RUN_MIGRATIONS` — apply schema migrations at startup (default: `true`)
/// - `CATALOG_SERVICE_URL` — catalog base URL (default: `"http://product-service:8002"`)
/// - `CATALOG_TIMEOUT_MS` — per-lookup timeout (default: `2000`)
/// - `PRICE_FALLBACK` — `require-client-price` (default) or `client-or-zero`
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub run_migrations: bool,
    pub catalog_service_url: String,
    pub catalog_timeout: Duration,
    pub price_fallback: PriceFallbackPolicy,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse(&var, "PORT", defaults.port)?,
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: var("DATABASE_URL"),
            database_max_connections: parse(
                &var,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            database_acquire_timeout: Duration::from_millis(parse(
                &var,
                "DATABASE_ACQUIRE_TIMEOUT_MS",
                millis(defaults.database_acquire_timeout),
            )?),
            run_migrations: match var("RUN_MIGRATIONS") {
                Some(value) => parse_bool("RUN_MIGRATIONS", &value)?,
                None => defaults.run_migrations,
            },
            catalog_service_url: var("CATALOG_SERVICE_URL")
                .unwrap_or(defaults.catalog_service_url),
            catalog_timeout: Duration::from_millis(parse(
                &var,
                "CATALOG_TIMEOUT_MS",
                millis(defaults.catalog_timeout),
            )?),
            price_fallback: parse(&var, "PRICE_FALLBACK", defaults.price_fallback)?,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the catalog client settings.
    pub fn catalog(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog_service_url.clone(),
            timeout: self.catalog_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: 10,
            database_acquire_timeout: Duration::from_millis(5000),
            run_migrations: true,
            catalog_service_url: "http://product-service:8002".to_string(),
            catalog_timeout: Duration::from_millis(2000),
            price_fallback: PriceFallbackPolicy::default(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            var: name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var: name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
