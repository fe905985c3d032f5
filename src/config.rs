use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::domain::{TransactionDefaults, TransactionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_format: LogFormat,
    pub log_request_body: bool,
    pub cors_allowed_origins: Vec<String>,
    pub transaction_defaults: TransactionDefaults,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend: StoreBackend = lookup("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse()?;

        let database_url = match (store_backend, lookup("DATABASE_URL")) {
            (_, Some(url)) => url,
            (StoreBackend::Memory, None) => String::new(),
            (StoreBackend::Postgres, None) => {
                anyhow::bail!("DATABASE_URL must be set when STORE_BACKEND=postgres")
            }
        };

        let default_status: TransactionStatus = lookup("DEFAULT_TRANSACTION_STATUS")
            .unwrap_or_else(|| TransactionStatus::Completed.to_string())
            .parse()
            .context("DEFAULT_TRANSACTION_STATUS is not a valid status")?;

        let stamp_transaction_date: bool = lookup("STAMP_TRANSACTION_DATE")
            .unwrap_or_else(|| "true".to_string())
            .parse()
            .context("STAMP_TRANSACTION_DATE must be true or false")?;

        Ok(Config {
            server_port: lookup("SERVER_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            store_backend,
            database_url,
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "pretty".to_string())
                .parse()?,
            log_request_body: lookup("LOG_REQUEST_BODY")
                .map(|v| v.parse::<bool>().unwrap_or(false))
                .unwrap_or(false),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            transaction_defaults: TransactionDefaults {
                status: default_status,
                stamp_transaction_date,
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/ledger")])).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.log_request_body);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.transaction_defaults, TransactionDefaults::default());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_memory_backend_without_database_url() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("SERVER_PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("LOG_REQUEST_BODY", "true"),
            ("DEFAULT_TRANSACTION_STATUS", "pending"),
            ("STAMP_TRANSACTION_DATE", "false"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173, ,https://ledger.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.log_request_body);
        assert_eq!(config.transaction_defaults.status, TransactionStatus::Pending);
        assert!(!config.transaction_defaults.stamp_transaction_date);
        assert!(config.database_url.is_empty());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://ledger.example.com"]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let base = [("STORE_BACKEND", "memory")];
        for (key, value) in [
            ("SERVER_PORT", "not-a-port"),
            ("STORE_BACKEND", "redis"),
            ("LOG_FORMAT", "xml"),
            ("DEFAULT_TRANSACTION_STATUS", "CANCELLED"),
            ("STAMP_TRANSACTION_DATE", "sometimes"),
        ] {
            let mut pairs = base.to_vec();
            pairs.push((key, value));
            assert!(Config::from_lookup(lookup(&pairs)).is_err(), "{key}={value}");
        }
    }
}
