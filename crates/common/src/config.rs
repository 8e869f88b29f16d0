use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// All configuration loaded from environment variables at startup.
/// Every variable is optional; malformed values are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // HTTP server
    pub port: u16,

    // Strategy config file path. Built-in strategies are used when unset.
    pub strategy_config_path: Option<String>,

    // Market data
    pub market_data_base_url: String,
    pub market_data_timeout: Duration,

    // Scanning
    pub scan_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            strategy_config_path: None,
            market_data_base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            market_data_timeout: Duration::from_secs(10),
            scan_concurrency: 1,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let scan_concurrency = parse_or("SCAN_CONCURRENCY", &lookup, defaults.scan_concurrency)?;
        if scan_concurrency == 0 {
            return Err(Error::Config("SCAN_CONCURRENCY must be at least 1".into()));
        }

        Ok(Config {
            port: parse_or("SCANNER_PORT", &lookup, defaults.port)?,
            strategy_config_path: lookup("STRATEGY_CONFIG_PATH").filter(|p| !p.trim().is_empty()),
            market_data_base_url: lookup("MARKET_DATA_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.market_data_base_url),
            market_data_timeout: Duration::from_secs(parse_or(
                "MARKET_DATA_TIMEOUT_SECS",
                &lookup,
                defaults.market_data_timeout.as_secs(),
            )?),
            scan_concurrency,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::Config(format!("{key} has an invalid value: '{}'", raw.trim()))
        }),
    }
}
