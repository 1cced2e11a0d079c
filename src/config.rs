//! Process configuration, read once from the environment at startup and
//! passed into the services that need it.

use std::env;
use std::path::PathBuf;

/// Environment variable for the Postgres connection string
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Environment variable for the market data API base URL
pub const ENV_API_URL: &str = "COINGECKO_API_URL";

/// Environment variable for the market data API key
pub const ENV_API_KEY: &str = "COINGECKO_API_KEY";

/// Environment variable for the top-N snapshot bound
pub const ENV_TOP_LIMIT: &str = "TOP_LIMIT";

/// Environment variable for the chart look-back window in hours
pub const ENV_LOOKBACK_HOURS: &str = "LOOKBACK_HOURS";

/// Environment variable for the chart artifact path
pub const ENV_CHART_PATH: &str = "CHART_PATH";

/// Environment variable for the static-serving directory
pub const ENV_PUBLIC_DIR: &str = "PUBLIC_DIR";

/// Environment variable for the HTTP listen port
pub const ENV_PORT: &str = "PORT";

/// Environment variable for the scheduled run interval
pub const ENV_SYNC_INTERVAL: &str = "SYNC_INTERVAL_SECS";

const DEFAULT_TOP_LIMIT: usize = 100;
const DEFAULT_LOOKBACK_HOURS: i64 = 24;
const DEFAULT_CHART_PATH: &str = "token_price_chart.html";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 86400; // Every 24 hours

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_url: String,
    pub api_key: String,
    pub top_limit: usize,
    pub lookback_hours: i64,
    pub chart_path: PathBuf,
    pub public_dir: PathBuf,
    pub port: u16,
    pub sync_interval_secs: u64,
}

impl Config {
    /// Read configuration from the environment. Missing required variables
    /// abort startup; optional ones fall back to their defaults.
    pub fn from_env() -> Self {
        let database_url =
            env::var(ENV_DATABASE_URL).expect("DATABASE_URL must be set");
        let api_url = env::var(ENV_API_URL).expect("COINGECKO_API_URL must be set");
        let api_key = env::var(ENV_API_KEY).expect("COINGECKO_API_KEY must be set");

        let top_limit = env::var(ENV_TOP_LIMIT)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOP_LIMIT);

        let lookback_hours = env::var(ENV_LOOKBACK_HOURS)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_LOOKBACK_HOURS);

        let chart_path = env::var(ENV_CHART_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CHART_PATH));

        let public_dir = env::var(ENV_PUBLIC_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_DIR));

        let port = env::var(ENV_PORT)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let sync_interval_secs = env::var(ENV_SYNC_INTERVAL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS);

        Self {
            database_url,
            api_url,
            api_key,
            top_limit,
            lookback_hours,
            chart_path,
            public_dir,
            port,
            sync_interval_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_names() {
        assert_eq!(ENV_DATABASE_URL, "DATABASE_URL");
        assert_eq!(ENV_API_URL, "COINGECKO_API_URL");
        assert_eq!(ENV_API_KEY, "COINGECKO_API_KEY");
        assert_eq!(ENV_SYNC_INTERVAL, "SYNC_INTERVAL_SECS");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_TOP_LIMIT, 100);
        assert_eq!(DEFAULT_LOOKBACK_HOURS, 24);
        assert_eq!(DEFAULT_SYNC_INTERVAL_SECS, 86400);
    }
}
