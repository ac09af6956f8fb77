//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use monitor_core::DEFAULT_GEOCODER_URL;

/// Parent dashboard server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Signed-in parent account.
    pub parent_id: String,
    /// Assistant endpoint.
    pub assistant_url: String,
    /// Assistant request timeout.
    pub assistant_timeout: Duration,
    /// Reverse geocoding service base URL.
    pub geocoder_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PARENT_WEB_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:dashboard.db?mode=rwc` |
    /// | `PARENT_ID` | Signed-in parent account | (required) |
    /// | `ASSISTANT_URL` | Assistant endpoint | `http://127.0.0.1:8790/ask` |
    /// | `ASSISTANT_TIMEOUT_SECS` | Assistant request timeout | `30` |
    /// | `GEOCODER_URL` | Reverse geocoder base URL | `https://nominatim.openstreetmap.org` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("PARENT_WEB_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            lookup("SQLITE_PATH").unwrap_or_else(|| "sqlite:dashboard.db?mode=rwc".to_string());

        let parent_id = lookup("PARENT_ID")
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingParentId)?;

        let assistant_url =
            lookup("ASSISTANT_URL").unwrap_or_else(|| "http://127.0.0.1:8790/ask".to_string());

        let assistant_timeout = match lookup("ASSISTANT_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout(value))?,
            None => Duration::from_secs(30),
        };

        let geocoder_url = lookup("GEOCODER_URL").unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());

        Ok(Self {
            addr,
            database_url,
            parent_id,
            assistant_url,
            assistant_timeout,
            geocoder_url,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PARENT_WEB_ADDR format")]
    InvalidAddr,

    #[error("PARENT_ID environment variable is required")]
    MissingParentId,

    #[error("Invalid ASSISTANT_TIMEOUT_SECS value: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("PARENT_ID", "p1")]).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8788");
        assert_eq!(config.parent_id, "p1");
        assert_eq!(config.assistant_timeout, Duration::from_secs(30));
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
    }

    #[test]
    fn test_parent_id_required() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingParentId)));
        assert!(matches!(
            load(&[("PARENT_ID", "  ")]),
            Err(ConfigError::MissingParentId)
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PARENT_ID", "p1"), ("PARENT_WEB_ADDR", "nowhere")]),
            Err(ConfigError::InvalidAddr)
        ));
        assert!(matches!(
            load(&[("PARENT_ID", "p1"), ("ASSISTANT_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
