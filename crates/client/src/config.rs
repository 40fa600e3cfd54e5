//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `WONDERLAND_API_URL` - REST API base URL (default: `http://localhost:8000/api`)
//! - `WONDERLAND_DATA_DIR` - Where the session token and CLI cart live
//!   (default: the platform data directory + `wonderland`)
//! - `WONDERLAND_PRODUCT_TTL_SECS` - Catalog freshness window (default: 60)
//! - `WONDERLAND_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_PRODUCT_TTL_SECS: &str = "60";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "15";
const SESSION_FILE: &str = "session.json";
const CART_FILE: &str = "cart.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set WONDERLAND_DATA_DIR")]
    NoDataDir,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API base URL, always ending in `/`
    pub api_url: Url,
    /// Directory for durable client state
    pub data_dir: PathBuf,
    /// How long a catalog fetch stays fresh
    pub product_ttl: Duration,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_url = parse_base_url(&get_or("WONDERLAND_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("WONDERLAND_API_URL".to_string(), e))?;

        let data_dir = match lookup("WONDERLAND_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("wonderland"),
        };

        let product_ttl = parse_secs(
            "WONDERLAND_PRODUCT_TTL_SECS",
            &get_or("WONDERLAND_PRODUCT_TTL_SECS", DEFAULT_PRODUCT_TTL_SECS),
        )?;
        let http_timeout = parse_secs(
            "WONDERLAND_HTTP_TIMEOUT_SECS",
            &get_or("WONDERLAND_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        )?;

        Ok(Self {
            api_url,
            data_dir,
            product_ttl,
            http_timeout,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }

    /// Configuration pointing at `api_url` with state kept in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn for_base_url(api_url: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        Self::from_lookup(|key| match key {
            "WONDERLAND_API_URL" => Some(api_url.to_string()),
            "WONDERLAND_DATA_DIR" => Some(data_dir.display().to_string()),
            _ => None,
        })
    }

    /// File holding the persisted bearer token.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// File holding the command-line cart between invocations.
    #[must_use]
    pub fn cart_file(&self) -> PathBuf {
        self.data_dir.join(CART_FILE)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL and make sure relative joins append to its path.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a whole number of seconds.
fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("WONDERLAND_DATA_DIR", "/tmp/wl")]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/api/");
        assert_eq!(config.product_ttl, Duration::from_secs(60));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.session_file(), PathBuf::from("/tmp/wl/session.json"));
        assert_eq!(config.cart_file(), PathBuf::from("/tmp/wl/cart.json"));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = config_from(&[
            ("WONDERLAND_API_URL", "https://toys.example.pk/api/v1"),
            ("WONDERLAND_DATA_DIR", "/tmp/wl"),
        ])
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://toys.example.pk/api/v1/");
        assert_eq!(
            config.api_url.join("products/7").unwrap().as_str(),
            "https://toys.example.pk/api/v1/products/7"
        );
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config_from(&[
            ("WONDERLAND_API_URL", "ftp://toys.example.pk"),
            ("WONDERLAND_DATA_DIR", "/tmp/wl"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "WONDERLAND_API_URL"));

        let err = config_from(&[
            ("WONDERLAND_PRODUCT_TTL_SECS", "soon"),
            ("WONDERLAND_DATA_DIR", "/tmp/wl"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("WONDERLAND_PRODUCT_TTL_SECS"));
    }

    #[test]
    fn test_empty_sentry_dsn_is_ignored() {
        let config = config_from(&[("SENTRY_DSN", ""), ("WONDERLAND_DATA_DIR", "/tmp/wl")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_for_base_url() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9000", "/tmp/wl").unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wl"));
    }
}
