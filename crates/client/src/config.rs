//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STYLEHUB_API_URL` - Base URL of the storefront REST API (http or https)
//!
//! ## Optional
//! - `STYLEHUB_LOGIN_PATH` - Login entry point used on forced logout (default: /login)
//! - `STYLEHUB_STATE_FILE` - Persisted session file (default: .stylehub/state.json)
//! - `STYLEHUB_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `STYLEHUB_CACHE_TTL_SECS` - Query cache time-to-live (default: 300)
//! - `STYLEHUB_CACHE_CAPACITY` - Query cache entry limit (default: 256)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_STATE_FILE: &str = ".stylehub/state.json";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "30";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_CACHE_CAPACITY: &str = "256";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub api_url: Url,
    /// Where the shopper is sent when the session cannot be recovered
    pub login_path: String,
    /// File backing the persisted session
    pub state_file: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Query cache time-to-live
    pub cache_ttl: Duration,
    /// Query cache entry limit
    pub cache_capacity: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Configuration for `api_url` with every optional setting at its default.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            http_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 256,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `STYLEHUB_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url("STYLEHUB_API_URL", &get_required_env("STYLEHUB_API_URL")?)?;
        let login_path = get_env_or_default("STYLEHUB_LOGIN_PATH", DEFAULT_LOGIN_PATH);
        let state_file = PathBuf::from(get_env_or_default("STYLEHUB_STATE_FILE", DEFAULT_STATE_FILE));
        let http_timeout = Duration::from_secs(parse_positive(
            "STYLEHUB_HTTP_TIMEOUT_SECS",
            &get_env_or_default("STYLEHUB_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        )?);
        let cache_ttl = Duration::from_secs(parse_positive(
            "STYLEHUB_CACHE_TTL_SECS",
            &get_env_or_default("STYLEHUB_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
        )?);
        let cache_capacity = parse_positive(
            "STYLEHUB_CACHE_CAPACITY",
            &get_env_or_default("STYLEHUB_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
        )?;

        Ok(Self {
            api_url,
            login_path,
            state_file,
            http_timeout,
            cache_ttl,
            cache_capacity,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the API base URL, accepting only http and https.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}' (expected http or https)"),
        )),
    }
}

/// Parse a strictly positive integer setting.
fn parse_positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let parsed = value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if parsed <= T::default() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_accepts_https() {
        let url = parse_api_url("TEST_URL", " https://api.stylehub.kr/api ").unwrap();
        assert_eq!(url.host_str(), Some("api.stylehub.kr"));
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        let err = parse_api_url("TEST_URL", "ftp://api.stylehub.kr").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TEST_URL"));
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(parse_api_url("TEST_URL", "not a url").is_err());
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive::<u64>("TEST_NUM", "30").unwrap(), 30);
        assert!(parse_positive::<u64>("TEST_NUM", "0").is_err());
        assert!(parse_positive::<u64>("TEST_NUM", "-5").is_err());
        assert!(parse_positive::<u64>("TEST_NUM", "soon").is_err());
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new(Url::parse("http://localhost:8080/api").unwrap());
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.state_file, PathBuf::from(".stylehub/state.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_capacity, 256);
        assert!(config.sentry_dsn.is_none());
    }
}
