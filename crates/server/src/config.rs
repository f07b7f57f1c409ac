//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `HANDYCRAFT_HOST` - Bind address (default: 127.0.0.1)
//! - `HANDYCRAFT_PORT` - Listen port (default: 8000)
//! - `HANDYCRAFT_DATA_DIR` - Directory holding the JSON data files (default: data)
//! - `HANDYCRAFT_STATIC_DIR` - Directory served at `/` (default: static)
//! - `HANDYCRAFT_WORKER_THREADS` - Tokio worker threads (default: 10)
//! - `HANDYCRAFT_PROTECTED_USERNAME` - Super-admin account exempt from role
//!   changes and self-service recovery (default: David Lee)
//! - `HANDYCRAFT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding `users.json`, `products.json` and friends
    pub data_dir: PathBuf,
    /// Directory of static assets
    pub static_dir: PathBuf,
    /// Tokio worker thread count
    pub worker_threads: usize,
    /// Username of the protected super-admin account
    pub protected_username: String,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            worker_threads: 10,
            protected_username: "David Lee".to_owned(),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let worker_threads: usize =
            parse_or(&lookup, "HANDYCRAFT_WORKER_THREADS", defaults.worker_threads)?;
        if worker_threads == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "HANDYCRAFT_WORKER_THREADS".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            host: parse_or(&lookup, "HANDYCRAFT_HOST", defaults.host)?,
            port: parse_or(&lookup, "HANDYCRAFT_PORT", defaults.port)?,
            data_dir: get_optional(&lookup, "HANDYCRAFT_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
            static_dir: get_optional(&lookup, "HANDYCRAFT_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            worker_threads,
            protected_username: get_optional(&lookup, "HANDYCRAFT_PROTECTED_USERNAME")
                .unwrap_or(defaults.protected_username),
            log_format: parse_or(&lookup, "HANDYCRAFT_LOG_FORMAT", defaults.log_format)?,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional(lookup, key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.worker_threads, 10);
        assert_eq!(config.protected_username, "David Lee");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HANDYCRAFT_HOST", "0.0.0.0"),
            ("HANDYCRAFT_PORT", "9090"),
            ("HANDYCRAFT_DATA_DIR", "/var/lib/handycraft"),
            ("HANDYCRAFT_WORKER_THREADS", "4"),
            ("HANDYCRAFT_LOG_FORMAT", "JSON"),
            ("SENTRY_DSN", "  "),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9090");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/handycraft"));
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("HANDYCRAFT_PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "HANDYCRAFT_PORT"
        ));
        assert!(load(&[("HANDYCRAFT_HOST", "localhost:80")]).is_err());
        assert!(load(&[("HANDYCRAFT_WORKER_THREADS", "0")]).is_err());
        assert!(load(&[("HANDYCRAFT_LOG_FORMAT", "xml")]).is_err());
    }
}
