//! Report service configuration from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Configuration for the report server
///
/// Loaded from environment variables (a `.env` file is honoured by the
/// binaries through `dotenv`).
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// Path to the authors store (users, post, blog)
    pub authors_db_path: PathBuf,

    /// Path to the logs store (logs, space_type, event_type)
    pub logs_db_path: PathBuf,

    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,

    /// How long a store read waits on a locked database
    pub store_busy_timeout: Duration,

    /// Upper bound for a whole report request
    pub request_timeout: Duration,
}

impl ReportsConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `AUTHORS_DB_PATH` (required)
    /// - `LOGS_DB_PATH` (required)
    /// - `REPORTS_LISTEN_ADDR` (default: 127.0.0.1:8000)
    /// - `STORE_BUSY_TIMEOUT_MS` (default: 5000)
    /// - `REQUEST_TIMEOUT_MS` (default: 30000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let authors_db_path = required_var("AUTHORS_DB_PATH")?.into();
        let logs_db_path = required_var("LOGS_DB_PATH")?.into();

        let listen_addr = env::var("REPORTS_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        let listen_addr = listen_addr.parse::<SocketAddr>().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "REPORTS_LISTEN_ADDR must be host:port, got '{}'",
                listen_addr
            ))
        })?;

        let store_busy_timeout = Duration::from_millis(millis_var("STORE_BUSY_TIMEOUT_MS", 5_000)?);
        let request_timeout = Duration::from_millis(millis_var("REQUEST_TIMEOUT_MS", 30_000)?);

        Ok(Self {
            authors_db_path,
            logs_db_path,
            listen_addr,
            store_busy_timeout,
            request_timeout,
        })
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVariable(name.to_string())),
    }
}

fn millis_var(name: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(format!("{} must be milliseconds, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-wide environment is not raced by parallel tests
    #[test]
    fn test_config_from_env() {
        env::remove_var("AUTHORS_DB_PATH");
        env::set_var("LOGS_DB_PATH", "/tmp/logs.db");
        assert!(matches!(
            ReportsConfig::from_env(),
            Err(ConfigError::MissingVariable(ref v)) if v == "AUTHORS_DB_PATH"
        ));

        // Defaults
        env::set_var("AUTHORS_DB_PATH", "/tmp/authors.db");
        env::remove_var("REPORTS_LISTEN_ADDR");
        env::remove_var("STORE_BUSY_TIMEOUT_MS");
        env::remove_var("REQUEST_TIMEOUT_MS");

        let config = ReportsConfig::from_env().unwrap();
        assert_eq!(config.authors_db_path, PathBuf::from("/tmp/authors.db"));
        assert_eq!(config.logs_db_path, PathBuf::from("/tmp/logs.db"));
        assert_eq!(config.listen_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.store_busy_timeout, Duration::from_millis(5_000));
        assert_eq!(config.request_timeout, Duration::from_millis(30_000));

        // Custom values
        env::set_var("REPORTS_LISTEN_ADDR", "0.0.0.0:9100");
        env::set_var("STORE_BUSY_TIMEOUT_MS", "250");
        env::set_var("REQUEST_TIMEOUT_MS", "1500");

        let config = ReportsConfig::from_env().unwrap();
        assert_eq!(config.listen_addr.port(), 9100);
        assert_eq!(config.store_busy_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_millis(1_500));

        // Invalid values
        env::set_var("REQUEST_TIMEOUT_MS", "soon");
        assert!(matches!(
            ReportsConfig::from_env(),
            Err(ConfigError::InvalidValue(_))
        ));
        env::set_var("REQUEST_TIMEOUT_MS", "1500");
        env::set_var("REPORTS_LISTEN_ADDR", "localhost");
        assert!(matches!(
            ReportsConfig::from_env(),
            Err(ConfigError::InvalidValue(_))
        ));

        // Cleanup
        env::remove_var("AUTHORS_DB_PATH");
        env::remove_var("LOGS_DB_PATH");
        env::remove_var("REPORTS_LISTEN_ADDR");
        env::remove_var("STORE_BUSY_TIMEOUT_MS");
        env::remove_var("REQUEST_TIMEOUT_MS");
    }
}
