//! Centralized configuration for api-server.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than at request time.

use axum::http::HeaderValue;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Where employee records are kept, selected by `STORAGE_PROVIDER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// Process-local map; every employee and the id counter reset on restart.
    Memory,
    /// SQLite file at `DB_PATH`; employees and ids survive restarts.
    Sqlite,
}

impl StorageProvider {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("sqlite") {
            Self::Sqlite
        } else {
            Self::Memory
        }
    }
}

/// Shape of the stdout log lines, selected by `LOG_FORMAT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// A rejected environment variable and why it was rejected.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Server configuration loaded from environment variables.
///
/// All fields are validated at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 3001)
    pub port: u16,
    /// CORS allow origin
    pub cors_allow_origin: HeaderValue,
    /// Storage provider
    pub storage_provider: StorageProvider,
    /// SQLite database path (when using sqlite storage)
    pub db_path: PathBuf,
    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Fails fast on invalid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 3001,
        };

        let cors_origin_str = env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".into());
        let cors_allow_origin = parse_cors_origin(&cors_origin_str)?;

        let storage_provider = StorageProvider::from_str(
            &env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "sqlite".into()),
        );

        let db_path = env::var("DB_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/employees.db"));

        let log_format =
            LogFormat::from_str(&env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".into()));

        Ok(Self {
            port,
            cors_allow_origin,
            storage_provider,
            db_path,
            log_format,
        })
    }

    /// Log warnings about configurations that are easy to get wrong.
    pub fn warn_if_volatile(&self) {
        if self.storage_provider == StorageProvider::Memory {
            tracing::warn!(
                "STORAGE_PROVIDER=memory: employees are kept in memory and lost on restart."
            );
        }
        if cfg!(not(feature = "sqlite")) && self.storage_provider == StorageProvider::Sqlite {
            tracing::warn!(
                "STORAGE_PROVIDER=sqlite requested but the `sqlite` feature is disabled; \
                 falling back to in-memory storage."
            );
        }
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError {
        field: "PORT",
        message: format!("Invalid port '{}': {}", raw, e),
    })
}

fn parse_cors_origin(raw: &str) -> Result<HeaderValue, ConfigError> {
    if raw == "*" {
        return Ok(HeaderValue::from_static("*"));
    }
    HeaderValue::from_str(raw).map_err(|e| ConfigError {
        field: "CORS_ALLOW_ORIGIN",
        message: format!("Invalid header value '{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_provider_parsing() {
        assert_eq!(StorageProvider::from_str("memory"), StorageProvider::Memory);
        assert_eq!(StorageProvider::from_str("sqlite"), StorageProvider::Sqlite);
        assert_eq!(StorageProvider::from_str("SQLITE"), StorageProvider::Sqlite);
        assert_eq!(StorageProvider::from_str("anything"), StorageProvider::Memory);
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::from_str("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str("anything"), LogFormat::Pretty);
    }

    #[test]
    fn port_parsing() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port(" 3001 ").unwrap(), 3001);
        let err = parse_port("eighty").unwrap_err();
        assert_eq!(err.field, "PORT");
        assert!(parse_port("70000").is_err());
    }

    #[test]
    fn cors_origin_parsing() {
        assert_eq!(parse_cors_origin("*").unwrap(), "*");
        assert_eq!(
            parse_cors_origin("https://admin.example.com").unwrap(),
            "https://admin.example.com"
        );
        let err = parse_cors_origin("bad\norigin").unwrap_err();
        assert_eq!(err.field, "CORS_ALLOW_ORIGIN");
    }
}
