//! # API Configuration Module
//!
//! Loads server settings from environment variables, with defaults where a
//! sensible one exists.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SESSION_TTL_DAYS`: Lifetime of a login session (default: 30)
//! - `DB_MAX_CONNECTIONS`: Size of the connection pool (default: 5)

use std::env;

use eyre::{Result, WrapErr};
use tracing::Level;

/// Configuration for the CourseTrack API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Session lifetime in days
    pub session_ttl_days: i64,

    /// Maximum number of pooled database connections
    pub db_max_connections: u32,
}

fn parse_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_origins(value: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!origins.is_empty()).then_some(origins)
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// - `DATABASE_URL` is not set
    /// - a numeric setting cannot be parsed, or the session TTL is not positive
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = var_or("API_HOST", "0.0.0.0");
        let port = var_or("API_PORT", "3000")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let db_max_connections = var_or("DB_MAX_CONNECTIONS", "5")
            .parse()
            .wrap_err("Invalid DB_MAX_CONNECTIONS value")?;

        // Logging settings
        let log_level = parse_level(&var_or("LOG_LEVEL", "info"));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .and_then(|origins| parse_origins(&origins));

        // Performance settings
        let request_timeout = var_or("API_REQUEST_TIMEOUT_SECONDS", "30")
            .parse()
            .unwrap_or(30);

        // Session settings
        let session_ttl_days: i64 = var_or("SESSION_TTL_DAYS", "30")
            .parse()
            .wrap_err("Invalid SESSION_TTL_DAYS value")?;
        if !(1..=3650).contains(&session_ttl_days) {
            eyre::bail!("SESSION_TTL_DAYS must be between 1 and 3650");
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            session_ttl_days,
            db_max_connections,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.session_ttl_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("debug", Level::DEBUG)]
    #[case("WARN", Level::WARN)]
    #[case("verbose", Level::INFO)]
    fn log_level_falls_back_to_info(#[case] value: &str, #[case] expected: Level) {
        assert_eq!(parse_level(value), expected);
    }

    #[test]
    fn origins_skip_blank_entries() {
        assert_eq!(
            parse_origins("http://localhost:5173, ,https://planner.example.com"),
            Some(vec![
                "http://localhost:5173".to_string(),
                "https://planner.example.com".to_string()
            ])
        );
        assert_eq!(parse_origins(" , "), None);
    }
}
