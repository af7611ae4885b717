use std::time::Duration;

use axum::http::HeaderValue;
use reqwest::Url;

/// A configuration variable held a value that could not be used.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against a backend
/// on `localhost:8000`. In production, point `ANALYZER_BASE_URL` at the
/// remote backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Root URL of the analysis backend.
    pub analyzer_base_url: Url,
    /// Deadline for a single backend call in seconds (default: `30`).
    pub analyzer_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                     |
    /// | `ANALYZER_BASE_URL`     | `http://localhost:8000`  |
    /// | `ANALYZER_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse_number("PORT", var("PORT", "3000"))?;
        let request_timeout_secs: u64 =
            parse_number("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "60"))?;
        let analyzer_timeout_secs: u64 =
            parse_number("ANALYZER_TIMEOUT_SECS", var("ANALYZER_TIMEOUT_SECS", "30"))?;

        // The request deadline must leave room for one full backend call so
        // the timeout notice reaches the user instead of a bare 408.
        if request_timeout_secs <= analyzer_timeout_secs {
            return Err(ConfigError {
                var: "REQUEST_TIMEOUT_SECS",
                expected: "greater than ANALYZER_TIMEOUT_SECS",
                value: request_timeout_secs.to_string(),
            });
        }

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError {
                var: "CORS_ORIGINS",
                expected: "a comma-separated list of origins",
                value: bad.clone(),
            });
        }

        let raw_url = var("ANALYZER_BASE_URL", "http://localhost:8000");
        let analyzer_base_url = Url::parse(&raw_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or(ConfigError {
                var: "ANALYZER_BASE_URL",
                expected: "an absolute http(s) URL",
                value: raw_url,
            })?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            analyzer_base_url,
            analyzer_timeout_secs,
        })
    }

    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.analyzer_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        var,
        expected: "a non-negative integer",
        value,
    })
}
