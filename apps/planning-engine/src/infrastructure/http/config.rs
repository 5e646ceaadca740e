//! API client configuration, loadable from the environment.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {name}")]
    MissingVar {
        /// Variable name.
        name: String,
    },

    /// An environment variable is set but unparseable.
    #[error("invalid value for {name}: {value}")]
    InvalidVar {
        /// Variable name.
        name: String,
        /// Offending value.
        value: String,
    },
}

/// Retry policy for transient API failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Ceiling for the backoff delay.
    pub max_backoff: Duration,
    /// Growth factor applied after each retry.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Backoff delay for a given retry (0-based), capped at the maximum.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let millis = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(retry as i32);
        self.max_backoff.min(Duration::from_millis(millis as u64))
    }
}

/// Connection settings for the backend API.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Bearer token for authenticated deployments.
    pub bearer_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryConfig,
}

// Manual Debug so the token never lands in logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "***REDACTED***"),
            )
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ApiConfig {
    /// Config for a base URL with default timeout and retry policy.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            bearer_token: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Load from the environment.
    ///
    /// - `PLANNING_API_URL` (required): backend base URL
    /// - `PLANNING_API_TOKEN` (optional): bearer token
    /// - `PLANNING_API_TIMEOUT_SECS` (optional, default 30)
    /// - `PLANNING_API_MAX_RETRIES` (optional, default 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_env("PLANNING_API_URL")?;
        let mut config = Self::new(base_url);
        if let Ok(token) = env::var("PLANNING_API_TOKEN") {
            if !token.is_empty() {
                config.bearer_token = Some(token);
            }
        }
        if let Some(secs) = parse_env_u64("PLANNING_API_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_env_u64("PLANNING_API_MAX_RETRIES")? {
            config.retry.max_attempts = u32::try_from(attempts).map_err(|_| {
                ConfigError::InvalidVar {
                    name: "PLANNING_API_MAX_RETRIES".to_string(),
                    value: attempts.to_string(),
                }
            })?;
        }
        Ok(config)
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar {
        name: name.to_string(),
    })
}

fn parse_env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
