//! HTTP adapter for the backend REST API.
//!
//! `PlanningApiClient` implements every application port over reqwest with
//! bounded exponential-backoff retries for transient failures.

mod client;
mod config;
mod error;

pub use client::PlanningApiClient;
pub use config::{ApiConfig, ConfigError, RetryConfig};
pub use error::ApiError;
