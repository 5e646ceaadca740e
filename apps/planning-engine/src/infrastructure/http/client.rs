//! reqwest client implementing the application ports.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::application::ports::{
    CatalogPort, ForecastData, ForecastPort, ForecastQuery, PortError, ReconciliationPort,
    SchedulePort,
};
use crate::domain::account::{Account, AccountId, FinancialInstitution};
use crate::domain::instance::ScheduledInstance;
use crate::domain::reconciliation::{Reconciliation, ReconciliationDraft, ReconciliationSummary};

use super::config::ApiConfig;
use super::error::ApiError;

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

/// How a non-success status should be handled.
enum ErrorCategory {
    /// Retry with backoff.
    Transient,
    /// Back off per the server's hint, retry.
    RateLimited,
    /// Fail immediately with the body's detail.
    Client,
    /// Fail immediately.
    Auth,
    /// Fail immediately.
    NotFound,
}

fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorCategory::Auth,
        StatusCode::NOT_FOUND => ErrorCategory::NotFound,
        StatusCode::TOO_MANY_REQUESTS => ErrorCategory::RateLimited,
        s if s.is_server_error() => ErrorCategory::Transient,
        _ => ErrorCategory::Client,
    }
}

/// HTTP client for the backend REST API.
///
/// Implements every port; transient failures (5xx, 429, connect errors,
/// timeouts) retry with exponential backoff up to the configured budget,
/// everything else fails fast.
pub struct PlanningApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl PlanningApiClient {
    /// Build a client for the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut last_error = String::from("no attempts made");
        let mut rate_limited_after: Option<u64> = None;

        for attempt in 0..self.config.retry.max_attempts {
            if attempt > 0 {
                let delay = rate_limited_after
                    .take()
                    .map_or_else(|| self.config.retry.delay_for(attempt - 1), std::time::Duration::from_secs);
                debug!(path, attempt, delay_ms = delay.as_millis() as u64, "retrying request");
                tokio::time::sleep(delay).await;
            }

            let mut request = self.http.request(method.clone(), &url).query(query);
            if let Some(token) = &self.config.bearer_token {
                request = request.bearer_auth(token);
            }
            if let Some(json) = body {
                request = request.json(json);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    match categorize_status(status) {
                        ErrorCategory::Auth => return Err(ApiError::AuthenticationFailed),
                        ErrorCategory::NotFound => {
                            return Err(ApiError::NotFound {
                                resource: path.to_string(),
                            });
                        }
                        ErrorCategory::Client => {
                            let detail = extract_detail(response, status).await;
                            return Err(ApiError::Api {
                                status: status.as_u16(),
                                detail,
                            });
                        }
                        ErrorCategory::RateLimited => {
                            let retry_after = response
                                .headers()
                                .get(reqwest::header::RETRY_AFTER)
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(1);
                            rate_limited_after = Some(retry_after);
                            last_error = format!("HTTP 429, retry after {retry_after}s");
                            warn!(path, retry_after, "rate limited");
                        }
                        ErrorCategory::Transient => {
                            last_error = format!("HTTP {status}");
                            warn!(path, status = status.as_u16(), "transient server error");
                        }
                    }
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_error = e.to_string();
                    warn!(path, error = %e, "transport error");
                }
                Err(e) => return Err(ApiError::Network(e)),
            }
        }

        if let Some(retry_after_secs) = rate_limited_after {
            return Err(ApiError::RateLimited { retry_after_secs });
        }
        Err(ApiError::MaxRetriesExceeded {
            attempts: self.config.retry.max_attempts,
            last_error,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send_with_retry(Method::GET, path, query, None).await?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self
            .send_with_retry(Method::POST, path, &[], Some(body))
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::JsonParse {
        message: e.to_string(),
    })
}

async fn extract_detail(response: Response, status: StatusCode) -> String {
    match response.json::<ApiErrorBody>().await {
        Ok(ApiErrorBody { detail: Some(detail) }) => detail,
        _ => format!("HTTP {status}"),
    }
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl CatalogPort for PlanningApiClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, PortError> {
        Ok(self.get_json("/accounts", &[]).await?)
    }

    async fn list_institutions(&self) -> Result<Vec<FinancialInstitution>, PortError> {
        Ok(self.get_json("/financial-institutions", &[]).await?)
    }
}

#[async_trait]
impl ForecastPort for PlanningApiClient {
    async fn get_forecast(&self, query: &ForecastQuery) -> Result<ForecastData, PortError> {
        let mut params: Vec<(&str, String)> = vec![
            ("from_date", date_param(query.from)),
            ("to_date", date_param(query.to)),
        ];
        for id in &query.account_ids {
            params.push(("account_ids", id.to_string()));
        }
        Ok(self.get_json("/forecast", &params).await?)
    }
}

#[async_trait]
impl ReconciliationPort for PlanningApiClient {
    async fn list_reconciliations(
        &self,
        account_id: Option<AccountId>,
    ) -> Result<Vec<ReconciliationSummary>, PortError> {
        let params: Vec<(&str, String)> = account_id
            .map(|id| vec![("account_id", id.to_string())])
            .unwrap_or_default();
        Ok(self.get_json("/reconciliations", &params).await?)
    }

    async fn create_reconciliation(
        &self,
        draft: &ReconciliationDraft,
    ) -> Result<Reconciliation, PortError> {
        let body = serde_json::to_value(draft).map_err(|e| PortError::MalformedResponse {
            message: e.to_string(),
        })?;
        Ok(self.post_json("/reconciliations/", &body).await?)
    }

    async fn delete_reconciliation(&self, id: i64) -> Result<(), PortError> {
        self.send_with_retry(Method::DELETE, &format!("/reconciliations/{id}"), &[], None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SchedulePort for PlanningApiClient {
    async fn get_scheduled_instances(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScheduledInstance>, PortError> {
        let params = [
            ("from_date", date_param(from)),
            ("to_date", date_param(to)),
        ];
        Ok(self
            .get_json("/scheduled-transactions/instances", &params)
            .await?)
    }
}
