//! Port definitions for the backend services.
//!
//! The application layer depends only on these traits; the HTTP adapter in
//! the infrastructure layer implements them against the REST API, and the
//! tests implement them with in-memory fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::account::{Account, AccountId, FinancialInstitution};
use crate::domain::instance::ScheduledInstance;
use crate::domain::reconciliation::{Reconciliation, ReconciliationDraft, ReconciliationSummary};

/// Errors surfaced by port implementations.
#[derive(Debug, Error)]
pub enum PortError {
    /// Backend unreachable or returned a server error.
    #[error("service unavailable: {message}")]
    Unavailable {
        /// Transport or server error description.
        message: String,
    },

    /// Backend rejected the request with a validation detail.
    #[error("request rejected: {detail}")]
    Rejected {
        /// Server-supplied detail message, suitable for display.
        detail: String,
    },

    /// Requested resource does not exist.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// Credentials missing or expired.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Backend asked the client to back off.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Server-suggested wait before retrying.
        retry_after_secs: u64,
    },

    /// Response body did not match the expected shape.
    #[error("malformed response: {message}")]
    MalformedResponse {
        /// Parse error description.
        message: String,
    },
}

impl PortError {
    /// Server-supplied detail safe to show the user, if any.
    ///
    /// Only validation rejections carry a display-ready message; everything
    /// else maps to a generic failure string at the call site.
    #[must_use]
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail } => Some(detail),
            _ => None,
        }
    }
}

/// Date-bounded forecast request for a set of accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    /// Accounts to project.
    pub account_ids: Vec<AccountId>,
    /// Window start, inclusive.
    pub from: NaiveDate,
    /// Window end, inclusive.
    pub to: NaiveDate,
}

/// One projected balance point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Projection date.
    pub date: NaiveDate,
    /// Projected balance on that date.
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

/// Projection series for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountForecast {
    /// Account the series belongs to.
    pub account_id: AccountId,
    /// Denormalized account name.
    pub account_name: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Balance at the window start.
    #[serde(with = "rust_decimal::serde::str")]
    pub starting_balance: Decimal,
    /// Projected points in ascending date order.
    pub data_points: Vec<ForecastPoint>,
}

/// Forecast response covering the requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    /// Window start, inclusive.
    pub from_date: NaiveDate,
    /// Window end, inclusive.
    pub to_date: NaiveDate,
    /// Per-account projection series.
    pub accounts: Vec<AccountForecast>,
}

/// Read access to the account and institution catalog.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// All accounts visible to the user, active and inactive.
    async fn list_accounts(&self) -> Result<Vec<Account>, PortError>;

    /// All financial institutions.
    async fn list_institutions(&self) -> Result<Vec<FinancialInstitution>, PortError>;
}

/// Balance projection service.
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Project balances for the given accounts over a date window.
    async fn get_forecast(&self, query: &ForecastQuery) -> Result<ForecastData, PortError>;
}

/// Reconciliation persistence.
#[async_trait]
pub trait ReconciliationPort: Send + Sync {
    /// List reconciliations, optionally filtered to one account.
    async fn list_reconciliations(
        &self,
        account_id: Option<AccountId>,
    ) -> Result<Vec<ReconciliationSummary>, PortError>;

    /// Persist one reconciliation.
    async fn create_reconciliation(
        &self,
        draft: &ReconciliationDraft,
    ) -> Result<Reconciliation, PortError>;

    /// Delete a reconciliation by id.
    async fn delete_reconciliation(&self, id: i64) -> Result<(), PortError>;
}

/// Scheduled-transaction expansion service.
#[async_trait]
pub trait SchedulePort: Send + Sync {
    /// Expand scheduled transactions into dated instances over a window.
    async fn get_scheduled_instances(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScheduledInstance>, PortError>;
}
