//! Reconciliation records and the create-request payload.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountId;

/// A persisted balance reconciliation as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Backend identifier.
    pub id: i64,
    /// Reconciled account.
    pub account_id: AccountId,
    /// Date the balance was checked.
    pub reconciliation_date: NaiveDate,
    /// Balance observed at the institution.
    #[serde(with = "rust_decimal::serde::str")]
    pub actual_balance: Decimal,
    /// Balance the plan projected for that date.
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_balance: Decimal,
    /// `actual - expected`, as computed by the backend.
    #[serde(with = "rust_decimal::serde::str")]
    pub difference: Decimal,
    /// Optional user note.
    #[serde(default)]
    pub note: Option<String>,
    /// Adjustment transaction created to absorb the difference, if any.
    #[serde(default)]
    pub adjustment_transaction_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Reconciliation list row with the account name denormalized in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Backend identifier.
    pub id: i64,
    /// Reconciled account.
    pub account_id: AccountId,
    /// Denormalized account name.
    pub account_name: String,
    /// Date the balance was checked.
    pub reconciliation_date: NaiveDate,
    /// Balance observed at the institution.
    #[serde(with = "rust_decimal::serde::str")]
    pub actual_balance: Decimal,
    /// Balance the plan projected for that date.
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_balance: Decimal,
    /// `actual - expected`.
    #[serde(with = "rust_decimal::serde::str")]
    pub difference: Decimal,
    /// Optional user note.
    #[serde(default)]
    pub note: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating one reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDraft {
    /// Account being reconciled.
    pub account_id: AccountId,
    /// Date the balance was checked.
    pub reconciliation_date: NaiveDate,
    /// Observed balance, serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub actual_balance: Decimal,
    /// Optional user note; omitted entirely when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Whether the backend should create an adjustment transaction.
    pub create_adjustment: bool,
}
