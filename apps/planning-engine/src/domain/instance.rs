//! Scheduled-transaction instances - the plan side of plan-vs-actual.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::category::CategoryType;

/// One dated occurrence of a scheduled transaction, expanded by the backend.
///
/// Instances carry denormalized category and account names so the analysis
/// layer never needs a second catalog fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstance {
    /// Backend identifier of the owning scheduled transaction.
    pub id: i64,
    /// Display name of the scheduled transaction.
    pub name: String,
    /// Planned amount; sign carries direction for transfers.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Occurrence date.
    pub date: NaiveDate,
    /// Source account.
    pub account_id: AccountId,
    /// Category of the scheduled transaction.
    pub category_id: i64,
    /// Destination account for transfers.
    #[serde(default)]
    pub to_account_id: Option<AccountId>,
    /// True when this occurrence was individually modified.
    #[serde(default)]
    pub is_exception: bool,
    /// Denormalized category name.
    pub category_name: String,
    /// Denormalized category direction.
    pub category_type: CategoryType,
    /// Denormalized account name.
    pub account_name: String,
}

impl ScheduledInstance {
    /// Month bucket key in `YYYY-MM` form.
    #[must_use]
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
