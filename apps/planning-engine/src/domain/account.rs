//! Account and financial-institution value objects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Backend identifier for an account.
pub type AccountId = i64;

/// Backend identifier for a financial institution.
pub type InstitutionId = i64;

/// Account classification, mirrored from the backend enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Day-to-day transactional account.
    Checking,
    /// Interest-bearing savings account.
    Savings,
    /// Physical cash on hand.
    Cash,
    /// Brokerage or other investment account.
    Investment,
    /// Tax-advantaged retirement account.
    Retirement,
    /// Revolving credit card account.
    CreditCard,
    /// Money owed to a lender.
    Loan,
    /// Money lent out to someone else.
    LoanGiven,
    /// Virtual account used for planning buckets.
    Planning,
}

impl AccountType {
    /// Stable wire name, also used as a secondary sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Cash => "cash",
            Self::Investment => "investment",
            Self::Retirement => "retirement",
            Self::CreditCard => "credit_card",
            Self::Loan => "loan",
            Self::LoanGiven => "loan_given",
            Self::Planning => "planning",
        }
    }
}

/// A user account as returned by the backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Backend identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Account classification.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Balance at `initial_balance_date`, the anchor for all projections.
    #[serde(with = "rust_decimal::serde::str")]
    pub initial_balance: Decimal,
    /// Date the initial balance was recorded.
    pub initial_balance_date: NaiveDate,
    /// Credit limit for revolving accounts.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub credit_limit: Option<Decimal>,
    /// Owning institution, if the account is linked to one.
    #[serde(default)]
    pub financial_institution_id: Option<InstitutionId>,
    /// Inactive accounts are excluded from reconciliation and analysis.
    pub is_active: bool,
}

/// A financial institution as returned by the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialInstitution {
    /// Backend identifier.
    pub id: InstitutionId,
    /// Display name.
    pub name: String,
}
