//! Analysis report model.
//!
//! Actual-side figures are `Option` throughout: a `None` means no observed
//! data exists for that slot, which is distinct from an observed zero.
//! Variances compute against zero while actuals are absent, so they equal
//! the negated plan until a transaction ledger exists.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountId;
use crate::domain::category::CategoryType;

/// Date window and account scope for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisQuery {
    /// Accounts included in the balance trend.
    pub account_ids: Vec<AccountId>,
    /// Window start, inclusive.
    pub from: NaiveDate,
    /// Window end, inclusive.
    pub to: NaiveDate,
}

/// Planned volume of one category over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    /// Category display name.
    pub category_name: String,
    /// Category direction.
    pub category_type: CategoryType,
    /// Absolute value of the signed amount sum.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned: Decimal,
    /// Observed amount; `None` until actuals tracking lands.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub actual: Option<Decimal>,
}

impl CategoryAnalysis {
    /// `actual - planned`, against zero while actuals are absent.
    #[must_use]
    pub fn variance(&self) -> Decimal {
        self.actual.unwrap_or_default() - self.planned
    }
}

/// Planned income, expenses, and savings for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    /// Sum of planned income.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned_income: Decimal,
    /// Sum of absolute planned expenses.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned_expenses: Decimal,
    /// `planned_income - planned_expenses`.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned_savings: Decimal,
}

/// Window-level totals and variances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total planned income over the window.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_planned_income: Decimal,
    /// Total planned expenses over the window.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_planned_expenses: Decimal,
    /// `income - expenses`.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_planned_savings: Decimal,
    /// Observed income; `None` until actuals tracking lands.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub actual_income: Option<Decimal>,
    /// Observed expenses; `None` until actuals tracking lands.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub actual_expenses: Option<Decimal>,
    /// Observed savings; `None` until actuals tracking lands.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub actual_savings: Option<Decimal>,
    /// `actual_income - total_planned_income`, actuals defaulting to zero.
    #[serde(with = "rust_decimal::serde::str")]
    pub income_variance: Decimal,
    /// `actual_expenses - total_planned_expenses`, actuals defaulting to zero.
    #[serde(with = "rust_decimal::serde::str")]
    pub expense_variance: Decimal,
    /// `actual_savings - total_planned_savings`, actuals defaulting to zero.
    #[serde(with = "rust_decimal::serde::str")]
    pub savings_variance: Decimal,
}

impl AnalysisSummary {
    /// Planned savings as a percentage of income; zero when there is no
    /// income.
    #[must_use]
    pub fn savings_rate(&self) -> Decimal {
        if self.total_planned_income > Decimal::ZERO {
            self.total_planned_savings / self.total_planned_income * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}

/// One point of the projected-vs-reconciled balance trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanVsActualPoint {
    /// Point date.
    pub date: NaiveDate,
    /// Total projected balance across the queried accounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned_balance: Decimal,
    /// Reconciled balance on exactly this date, if a reconciliation exists
    /// for it.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub actual_balance: Option<Decimal>,
}

/// Full analysis report for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    /// Window start, inclusive.
    pub from: NaiveDate,
    /// Window end, inclusive.
    pub to: NaiveDate,
    /// Per-category planned volumes in first-appearance order.
    pub categories: Vec<CategoryAnalysis>,
    /// Monthly metrics in ascending month order.
    pub monthly: Vec<MonthlyMetrics>,
    /// Window totals.
    pub summary: AnalysisSummary,
    /// Balance trend in ascending date order.
    pub trend: Vec<PlanVsActualPoint>,
    /// Ordered, human-readable recommendations.
    pub recommendations: Vec<String>,
}
