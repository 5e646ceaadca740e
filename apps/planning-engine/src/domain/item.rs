//! Per-account reconciliation item and its submission lifecycle.
//!
//! An item tracks one account through a bulk reconciliation pass: the
//! resolved expected balance, the user-entered actual balance, the derived
//! difference, and the submission state machine.

use rust_decimal::Decimal;

use super::account::{Account, AccountId, AccountType, InstitutionId};

/// Differences with absolute value below this threshold are treated as a
/// match and do not default to an adjustment.
#[must_use]
pub fn difference_epsilon() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Submission state of one item. Each item fails or succeeds independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Not yet submitted in the current pass.
    Idle,
    /// Request in flight.
    Submitting,
    /// Persisted by the backend.
    Succeeded {
        /// Identifier of the created reconciliation.
        reconciliation_id: i64,
    },
    /// Rejected or unreachable; the reason is shown to the user.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl SubmissionStatus {
    /// True for `Succeeded` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// True only for `Succeeded`.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// True only while a request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Failure reason, if the item failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Classification of a non-empty difference for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceClass {
    /// |difference| below the epsilon threshold.
    Perfect,
    /// Actual balance above expected.
    Surplus,
    /// Actual balance below expected.
    Shortfall,
}

/// One account's row in a bulk reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkReconciliationItem {
    /// Account being reconciled.
    pub account_id: AccountId,
    /// Display name, for rendering and error reporting.
    pub account_name: String,
    /// Account classification, secondary sort key within a group.
    pub account_type: AccountType,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Owning institution, if any.
    pub financial_institution_id: Option<InstitutionId>,
    /// Balance the plan projects for the reconciliation date.
    pub expected_balance: Decimal,
    /// User-entered observed balance; `None` until the user fills it in.
    pub actual_balance: Option<Decimal>,
    /// `actual - expected` rounded to 2 decimal places, derived.
    pub difference: Option<Decimal>,
    /// Whether an adjustment transaction should be created on submit.
    pub create_adjustment: bool,
    /// Optional user note sent with the reconciliation.
    pub note: String,
    /// Submission state for the current pass.
    pub status: SubmissionStatus,
}

impl BulkReconciliationItem {
    /// Build a fresh item for an account with its resolved expected balance.
    #[must_use]
    pub fn new(account: &Account, expected_balance: Decimal) -> Self {
        Self {
            account_id: account.id,
            account_name: account.name.clone(),
            account_type: account.account_type,
            currency: account.currency.clone(),
            financial_institution_id: account.financial_institution_id,
            expected_balance,
            actual_balance: None,
            difference: None,
            create_adjustment: true,
            note: String::new(),
            status: SubmissionStatus::Idle,
        }
    }

    /// Record a user edit of the actual balance.
    ///
    /// Recomputes the difference, re-defaults the adjustment flag from the
    /// epsilon threshold, and resets any terminal status so the item can be
    /// resubmitted. Clearing the balance restores the adjustment default.
    pub fn set_actual_balance(&mut self, actual: Option<Decimal>) {
        self.actual_balance = actual;
        match actual {
            Some(value) => {
                let difference = (value - self.expected_balance).round_dp(2);
                self.create_adjustment = difference.abs() >= difference_epsilon();
                self.difference = Some(difference);
            }
            None => {
                self.difference = None;
                self.create_adjustment = true;
            }
        }
        self.status = SubmissionStatus::Idle;
    }

    /// An item participates in submission once an actual balance is entered.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.actual_balance.is_some()
    }

    /// True when the difference meets or exceeds the epsilon threshold.
    #[must_use]
    pub fn has_difference(&self) -> bool {
        self.difference
            .is_some_and(|d| d.abs() >= difference_epsilon())
    }

    /// Display classification of the current difference.
    #[must_use]
    pub fn classify_difference(&self) -> Option<DifferenceClass> {
        self.difference.map(|d| {
            if d.abs() < difference_epsilon() {
                DifferenceClass::Perfect
            } else if d > Decimal::ZERO {
                DifferenceClass::Surplus
            } else {
                DifferenceClass::Shortfall
            }
        })
    }

    /// Clear user input and submission state, keeping the expected balance.
    pub fn clear(&mut self) {
        self.actual_balance = None;
        self.difference = None;
        self.create_adjustment = true;
        self.note.clear();
        self.status = SubmissionStatus::Idle;
    }
}
