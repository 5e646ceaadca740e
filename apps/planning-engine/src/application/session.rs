//! Bulk reconciliation session state.
//!
//! Owns the loaded catalog, the grouped items, the reconciliation date, and
//! the submission lifecycle. Date changes bump a generation counter so a
//! slow balance resolution can never overwrite the result of a newer one.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::coordinator::{BatchOutcome, BatchSubmissionCoordinator};
use crate::application::ports::{CatalogPort, ForecastPort, PortError, ReconciliationPort};
use crate::application::resolver::ExpectedBalanceResolver;
use crate::domain::account::{Account, AccountId, FinancialInstitution};
use crate::domain::grouping::{InstitutionGroup, group_and_sort};
use crate::domain::item::BulkReconciliationItem;

/// Session-level failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The account or institution catalog could not be loaded; the session
    /// cannot start without it.
    #[error("failed to load catalog: {0}")]
    LoadFailed(#[from] PortError),

    /// A batch submission is still settling.
    #[error("a submission is already in progress")]
    SubmissionInFlight,
}

/// One user's bulk reconciliation pass, from load to submit.
pub struct ReconciliationSession<C, F, R> {
    catalog: Arc<C>,
    resolver: ExpectedBalanceResolver<F>,
    coordinator: BatchSubmissionCoordinator<R>,
    accounts: Vec<Account>,
    institutions: Vec<FinancialInstitution>,
    groups: Vec<InstitutionGroup>,
    reconciliation_date: NaiveDate,
    generation: u64,
    submitting: bool,
    degraded: bool,
}

impl<C, F, R> ReconciliationSession<C, F, R>
where
    C: CatalogPort,
    F: ForecastPort,
    R: ReconciliationPort,
{
    /// Create an empty session for a reconciliation date.
    pub fn new(
        catalog: Arc<C>,
        forecast: Arc<F>,
        reconciliation: Arc<R>,
        reconciliation_date: NaiveDate,
    ) -> Self {
        Self {
            catalog,
            resolver: ExpectedBalanceResolver::new(forecast),
            coordinator: BatchSubmissionCoordinator::new(reconciliation),
            accounts: Vec::new(),
            institutions: Vec::new(),
            groups: Vec::new(),
            reconciliation_date,
            generation: 0,
            submitting: false,
            degraded: false,
        }
    }

    /// Load the catalog and resolve expected balances for the current date.
    ///
    /// Catalog failures are fatal; forecast failures degrade to initial
    /// balances.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        let accounts = self.catalog.list_accounts().await?;
        let institutions = self.catalog.list_institutions().await?;
        info!(
            accounts = accounts.len(),
            institutions = institutions.len(),
            "catalog loaded"
        );
        self.accounts = accounts.into_iter().filter(|a| a.is_active).collect();
        self.institutions = institutions;
        self.refresh_balances().await;
        Ok(())
    }

    /// Change the reconciliation date and re-resolve expected balances.
    ///
    /// User input already entered is discarded; the grouping is rebuilt
    /// from the new balances.
    pub async fn set_date(&mut self, date: NaiveDate) {
        self.reconciliation_date = date;
        self.refresh_balances().await;
    }

    async fn refresh_balances(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let resolved = self
            .resolver
            .resolve(&self.accounts, self.reconciliation_date, generation)
            .await;
        if resolved.generation != self.generation {
            // A newer date change superseded this resolution.
            debug!(
                stale = resolved.generation,
                current = self.generation,
                "discarding stale balance resolution"
            );
            return;
        }
        self.degraded = resolved.degraded;
        self.groups = group_and_sort(&self.accounts, &self.institutions, &resolved.balances);
    }

    /// Current reconciliation date.
    #[must_use]
    pub const fn reconciliation_date(&self) -> NaiveDate {
        self.reconciliation_date
    }

    /// True when expected balances fell back to initial balances.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// True while a batch submission is settling.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Grouped items in display order.
    #[must_use]
    pub fn groups(&self) -> &[InstitutionGroup] {
        &self.groups
    }

    /// Look up one item by account.
    #[must_use]
    pub fn item(&self, account_id: AccountId) -> Option<&BulkReconciliationItem> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter())
            .find(|i| i.account_id == account_id)
    }

    fn item_mut(&mut self, account_id: AccountId) -> Option<&mut BulkReconciliationItem> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.items.iter_mut())
            .find(|i| i.account_id == account_id)
    }

    /// Record an actual-balance edit for one account.
    pub fn edit_actual_balance(&mut self, account_id: AccountId, actual: Option<Decimal>) {
        if let Some(item) = self.item_mut(account_id) {
            item.set_actual_balance(actual);
        }
    }

    /// Record a note edit for one account.
    pub fn edit_note(&mut self, account_id: AccountId, note: String) {
        if let Some(item) = self.item_mut(account_id) {
            item.note = note;
        }
    }

    /// Toggle the adjustment flag for one account.
    pub fn set_create_adjustment(&mut self, account_id: AccountId, create: bool) {
        if let Some(item) = self.item_mut(account_id) {
            item.create_adjustment = create;
        }
    }

    /// Number of items with an actual balance entered.
    #[must_use]
    pub fn modified_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter())
            .filter(|i| i.is_modified())
            .count()
    }

    /// Number of modified items that will create an adjustment transaction:
    /// the adjustment flag is set and the difference clears the threshold.
    #[must_use]
    pub fn adjustment_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter())
            .filter(|i| i.is_modified() && i.create_adjustment && i.has_difference())
            .count()
    }

    /// Submit all modified, not-yet-succeeded items as one batch.
    pub async fn submit(&mut self) -> Result<BatchOutcome, SessionError> {
        if self.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        self.submitting = true;
        let outcome = self
            .coordinator
            .submit(&mut self.groups, self.reconciliation_date)
            .await;
        self.submitting = false;
        Ok(outcome)
    }

    /// Clear all user input and submission state, keeping the catalog and
    /// resolved balances.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        for group in &mut self.groups {
            for item in &mut group.items {
                item.clear();
            }
        }
        Ok(())
    }
}
