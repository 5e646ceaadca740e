//! Concurrent batch submission with per-item outcome isolation.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{info, warn};

use crate::application::ports::{PortError, ReconciliationPort};
use crate::domain::account::AccountId;
use crate::domain::grouping::InstitutionGroup;
use crate::domain::item::SubmissionStatus;
use crate::domain::reconciliation::{Reconciliation, ReconciliationDraft};

/// Fallback reason shown when the backend gives no usable detail.
pub const GENERIC_FAILURE_REASON: &str = "Failed to reconcile";

/// Counts from one batch submission pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Items persisted by the backend.
    pub succeeded: usize,
    /// Items that failed; their reasons live on the items themselves.
    pub failed: usize,
}

impl BatchOutcome {
    /// True when every submitted item succeeded and at least one was sent.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded > 0
    }

    /// True when every submitted item failed.
    #[must_use]
    pub const fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }

    /// True when the batch split between successes and failures.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }

    /// Total items submitted in the pass.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Submits modified reconciliation items concurrently.
///
/// One failing item never aborts the rest of the batch: every request runs
/// to completion and each item records its own terminal status. Items that
/// already succeeded in an earlier pass are skipped, so retrying a partial
/// batch only resends the failures.
pub struct BatchSubmissionCoordinator<R> {
    reconciliation: Arc<R>,
}

impl<R: ReconciliationPort> BatchSubmissionCoordinator<R> {
    /// Create a coordinator over a reconciliation port.
    pub fn new(reconciliation: Arc<R>) -> Self {
        Self { reconciliation }
    }

    /// Submit every modified, not-yet-succeeded item across `groups`.
    ///
    /// Items transition to `Submitting` up front, then to `Succeeded` or
    /// `Failed` as their requests settle. The pass completes only after all
    /// requests have settled.
    pub async fn submit(
        &self,
        groups: &mut [InstitutionGroup],
        reconciliation_date: NaiveDate,
    ) -> BatchOutcome {
        let mut drafts: Vec<ReconciliationDraft> = Vec::new();
        for group in groups.iter_mut() {
            for item in &mut group.items {
                if !item.is_modified() || item.status.is_succeeded() {
                    continue;
                }
                let Some(entered) = item.actual_balance else {
                    continue;
                };
                // Amounts go out at a fixed two-decimal scale.
                let mut actual_balance = entered.round_dp(2);
                actual_balance.rescale(2);
                item.status = SubmissionStatus::Submitting;
                drafts.push(ReconciliationDraft {
                    account_id: item.account_id,
                    reconciliation_date,
                    actual_balance,
                    note: if item.note.trim().is_empty() {
                        None
                    } else {
                        Some(item.note.trim().to_string())
                    },
                    create_adjustment: item.create_adjustment,
                });
            }
        }

        if drafts.is_empty() {
            return BatchOutcome::default();
        }

        info!(count = drafts.len(), date = %reconciliation_date, "submitting reconciliation batch");

        let futures = drafts.iter().map(|draft| {
            let account_id = draft.account_id;
            async move {
                let result = self.reconciliation.create_reconciliation(draft).await;
                (account_id, result)
            }
        });
        let results: Vec<(AccountId, Result<Reconciliation, PortError>)> =
            join_all(futures).await;

        let mut outcome = BatchOutcome::default();
        for (account_id, result) in results {
            let status = match result {
                Ok(created) => {
                    outcome.succeeded += 1;
                    SubmissionStatus::Succeeded {
                        reconciliation_id: created.id,
                    }
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!(account_id, error = %e, "reconciliation submission failed");
                    SubmissionStatus::Failed {
                        reason: e
                            .server_detail()
                            .map_or_else(|| GENERIC_FAILURE_REASON.to_string(), ToString::to_string),
                    }
                }
            };
            if let Some(item) = groups
                .iter_mut()
                .flat_map(|g| g.items.iter_mut())
                .find(|i| i.account_id == account_id)
            {
                item.status = status;
            }
        }

        info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "reconciliation batch settled"
        );
        outcome
    }

    /// Submit one draft outside of a batch (single-account quick path).
    pub async fn submit_single(
        &self,
        draft: &ReconciliationDraft,
    ) -> Result<Reconciliation, PortError> {
        self.reconciliation.create_reconciliation(draft).await
    }
}
