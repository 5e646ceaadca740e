//! End-to-end bulk reconciliation flow over in-memory ports.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use planning_engine::{
    Account, AccountForecast, AccountId, AccountType, CatalogPort, FinancialInstitution,
    ForecastData, ForecastPoint, ForecastPort, ForecastQuery, PortError, Reconciliation,
    ReconciliationDraft, ReconciliationPort, ReconciliationSession, ReconciliationSummary,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn account(
    id: AccountId,
    name: &str,
    ty: AccountType,
    institution: Option<i64>,
    initial: rust_decimal::Decimal,
) -> Account {
    Account {
        id,
        name: name.to_string(),
        account_type: ty,
        currency: "USD".to_string(),
        initial_balance: initial,
        initial_balance_date: date(2024, 1, 1),
        credit_limit: None,
        financial_institution_id: institution,
        is_active: true,
    }
}

struct FakeCatalog;

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn list_accounts(&self) -> Result<Vec<Account>, PortError> {
        Ok(vec![
            account(1, "Everyday Checking", AccountType::Checking, Some(1), dec!(1000)),
            account(2, "Rainy Day", AccountType::Savings, Some(1), dec!(5000)),
            account(3, "Travel Card", AccountType::CreditCard, Some(2), dec!(-250)),
            account(4, "Wallet", AccountType::Cash, None, dec!(80)),
        ])
    }

    async fn list_institutions(&self) -> Result<Vec<FinancialInstitution>, PortError> {
        Ok(vec![
            FinancialInstitution { id: 1, name: "Zenith Bank".to_string() },
            FinancialInstitution { id: 2, name: "Acme Credit Union".to_string() },
        ])
    }
}

struct FakeForecast;

#[async_trait]
impl ForecastPort for FakeForecast {
    async fn get_forecast(&self, query: &ForecastQuery) -> Result<ForecastData, PortError> {
        // Projected points exist for accounts 1 and 2 only.
        Ok(ForecastData {
            from_date: query.from,
            to_date: query.to,
            accounts: vec![
                AccountForecast {
                    account_id: 1,
                    account_name: "Everyday Checking".to_string(),
                    currency: "USD".to_string(),
                    starting_balance: dec!(1000),
                    data_points: vec![
                        ForecastPoint { date: date(2024, 6, 1), balance: dec!(1400) },
                        ForecastPoint { date: date(2024, 6, 14), balance: dec!(1500) },
                        ForecastPoint { date: date(2024, 6, 20), balance: dec!(1800) },
                    ],
                },
                AccountForecast {
                    account_id: 2,
                    account_name: "Rainy Day".to_string(),
                    currency: "USD".to_string(),
                    starting_balance: dec!(5000),
                    data_points: vec![ForecastPoint {
                        date: date(2024, 6, 10),
                        balance: dec!(5200),
                    }],
                },
            ],
        })
    }
}

struct FlakyReconciliation {
    failing: HashSet<AccountId>,
    next_id: AtomicI64,
    creates: AtomicUsize,
}

impl FlakyReconciliation {
    fn failing_on(ids: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            failing: ids.into_iter().collect(),
            next_id: AtomicI64::new(500),
            creates: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReconciliationPort for FlakyReconciliation {
    async fn list_reconciliations(
        &self,
        _account_id: Option<AccountId>,
    ) -> Result<Vec<ReconciliationSummary>, PortError> {
        Ok(Vec::new())
    }

    async fn create_reconciliation(
        &self,
        draft: &ReconciliationDraft,
    ) -> Result<Reconciliation, PortError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&draft.account_id) {
            return Err(PortError::Rejected {
                detail: "Account is locked for reconciliation".to_string(),
            });
        }
        Ok(Reconciliation {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            account_id: draft.account_id,
            reconciliation_date: draft.reconciliation_date,
            actual_balance: draft.actual_balance,
            expected_balance: dec!(0),
            difference: dec!(0),
            note: draft.note.clone(),
            adjustment_transaction_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn delete_reconciliation(&self, _id: i64) -> Result<(), PortError> {
        Ok(())
    }
}

fn session(
    reconciliation: Arc<FlakyReconciliation>,
) -> ReconciliationSession<FakeCatalog, FakeForecast, FlakyReconciliation> {
    ReconciliationSession::new(
        Arc::new(FakeCatalog),
        Arc::new(FakeForecast),
        reconciliation,
        date(2024, 6, 15),
    )
}

#[tokio::test]
async fn load_groups_accounts_and_resolves_balances() {
    let mut session = session(Arc::new(FlakyReconciliation::failing_on([])));
    session.load().await.unwrap();

    let groups = session.groups();
    let names: Vec<&str> = groups.iter().map(|g| g.institution_name.as_str()).collect();
    assert_eq!(names, vec!["Acme Credit Union", "Zenith Bank", "Other Accounts"]);

    // Account 1 takes the last forecast point at or before June 15.
    assert_eq!(session.item(1).unwrap().expected_balance, dec!(1500));
    assert_eq!(session.item(2).unwrap().expected_balance, dec!(5200));
    // Accounts without forecast series fall back to initial balances.
    assert_eq!(session.item(3).unwrap().expected_balance, dec!(-250));
    assert_eq!(session.item(4).unwrap().expected_balance, dec!(80));
    assert!(!session.is_degraded());
}

#[tokio::test]
async fn partial_batch_failure_keeps_item_outcomes_separate() {
    let reconciliation = Arc::new(FlakyReconciliation::failing_on([2]));
    let mut session = session(Arc::clone(&reconciliation));
    session.load().await.unwrap();

    session.edit_actual_balance(1, Some(dec!(1480.00)));
    session.edit_actual_balance(2, Some(dec!(5100.00)));
    session.edit_actual_balance(4, Some(dec!(80.00)));
    assert_eq!(session.modified_count(), 3);
    // Accounts 1 and 2 are off by at least a cent; the wallet matches.
    assert_eq!(session.adjustment_count(), 2);

    let outcome = session.submit().await.unwrap();
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert!(outcome.is_partial());

    assert!(session.item(1).unwrap().status.is_succeeded());
    assert_eq!(
        session.item(2).unwrap().status.failure_reason(),
        Some("Account is locked for reconciliation")
    );
    assert!(session.item(4).unwrap().status.is_succeeded());
}

#[tokio::test]
async fn resubmit_sends_only_the_failures() {
    let reconciliation = Arc::new(FlakyReconciliation::failing_on([2]));
    let mut session = session(Arc::clone(&reconciliation));
    session.load().await.unwrap();

    session.edit_actual_balance(1, Some(dec!(1480.00)));
    session.edit_actual_balance(2, Some(dec!(5100.00)));
    session.submit().await.unwrap();
    assert_eq!(reconciliation.creates.load(Ordering::SeqCst), 2);

    // Second pass: the succeeded item is excluded, the failed one retries.
    let outcome = session.submit().await.unwrap();
    assert_eq!(outcome.total(), 1);
    assert_eq!(reconciliation.creates.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn date_change_rebuilds_items_from_new_balances() {
    let mut session = session(Arc::new(FlakyReconciliation::failing_on([])));
    session.load().await.unwrap();
    session.edit_actual_balance(1, Some(dec!(1480.00)));

    session.set_date(date(2024, 6, 30)).await;
    assert_eq!(session.modified_count(), 0);
    // June 20 becomes the last usable point for account 1.
    assert_eq!(session.item(1).unwrap().expected_balance, dec!(1800));
}

#[tokio::test]
async fn reset_clears_input_and_statuses() {
    let mut session = session(Arc::new(FlakyReconciliation::failing_on([])));
    session.load().await.unwrap();
    session.edit_actual_balance(1, Some(dec!(1480.00)));
    session.edit_note(1, "statement".to_string());
    session.submit().await.unwrap();

    session.reset().unwrap();
    let item = session.item(1).unwrap();
    assert_eq!(item.actual_balance, None);
    assert!(item.note.is_empty());
    assert!(!item.status.is_terminal());
    assert_eq!(item.expected_balance, dec!(1500));
}
