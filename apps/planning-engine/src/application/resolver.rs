//! Expected-balance resolution from the forecast service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::account::{Account, AccountId};
use crate::application::ports::{ForecastPort, ForecastQuery};

/// Outcome of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBalances {
    /// Generation the request was issued under; stale results are discarded
    /// by comparing against the session's current generation.
    pub generation: u64,
    /// Date the balances were resolved for.
    pub target_date: NaiveDate,
    /// Expected balance per account.
    pub balances: HashMap<AccountId, Decimal>,
    /// True when the forecast was unreachable and every balance fell back
    /// to the account's initial balance.
    pub degraded: bool,
}

/// Resolves the expected balance of each account on a target date.
///
/// The forecast is queried over a one-year lookback window ending on the
/// target date; each account takes the last projected point at or before
/// that date. Accounts with no usable point, and all accounts when the
/// forecast fails, fall back to their initial balance so the caller always
/// gets a complete map.
pub struct ExpectedBalanceResolver<F> {
    forecast: Arc<F>,
}

impl<F: ForecastPort> ExpectedBalanceResolver<F> {
    /// Create a resolver over a forecast port.
    pub fn new(forecast: Arc<F>) -> Self {
        Self { forecast }
    }

    /// Resolve expected balances for `accounts` on `target_date`.
    ///
    /// An empty account set short-circuits without touching the forecast.
    /// A forecast failure degrades instead of erroring.
    pub async fn resolve(
        &self,
        accounts: &[Account],
        target_date: NaiveDate,
        generation: u64,
    ) -> ResolvedBalances {
        if accounts.is_empty() {
            return ResolvedBalances {
                generation,
                target_date,
                balances: HashMap::new(),
                degraded: false,
            };
        }

        let from = target_date
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);
        let query = ForecastQuery {
            account_ids: accounts.iter().map(|a| a.id).collect(),
            from,
            to: target_date,
        };

        match self.forecast.get_forecast(&query).await {
            Ok(data) => {
                let mut balances: HashMap<AccountId, Decimal> = accounts
                    .iter()
                    .map(|a| (a.id, a.initial_balance))
                    .collect();
                for series in &data.accounts {
                    let last = series
                        .data_points
                        .iter()
                        .filter(|p| p.date <= target_date)
                        .last();
                    if let Some(point) = last {
                        balances.insert(series.account_id, point.balance);
                    }
                }
                debug!(
                    accounts = accounts.len(),
                    target_date = %target_date,
                    "resolved expected balances from forecast"
                );
                ResolvedBalances {
                    generation,
                    target_date,
                    balances,
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    target_date = %target_date,
                    "forecast unavailable, falling back to initial balances"
                );
                ResolvedBalances {
                    generation,
                    target_date,
                    balances: accounts
                        .iter()
                        .map(|a| (a.id, a.initial_balance))
                        .collect(),
                    degraded: true,
                }
            }
        }
    }
}
