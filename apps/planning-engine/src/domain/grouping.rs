//! Institution grouping and deterministic ordering of reconciliation items.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::account::{Account, AccountId, FinancialInstitution, InstitutionId};
use super::item::BulkReconciliationItem;

/// Display name for accounts without an institution link.
pub const UNGROUPED_NAME: &str = "Other Accounts";

/// Display name for accounts referencing an institution the catalog does not
/// contain.
pub const UNKNOWN_INSTITUTION_NAME: &str = "Unknown";

/// Accounts of one institution, with their reconciliation items.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionGroup {
    /// Institution identifier; `None` for the ungrouped bucket.
    pub institution_id: Option<InstitutionId>,
    /// Group heading.
    pub institution_name: String,
    /// Items, ordered by account type then name.
    pub items: Vec<BulkReconciliationItem>,
}

/// Group accounts by institution and build their items.
///
/// Pure over its inputs; callers decide which accounts participate.
/// Expected balances come from `expected`, falling back to each account's
/// initial balance when the map has no entry. Groups sort by name with the
/// ungrouped bucket last; items within a group sort by account type then
/// name. The output order is total, so repeated calls over the same input
/// produce identical layouts.
#[must_use]
pub fn group_and_sort(
    accounts: &[Account],
    institutions: &[FinancialInstitution],
    expected: &HashMap<AccountId, Decimal>,
) -> Vec<InstitutionGroup> {
    let names: HashMap<InstitutionId, &str> = institutions
        .iter()
        .map(|i| (i.id, i.name.as_str()))
        .collect();

    let mut groups: HashMap<Option<InstitutionId>, InstitutionGroup> = HashMap::new();
    for account in accounts {
        let key = account.financial_institution_id;
        let group = groups.entry(key).or_insert_with(|| InstitutionGroup {
            institution_id: key,
            institution_name: match key {
                Some(id) => names
                    .get(&id)
                    .copied()
                    .unwrap_or(UNKNOWN_INSTITUTION_NAME)
                    .to_string(),
                None => UNGROUPED_NAME.to_string(),
            },
            items: Vec::new(),
        });
        let balance = expected
            .get(&account.id)
            .copied()
            .unwrap_or(account.initial_balance);
        group.items.push(BulkReconciliationItem::new(account, balance));
    }

    let mut sorted: Vec<InstitutionGroup> = groups.into_values().collect();
    for group in &mut sorted {
        group
            .items
            .sort_by(|a, b| {
                (a.account_type.as_str(), a.account_name.as_str())
                    .cmp(&(b.account_type.as_str(), b.account_name.as_str()))
            });
    }
    sorted.sort_by(|a, b| match (a.institution_id, b.institution_id) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (Some(_), Some(_)) => a.institution_name.cmp(&b.institution_name),
    });
    sorted
}
