//! Pure aggregation steps behind the analysis report.
//!
//! Every function here is deterministic over its inputs; the service layer
//! handles fetching and feeds the raw data in.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::application::ports::ForecastData;
use crate::analysis::types::{
    AnalysisSummary, CategoryAnalysis, MonthlyMetrics, PlanVsActualPoint,
};
use crate::domain::category::CategoryType;
use crate::domain::instance::ScheduledInstance;
use crate::domain::reconciliation::ReconciliationSummary;

/// Planned volume per category, in the order categories first appear in the
/// instance stream.
///
/// Amounts accumulate signed and the absolute value is taken at the end, so
/// a category netting to zero reports zero rather than its gross turnover.
#[must_use]
pub fn category_breakdown(instances: &[ScheduledInstance]) -> Vec<CategoryAnalysis> {
    let mut sums: Vec<(String, CategoryType, Decimal)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for instance in instances {
        match index.get(instance.category_name.as_str()) {
            Some(&i) => sums[i].2 += instance.amount,
            None => {
                index.insert(instance.category_name.clone(), sums.len());
                sums.push((
                    instance.category_name.clone(),
                    instance.category_type,
                    instance.amount,
                ));
            }
        }
    }
    sums.into_iter()
        .map(|(category_name, category_type, sum)| CategoryAnalysis {
            category_name,
            category_type,
            planned: sum.abs(),
            actual: None,
        })
        .collect()
}

/// Planned income, expenses, and savings per calendar month, ascending.
#[must_use]
pub fn monthly_metrics(instances: &[ScheduledInstance]) -> Vec<MonthlyMetrics> {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for instance in instances {
        let entry = months.entry(instance.month_key()).or_default();
        match instance.category_type {
            CategoryType::Income => entry.0 += instance.amount,
            CategoryType::Expense => entry.1 += instance.amount.abs(),
            CategoryType::Transfer => {}
        }
    }
    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyMetrics {
            month,
            planned_income: income,
            planned_expenses: expenses,
            planned_savings: income - expenses,
        })
        .collect()
}

/// Window totals and variances.
#[must_use]
pub fn summary(instances: &[ScheduledInstance]) -> AnalysisSummary {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for instance in instances {
        match instance.category_type {
            CategoryType::Income => income += instance.amount,
            CategoryType::Expense => expenses += instance.amount.abs(),
            CategoryType::Transfer => {}
        }
    }
    let savings = income - expenses;
    let actual_income: Option<Decimal> = None;
    let actual_expenses: Option<Decimal> = None;
    let actual_savings: Option<Decimal> = None;
    AnalysisSummary {
        total_planned_income: income,
        total_planned_expenses: expenses,
        total_planned_savings: savings,
        income_variance: actual_income.unwrap_or_default() - income,
        expense_variance: actual_expenses.unwrap_or_default() - expenses,
        savings_variance: actual_savings.unwrap_or_default() - savings,
        actual_income,
        actual_expenses,
        actual_savings,
    }
}

/// Merge the forecast into a balance trend, pairing reconciliations onto
/// points by exact date.
///
/// Planned balances are the sum of every account's projection per date;
/// dates projected for only some accounts still produce a point with the
/// partial sum. When several reconciliations share a date, the last one in
/// the input wins.
#[must_use]
pub fn balance_trend(
    forecast: &ForecastData,
    reconciliations: &[ReconciliationSummary],
) -> Vec<PlanVsActualPoint> {
    let mut planned: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for account in &forecast.accounts {
        for point in &account.data_points {
            *planned.entry(point.date).or_default() += point.balance;
        }
    }

    let mut actuals: HashMap<NaiveDate, Decimal> = HashMap::new();
    for rec in reconciliations {
        actuals.insert(rec.reconciliation_date, rec.actual_balance);
    }

    planned
        .into_iter()
        .map(|(date, planned_balance)| PlanVsActualPoint {
            date,
            planned_balance,
            actual_balance: actuals.get(&date).copied(),
        })
        .collect()
}

/// Recommendation thresholds, in percent of income.
const LOW_SAVINGS_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const HIGH_SAVINGS_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
const DOMINANT_CATEGORY_SHARE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Ordered recommendations derived from the summary and category breakdown.
#[must_use]
pub fn recommendations(
    summary: &AnalysisSummary,
    categories: &[CategoryAnalysis],
) -> Vec<String> {
    let mut out = Vec::new();

    let savings_rate = summary.savings_rate();
    if savings_rate < LOW_SAVINGS_RATE {
        out.push(
            "Consider increasing your savings rate. Aim for at least 10-20% of income."
                .to_string(),
        );
    } else if savings_rate > HIGH_SAVINGS_RATE {
        out.push("Great job! Your savings rate is excellent.".to_string());
    }

    // Ties keep the earlier category.
    let top_expense = categories
        .iter()
        .filter(|c| c.category_type == CategoryType::Expense)
        .fold(None::<&CategoryAnalysis>, |best, c| match best {
            Some(b) if b.planned >= c.planned => Some(b),
            _ => Some(c),
        });
    if let Some(top) = top_expense {
        if summary.total_planned_income > Decimal::ZERO {
            let share = top.planned / summary.total_planned_income * Decimal::ONE_HUNDRED;
            if share > DOMINANT_CATEGORY_SHARE {
                out.push(format!(
                    "{} is your largest expense category ({:.1}% of income). \
                     Consider reviewing if there are opportunities to optimize.",
                    top.category_name,
                    share.round_dp(1)
                ));
            }
        }
    }

    if summary.total_planned_savings < Decimal::ZERO {
        out.push(
            "Your planned expenses exceed your income. Consider reducing expenses or \
             increasing income sources."
                .to_string(),
        );
    }

    if out.is_empty() {
        out.push("Your financial plan looks balanced. Keep tracking your progress!".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AccountForecast, ForecastPoint};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instance(
        name: &str,
        category: &str,
        ty: CategoryType,
        amount: Decimal,
        on: NaiveDate,
    ) -> ScheduledInstance {
        ScheduledInstance {
            id: 1,
            name: name.to_string(),
            amount,
            currency: "USD".to_string(),
            date: on,
            account_id: 7,
            category_id: 1,
            to_account_id: None,
            is_exception: false,
            category_name: category.to_string(),
            category_type: ty,
            account_name: "Checking".to_string(),
        }
    }

    #[test]
    fn breakdown_preserves_first_appearance_order() {
        let instances = vec![
            instance("Rent", "Housing", CategoryType::Expense, dec!(-1200), date(2024, 1, 1)),
            instance("Groceries", "Food", CategoryType::Expense, dec!(-300), date(2024, 1, 5)),
            instance("Rent", "Housing", CategoryType::Expense, dec!(-1200), date(2024, 2, 1)),
        ];
        let breakdown = category_breakdown(&instances);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category_name, "Housing");
        assert_eq!(breakdown[0].planned, dec!(2400));
        assert_eq!(breakdown[1].category_name, "Food");
        assert_eq!(breakdown[0].actual, None);
    }

    #[test]
    fn breakdown_nets_signed_amounts_before_taking_abs() {
        let instances = vec![
            instance("To savings", "Transfers", CategoryType::Transfer, dec!(-500), date(2024, 1, 1)),
            instance("From savings", "Transfers", CategoryType::Transfer, dec!(300), date(2024, 1, 2)),
        ];
        let breakdown = category_breakdown(&instances);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].planned, dec!(200));
    }

    #[test]
    fn monthly_buckets_sort_ascending() {
        let instances = vec![
            instance("Salary", "Salary", CategoryType::Income, dec!(5000), date(2024, 2, 1)),
            instance("Rent", "Housing", CategoryType::Expense, dec!(-1200), date(2024, 1, 1)),
            instance("Salary", "Salary", CategoryType::Income, dec!(5000), date(2024, 1, 1)),
        ];
        let monthly = monthly_metrics(&instances);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "2024-01");
        assert_eq!(monthly[0].planned_income, dec!(5000));
        assert_eq!(monthly[0].planned_expenses, dec!(1200));
        assert_eq!(monthly[0].planned_savings, dec!(3800));
        assert_eq!(monthly[1].month, "2024-02");
        assert_eq!(monthly[1].planned_expenses, dec!(0));
    }

    #[test]
    fn monthly_excludes_transfers() {
        let instances = vec![instance(
            "To savings",
            "Transfers",
            CategoryType::Transfer,
            dec!(-500),
            date(2024, 1, 1),
        )];
        let monthly = monthly_metrics(&instances);
        assert_eq!(monthly[0].planned_income, dec!(0));
        assert_eq!(monthly[0].planned_expenses, dec!(0));
    }

    #[test]
    fn summary_variances_negate_the_plan() {
        let instances = vec![
            instance("Salary", "Salary", CategoryType::Income, dec!(5000), date(2024, 1, 1)),
            instance("Rent", "Housing", CategoryType::Expense, dec!(-1200), date(2024, 1, 5)),
        ];
        let s = summary(&instances);
        assert_eq!(s.total_planned_savings, dec!(3800));
        assert_eq!(s.actual_income, None);
        assert_eq!(s.income_variance, dec!(-5000));
        assert_eq!(s.expense_variance, dec!(-1200));
        assert_eq!(s.savings_variance, dec!(-3800));
    }

    #[test]
    fn summary_savings_rate_is_zero_without_income() {
        let instances = vec![instance(
            "Rent",
            "Housing",
            CategoryType::Expense,
            dec!(-1200),
            date(2024, 1, 1),
        )];
        let s = summary(&instances);
        assert_eq!(s.savings_rate(), dec!(0));
        assert_eq!(s.total_planned_savings, dec!(-1200));
    }

    #[test]
    fn trend_pairs_actuals_by_exact_date() {
        let forecast = ForecastData {
            from_date: date(2024, 1, 1),
            to_date: date(2024, 1, 31),
            accounts: vec![
                AccountForecast {
                    account_id: 1,
                    account_name: "Checking".to_string(),
                    currency: "USD".to_string(),
                    starting_balance: dec!(1000),
                    data_points: vec![
                        ForecastPoint { date: date(2024, 1, 10), balance: dec!(900) },
                        ForecastPoint { date: date(2024, 1, 20), balance: dec!(800) },
                    ],
                },
                AccountForecast {
                    account_id: 2,
                    account_name: "Savings".to_string(),
                    currency: "USD".to_string(),
                    starting_balance: dec!(500),
                    data_points: vec![ForecastPoint {
                        date: date(2024, 1, 10),
                        balance: dec!(600),
                    }],
                },
            ],
        };
        let reconciliations = vec![ReconciliationSummary {
            id: 1,
            account_id: 1,
            account_name: "Checking".to_string(),
            reconciliation_date: date(2024, 1, 10),
            actual_balance: dec!(1450),
            expected_balance: dec!(1500),
            difference: dec!(-50),
            note: None,
            created_at: Utc::now(),
        }];

        let trend = balance_trend(&forecast, &reconciliations);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, date(2024, 1, 10));
        assert_eq!(trend[0].planned_balance, dec!(1500));
        assert_eq!(trend[0].actual_balance, Some(dec!(1450)));
        assert_eq!(trend[1].actual_balance, None);
    }

    fn plan(income: Decimal, expense_categories: &[(&str, Decimal)]) -> Vec<ScheduledInstance> {
        let mut instances = vec![instance(
            "Salary",
            "Salary",
            CategoryType::Income,
            income,
            date(2024, 1, 1),
        )];
        for (name, amount) in expense_categories {
            instances.push(instance(
                name,
                name,
                CategoryType::Expense,
                -*amount,
                date(2024, 1, 5),
            ));
        }
        instances
    }

    #[test]
    fn low_savings_rate_recommends_saving_more() {
        let instances = plan(dec!(5000), &[("Housing", dec!(1400)), ("Food", dec!(3350))]);
        let s = summary(&instances);
        assert_eq!(s.savings_rate(), dec!(5));
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert!(recs[0].starts_with("Consider increasing your savings rate"));
        assert!(!recs.iter().any(|r| r.starts_with("Great job")));
    }

    #[test]
    fn high_savings_rate_gets_congratulated() {
        let instances = plan(dec!(5000), &[("Housing", dec!(1000)), ("Food", dec!(2000))]);
        let s = summary(&instances);
        assert_eq!(s.savings_rate(), dec!(40));
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert_eq!(recs[0], "Great job! Your savings rate is excellent.");
        assert!(!recs.iter().any(|r| r.contains("increasing your savings rate")));
    }

    #[test]
    fn thirty_percent_savings_rate_earns_no_praise() {
        let instances = plan(dec!(5000), &[("Housing", dec!(1450)), ("Food", dec!(1050)), ("Fun", dec!(1000))]);
        let s = summary(&instances);
        assert_eq!(s.savings_rate(), dec!(30));
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert!(!recs.iter().any(|r| r.starts_with("Great job")));
    }

    #[test]
    fn zero_income_plan_still_nudges_savings() {
        let instances = vec![instance(
            "Rent",
            "Housing",
            CategoryType::Expense,
            dec!(-1200),
            date(2024, 1, 1),
        )];
        let s = summary(&instances);
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert!(recs[0].starts_with("Consider increasing your savings rate"));
    }

    #[test]
    fn dominant_expense_category_is_called_out() {
        let instances = plan(dec!(5000), &[("Housing", dec!(2000)), ("Food", dec!(500))]);
        let s = summary(&instances);
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert!(recs.iter().any(|r| r.starts_with(
            "Housing is your largest expense category (40.0% of income)."
        )));
    }

    #[test]
    fn deficit_plan_warns_about_expenses() {
        let instances = plan(dec!(1000), &[("Housing", dec!(1500))]);
        let s = summary(&instances);
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert!(recs
            .iter()
            .any(|r| r.starts_with("Your planned expenses exceed your income.")));
    }

    #[test]
    fn balanced_plan_gets_the_default_message() {
        let instances = plan(dec!(5000), &[("Housing", dec!(1450)), ("Food", dec!(1450)), ("Fun", dec!(1350))]);
        let s = summary(&instances);
        // 15% savings rate, no category above 30% of income, surplus plan.
        let recs = recommendations(&s, &category_breakdown(&instances));
        assert_eq!(
            recs,
            vec!["Your financial plan looks balanced. Keep tracking your progress!".to_string()]
        );
    }
}
