//! Analysis orchestration: concurrent upstream fetch plus calculation.

use std::sync::Arc;

use tracing::info;

use crate::analysis::calculator;
use crate::analysis::types::{AnalysisData, AnalysisQuery};
use crate::application::ports::{
    ForecastPort, ForecastQuery, PortError, ReconciliationPort, SchedulePort,
};

/// Builds the full plan-vs-actual report for a query.
///
/// The three upstream fetches run concurrently; any failure fails the whole
/// report since a partial analysis would be misleading.
pub struct AnalysisService<F, R, S> {
    forecast: Arc<F>,
    reconciliation: Arc<R>,
    schedule: Arc<S>,
}

impl<F, R, S> AnalysisService<F, R, S>
where
    F: ForecastPort,
    R: ReconciliationPort,
    S: SchedulePort,
{
    /// Create a service over the three upstream ports.
    pub fn new(forecast: Arc<F>, reconciliation: Arc<R>, schedule: Arc<S>) -> Self {
        Self {
            forecast,
            reconciliation,
            schedule,
        }
    }

    /// Fetch plan, forecast, and reconciliations, then aggregate.
    pub async fn get_analysis(&self, query: &AnalysisQuery) -> Result<AnalysisData, PortError> {
        let forecast_query = ForecastQuery {
            account_ids: query.account_ids.clone(),
            from: query.from,
            to: query.to,
        };

        let (instances, forecast, reconciliations) = tokio::try_join!(
            self.schedule.get_scheduled_instances(query.from, query.to),
            self.forecast.get_forecast(&forecast_query),
            self.reconciliation.list_reconciliations(None),
        )?;

        // Reconciliations come back unbounded; only pair the ones inside
        // the window.
        let in_window: Vec<_> = reconciliations
            .into_iter()
            .filter(|r| r.reconciliation_date >= query.from && r.reconciliation_date <= query.to)
            .collect();

        info!(
            instances = instances.len(),
            reconciliations = in_window.len(),
            from = %query.from,
            to = %query.to,
            "building analysis report"
        );

        let categories = calculator::category_breakdown(&instances);
        let monthly = calculator::monthly_metrics(&instances);
        let summary = calculator::summary(&instances);
        let trend = calculator::balance_trend(&forecast, &in_window);
        let recommendations = calculator::recommendations(&summary, &categories);

        Ok(AnalysisData {
            from: query.from,
            to: query.to,
            categories,
            monthly,
            summary,
            trend,
            recommendations,
        })
    }
}
