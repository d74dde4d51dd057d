//! Per-visitor scan statistics

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    error::AppResult,
    models::{ScanStats, VisitorCategory},
    repository::VisitorStore,
};

#[derive(Clone)]
pub struct ScanStatsService {
    store: Arc<dyn VisitorStore>,
}

impl ScanStatsService {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Best-effort statistics for today; any store failure yields zero counts.
    pub async fn stats(&self, visitor_id: &str, category: VisitorCategory) -> ScanStats {
        match self
            .try_stats_on(visitor_id, category, Utc::now().date_naive())
            .await
        {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!("Error fetching scan stats for {}/{}: {}", category, visitor_id, e);
                ScanStats::default()
            }
        }
    }

    /// Statistics with `today` as the current day-bucket, failures propagated
    pub async fn try_stats_on(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
        today: NaiveDate,
    ) -> AppResult<ScanStats> {
        let dates = self.store.scan_dates(visitor_id, category).await?;
        Ok(ScanStats::from_dates(&dates, today))
    }
}
