//! Registry overview: recent registrations and dashboard totals

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    config::RegistryConfig,
    models::{RegisteredVisitor, RegistryOverview, VisitorCategory},
    repository::VisitorStore,
};

#[derive(Clone)]
pub struct RegistryService {
    store: Arc<dyn VisitorStore>,
    config: RegistryConfig,
}

impl RegistryService {
    pub fn new(store: Arc<dyn VisitorStore>, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    pub async fn overview(&self, per_category: Option<i64>) -> RegistryOverview {
        self.overview_on(per_category, Utc::now().date_naive()).await
    }

    /// Build the dashboard with `today` as the current day.
    ///
    /// A category whose queries fail is logged and left out.
    pub async fn overview_on(&self, per_category: Option<i64>, today: NaiveDate) -> RegistryOverview {
        let limit = per_category.unwrap_or(self.config.recent_per_category);
        let mut overview = RegistryOverview::default();

        for category in VisitorCategory::ALL {
            let visitors = match self.store.recent_visitors(category, limit).await {
                Ok(v) => v,
                Err(e) => {
                    tracing::error!("Error fetching {}: {}", category, e);
                    continue;
                }
            };

            if category.counts_as_attendee() {
                match self.store.count_visitors(category).await {
                    Ok(count) => overview.total_visitors += count,
                    Err(e) => tracing::warn!("Error counting {}: {}", category, e),
                }
            }

            match self.store.count_scans(category, None).await {
                Ok(count) => overview.total_scans += count,
                Err(e) => tracing::warn!("Error counting {} scans: {}", category, e),
            }

            overview.badges_downloaded +=
                visitors.iter().filter(|v| v.badge_downloaded).count() as i64;

            overview.recent.extend(visitors.into_iter().map(|visitor| RegisteredVisitor {
                visitor,
                visitor_type: category,
            }));
        }

        // Newest first; rows without a creation date go last
        overview
            .recent
            .sort_by(|a, b| b.visitor.created_at.cmp(&a.visitor.created_at));
        overview.registered_today = overview
            .recent
            .iter()
            .filter(|r| r.visitor.created_at.map(|t| t.date_naive()) == Some(today))
            .count() as i64;
        overview.recent.truncate(self.config.recent_total);

        overview
    }
}
