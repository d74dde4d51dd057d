//! Visitor resolution: scan code -> visitor view, with scan accounting

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{scan_code, ResolvedVisitorView, ScanStats, VisitorCategory, VisitorRecord},
    repository::VisitorStore,
    services::{recorder::ScanRecorder, stats::ScanStatsService},
};

/// Anything able to turn a raw scan payload into a visitor view.
///
/// `Ok(None)` means no category holds the code.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, raw_code: &str) -> AppResult<Option<ResolvedVisitorView>>;
}

#[derive(Clone)]
pub struct VisitorResolver {
    store: Arc<dyn VisitorStore>,
    recorder: ScanRecorder,
    stats: ScanStatsService,
}

impl VisitorResolver {
    pub fn new(store: Arc<dyn VisitorStore>, recorder: ScanRecorder, stats: ScanStatsService) -> Self {
        Self {
            store,
            recorder,
            stats,
        }
    }

    /// Search the category tables in order and return the first match.
    ///
    /// Lookups run one after the other; a failing category is skipped. When
    /// every category failed the store is considered unreachable.
    pub async fn find(&self, code: &str) -> AppResult<Option<(VisitorCategory, VisitorRecord)>> {
        let mut failures = 0;
        for category in VisitorCategory::ALL {
            match self.store.find_by_code(category, code).await {
                Ok(Some(visitor)) => return Ok(Some((category, visitor))),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Error searching {}: {}", category, e);
                    failures += 1;
                }
            }
        }

        if failures == VisitorCategory::ALL.len() {
            return Err(AppError::TransientStore(
                "No visitor category could be searched".to_string(),
            ));
        }
        Ok(None)
    }

    /// Record the scan and build the view.
    ///
    /// Counts are read before the insert and reported as prior + 1. If they
    /// cannot be read the view only counts the current scan.
    async fn account(&self, category: VisitorCategory, visitor: VisitorRecord) -> ResolvedVisitorView {
        let now = Utc::now();
        let prior: AppResult<ScanStats> = self
            .stats
            .try_stats_on(&visitor.id, category, now.date_naive())
            .await;

        let recorded = match self
            .recorder
            .record_at(&visitor.id, category, &visitor.full_name, now)
            .await
        {
            Ok(_) => 1,
            Err(e) => {
                tracing::error!("Scan of {}/{} was not recorded: {}", category, visitor.id, e);
                0
            }
        };

        let (total_scans, today_scans) = match prior {
            Ok(stats) => (stats.total + recorded, stats.today + recorded),
            Err(e) => {
                tracing::warn!("Scan statistics unavailable for {}/{}: {}", category, visitor.id, e);
                (0, recorded)
            }
        };

        ResolvedVisitorView {
            visitor,
            visitor_type: category,
            total_scans,
            today_scans,
            last_scan: Some(now),
        }
    }
}

#[async_trait]
impl Resolve for VisitorResolver {
    async fn resolve(&self, raw_code: &str) -> AppResult<Option<ResolvedVisitorView>> {
        let code = scan_code::validate(raw_code)?;

        match self.find(code).await? {
            Some((category, visitor)) => {
                tracing::info!("Code resolved to {}/{}", category, visitor.id);
                Ok(Some(self.account(category, visitor).await))
            }
            None => {
                tracing::info!("Code not registered in any category");
                Ok(None)
            }
        }
    }
}
