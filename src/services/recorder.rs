//! Scan recorder: appends scan events to the log

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{ScanEvent, VisitorCategory},
    repository::VisitorStore,
    services::retry::RetryPolicy,
};

#[derive(Clone)]
pub struct ScanRecorder {
    store: Arc<dyn VisitorStore>,
    retry: RetryPolicy,
}

impl ScanRecorder {
    pub fn new(store: Arc<dyn VisitorStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Record a scan happening now. Failures are logged and reported as `false`.
    pub async fn record(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
        visitor_name: &str,
    ) -> bool {
        match self.try_record(visitor_id, category, visitor_name).await {
            Ok(_) => true,
            Err(AppError::Validation(msg)) => {
                tracing::debug!("Scan not recorded: {}", msg);
                false
            }
            Err(e) => {
                tracing::error!("Error recording scan for {}/{}: {}", category, visitor_id, e);
                false
            }
        }
    }

    pub async fn try_record(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
        visitor_name: &str,
    ) -> AppResult<ScanEvent> {
        self.record_at(visitor_id, category, visitor_name, Utc::now())
            .await
    }

    /// Record a scan at `scanned_at`.
    ///
    /// Every attempt re-sends the same event id, so a retry can never create a
    /// second event. Outcomes that may already have been applied are not retried.
    pub async fn record_at(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
        visitor_name: &str,
        scanned_at: DateTime<Utc>,
    ) -> AppResult<ScanEvent> {
        if visitor_id.trim().is_empty() {
            return Err(AppError::Validation("Visitor id is required".to_string()));
        }
        if visitor_name.trim().is_empty() {
            return Err(AppError::Validation("Visitor name is required".to_string()));
        }

        let event = ScanEvent::new(visitor_id, category, visitor_name, scanned_at);
        self.retry
            .run("Recording scan", || self.store.insert_scan(&event))
            .await?;

        tracing::info!(
            "Recorded scan {} for {}/{} on {}",
            event.id,
            category,
            visitor_id,
            event.scan_date
        );
        Ok(event)
    }
}
