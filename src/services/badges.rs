//! Badge-download tracker

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::VisitorCategory,
    repository::VisitorStore,
    services::retry::RetryPolicy,
};

#[derive(Clone)]
pub struct BadgeTracker {
    store: Arc<dyn VisitorStore>,
    retry: RetryPolicy,
}

impl BadgeTracker {
    pub fn new(store: Arc<dyn VisitorStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Mark the visitor's badge as downloaded; `false` on any failure
    pub async fn mark_downloaded(&self, category: VisitorCategory, visitor_id: &str) -> bool {
        match self.try_mark_downloaded(category, visitor_id).await {
            Ok(()) => true,
            Err(AppError::Validation(msg)) => {
                tracing::debug!("Badge not updated: {}", msg);
                false
            }
            Err(e) => {
                tracing::error!("Error updating badge status for {}/{}: {}", category, visitor_id, e);
                false
            }
        }
    }

    /// Set `badge_downloaded = true`. Safe to repeat.
    pub async fn try_mark_downloaded(
        &self,
        category: VisitorCategory,
        visitor_id: &str,
    ) -> AppResult<()> {
        if visitor_id.trim().is_empty() {
            return Err(AppError::Validation("Visitor id is required".to_string()));
        }

        self.retry
            .run("Updating badge status", || {
                self.store.set_badge_downloaded(category, visitor_id)
            })
            .await?;

        tracing::info!("Badge marked downloaded for {}/{}", category, visitor_id);
        Ok(())
    }

    /// Parse a raw category tag before updating
    pub async fn try_mark_downloaded_tag(&self, category: &str, visitor_id: &str) -> AppResult<()> {
        let category: VisitorCategory = category.parse()?;
        self.try_mark_downloaded(category, visitor_id).await
    }
}
