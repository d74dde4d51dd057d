//! Business logic services

pub mod badges;
pub mod health;
pub mod recap;
pub mod recorder;
pub mod registry;
pub mod resolver;
pub mod retry;
pub mod stats;

use std::sync::Arc;

use crate::{config::AppConfig, repository::VisitorStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub resolver: resolver::VisitorResolver,
    pub recorder: recorder::ScanRecorder,
    pub stats: stats::ScanStatsService,
    pub badges: badges::BadgeTracker,
    pub recap: recap::DailyRecapService,
    pub registry: registry::RegistryService,
    pub health: health::HealthService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn VisitorStore>, config: &AppConfig) -> Self {
        let retry = retry::RetryPolicy::from(&config.retry);
        let recorder = recorder::ScanRecorder::new(store.clone(), retry);
        let stats = stats::ScanStatsService::new(store.clone());

        Self {
            resolver: resolver::VisitorResolver::new(store.clone(), recorder.clone(), stats.clone()),
            recorder,
            stats,
            badges: badges::BadgeTracker::new(store.clone(), retry),
            recap: recap::DailyRecapService::new(store.clone()),
            registry: registry::RegistryService::new(store.clone(), config.registry.clone()),
            health: health::HealthService::new(store),
        }
    }
}
