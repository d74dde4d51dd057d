//! Store connectivity probe

use std::sync::Arc;

use crate::{models::StoreHealth, repository::VisitorStore};

#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn VisitorStore>,
}

impl HealthService {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    pub async fn check(&self) -> StoreHealth {
        match self.store.ping().await {
            Ok(()) => StoreHealth {
                is_healthy: true,
                tables_accessible: true,
                error: None,
            },
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                StoreHealth {
                    is_healthy: false,
                    tables_accessible: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
