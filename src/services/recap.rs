//! Daily recap: scans per category on a given day

use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::{
    models::{DailyRecap, VisitorCategory},
    repository::VisitorStore,
};

#[derive(Clone)]
pub struct DailyRecapService {
    store: Arc<dyn VisitorStore>,
}

impl DailyRecapService {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Count scan events per category on `date`. A failing category counts as zero.
    pub async fn recap(&self, date: NaiveDate) -> DailyRecap {
        let mut per_category = IndexMap::with_capacity(VisitorCategory::ALL.len());
        for category in VisitorCategory::ALL {
            let count = match self.store.count_scans(category, Some(date)).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!("Error fetching {} scans for {}: {}", category, date, e);
                    0
                }
            };
            per_category.insert(category, count);
        }

        DailyRecap {
            date,
            total: per_category.values().sum(),
            per_category,
        }
    }
}
