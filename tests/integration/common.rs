//! In-memory [`VisitorStore`] with per-category failure injection

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use checkin_server::{
    models::{ScanEvent, VisitorCategory, VisitorRecord},
    repository::VisitorStore,
    services::Services,
    AppConfig, AppError, AppResult, AppState,
};

#[derive(Default)]
struct Inner {
    visitors: HashMap<VisitorCategory, Vec<VisitorRecord>>,
    scans: Vec<ScanEvent>,
    failing: HashSet<VisitorCategory>,
    unreachable: bool,
    lookups: Vec<VisitorCategory>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_visitor(&self, category: VisitorCategory, record: VisitorRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.visitors.entry(category).or_default().push(record);
    }

    pub fn add_scan(&self, event: ScanEvent) {
        self.inner.lock().unwrap().scans.push(event);
    }

    /// Every query against `category` fails with a transient error
    pub fn fail_category(&self, category: VisitorCategory) {
        self.inner.lock().unwrap().failing.insert(category);
    }

    /// Every query fails, including the health probe
    pub fn set_unreachable(&self) {
        self.inner.lock().unwrap().unreachable = true;
    }

    pub fn scans(&self) -> Vec<ScanEvent> {
        self.inner.lock().unwrap().scans.clone()
    }

    /// Categories probed by `find_by_code`, in call order
    pub fn lookups(&self) -> Vec<VisitorCategory> {
        self.inner.lock().unwrap().lookups.clone()
    }

    pub fn visitor(&self, category: VisitorCategory, id: &str) -> Option<VisitorRecord> {
        let inner = self.inner.lock().unwrap();
        inner
            .visitors
            .get(&category)
            .and_then(|rows| rows.iter().find(|v| v.id == id).cloned())
    }

    fn check(inner: &Inner, category: Option<VisitorCategory>) -> AppResult<()> {
        if inner.unreachable {
            return Err(AppError::TransientStore("connection refused".to_string()));
        }
        match category {
            Some(c) if inner.failing.contains(&c) => Err(AppError::TransientStore(format!(
                "relation \"{}\" unavailable",
                c.table()
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl VisitorStore for MemoryStore {
    async fn find_by_code(
        &self,
        category: VisitorCategory,
        code: &str,
    ) -> AppResult<Option<VisitorRecord>> {
        let mut inner = self.inner.lock().unwrap();
        inner.lookups.push(category);
        Self::check(&inner, Some(category))?;
        Ok(inner
            .visitors
            .get(&category)
            .and_then(|rows| rows.iter().find(|v| v.qr_code == code).cloned()))
    }

    async fn insert_scan(&self, event: &ScanEvent) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, None)?;
        if inner.scans.iter().any(|e| e.id == event.id) {
            return Err(AppError::NonRetryableStore("duplicate key".to_string()));
        }
        inner.scans.push(event.clone());
        Ok(())
    }

    async fn scan_dates(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
    ) -> AppResult<Vec<NaiveDate>> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, None)?;
        Ok(inner
            .scans
            .iter()
            .filter(|e| e.visitor_id == visitor_id && e.visitor_type == category)
            .map(|e| e.scan_date)
            .collect())
    }

    async fn count_scans(
        &self,
        category: VisitorCategory,
        date: Option<NaiveDate>,
    ) -> AppResult<i64> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, Some(category))?;
        Ok(inner
            .scans
            .iter()
            .filter(|e| e.visitor_type == category)
            .filter(|e| date.map_or(true, |d| e.scan_date == d))
            .count() as i64)
    }

    async fn set_badge_downloaded(
        &self,
        category: VisitorCategory,
        visitor_id: &str,
    ) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, Some(category))?;
        let row = inner
            .visitors
            .get_mut(&category)
            .and_then(|rows| rows.iter_mut().find(|v| v.id == visitor_id))
            .ok_or_else(|| AppError::NotFound(format!("Visitor {} not found", visitor_id)))?;
        row.badge_downloaded = true;
        Ok(())
    }

    async fn recent_visitors(
        &self,
        category: VisitorCategory,
        limit: i64,
    ) -> AppResult<Vec<VisitorRecord>> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, Some(category))?;
        let mut rows = inner.visitors.get(&category).cloned().unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn count_visitors(&self, category: VisitorCategory) -> AppResult<i64> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, Some(category))?;
        Ok(inner.visitors.get(&category).map_or(0, |rows| rows.len() as i64))
    }

    async fn ping(&self) -> AppResult<()> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, None)
    }
}

pub fn visitor(id: &str, name: &str, code: &str) -> VisitorRecord {
    VisitorRecord {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{}@example.org", id),
        phone: None,
        qr_code: code.to_string(),
        badge_downloaded: false,
        created_at: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).single(),
        extra: serde_json::Map::new(),
    }
}

/// Scan event of a visitor on a fixed day
pub fn scan_on(id: &str, category: VisitorCategory, date: NaiveDate) -> ScanEvent {
    let at = Utc.from_utc_datetime(&date.and_hms_opt(10, 0, 0).unwrap());
    ScanEvent::new(id, category, "Someone", at)
}

pub fn services(store: &MemoryStore) -> Services {
    Services::new(Arc::new(store.clone()), &AppConfig::default())
}

pub fn app_state(store: &MemoryStore) -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services(store)),
    }
}
