//! Repository layer for the visitor store
//!
//! [`VisitorStore`] is the capability every service receives. [`Repository`]
//! implements it over a Postgres pool; tests substitute their own stores.

pub mod scans;
pub mod visitors;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{ScanEvent, VisitorCategory, VisitorRecord},
};

/// Single-table operations against the remote visitor store.
///
/// Every call is one independent round-trip; there is no transaction spanning
/// calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Exact match on the scan-code column of one category table
    async fn find_by_code(
        &self,
        category: VisitorCategory,
        code: &str,
    ) -> AppResult<Option<VisitorRecord>>;

    /// Append one scan event
    async fn insert_scan(&self, event: &ScanEvent) -> AppResult<()>;

    /// Day-buckets of every scan event of a visitor
    async fn scan_dates(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
    ) -> AppResult<Vec<NaiveDate>>;

    /// Number of scan events for a category, optionally restricted to one day
    async fn count_scans(
        &self,
        category: VisitorCategory,
        date: Option<NaiveDate>,
    ) -> AppResult<i64>;

    /// Set the badge-downloaded flag. Fails with `NotFound` when no row matches.
    async fn set_badge_downloaded(
        &self,
        category: VisitorCategory,
        visitor_id: &str,
    ) -> AppResult<()>;

    /// Newest registrations of a category
    async fn recent_visitors(
        &self,
        category: VisitorCategory,
        limit: i64,
    ) -> AppResult<Vec<VisitorRecord>>;

    async fn count_visitors(&self, category: VisitorCategory) -> AppResult<i64>;

    /// Cheap connectivity probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub visitors: visitors::VisitorsRepository,
    pub scans: scans::ScansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            scans: scans::ScansRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Open the connection pool described by `config`.
///
/// A missing URL is reported as [`AppError::Config`] instead of deferring the
/// failure to the first query.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Repository> {
    if config.url.trim().is_empty() {
        return Err(AppError::Config(
            "database.url is not set (use DATABASE_URL or CHECKIN__DATABASE__URL)".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    Ok(Repository::new(pool))
}

#[async_trait]
impl VisitorStore for Repository {
    async fn find_by_code(
        &self,
        category: VisitorCategory,
        code: &str,
    ) -> AppResult<Option<VisitorRecord>> {
        self.visitors.find_by_code(category, code).await
    }

    async fn insert_scan(&self, event: &ScanEvent) -> AppResult<()> {
        self.scans.insert(event).await
    }

    async fn scan_dates(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
    ) -> AppResult<Vec<NaiveDate>> {
        self.scans.dates_for_visitor(visitor_id, category).await
    }

    async fn count_scans(
        &self,
        category: VisitorCategory,
        date: Option<NaiveDate>,
    ) -> AppResult<i64> {
        self.scans.count(category, date).await
    }

    async fn set_badge_downloaded(
        &self,
        category: VisitorCategory,
        visitor_id: &str,
    ) -> AppResult<()> {
        self.visitors.set_badge_downloaded(category, visitor_id).await
    }

    async fn recent_visitors(
        &self,
        category: VisitorCategory,
        limit: i64,
    ) -> AppResult<Vec<VisitorRecord>> {
        self.visitors.recent(category, limit).await
    }

    async fn count_visitors(&self, category: VisitorCategory) -> AppResult<i64> {
        self.visitors.count(category).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.visitors.ping().await
    }
}
