//! Scan events and scan statistics

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::category::VisitorCategory;

/// Append-only record of one successful resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScanEvent {
    pub id: Uuid,
    pub visitor_id: String,
    pub visitor_type: VisitorCategory,
    /// Denormalized at write time
    pub visitor_name: String,
    pub scanned_at: DateTime<Utc>,
    /// Day-bucket: UTC date of `scanned_at`
    pub scan_date: NaiveDate,
}

impl ScanEvent {
    pub fn new(
        visitor_id: &str,
        category: VisitorCategory,
        visitor_name: &str,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            visitor_id: visitor_id.to_string(),
            visitor_type: category,
            visitor_name: visitor_name.to_string(),
            scanned_at,
            scan_date: scanned_at.date_naive(),
        }
    }
}

/// Row of `visitor_scans` as read back for statistics
#[derive(Debug, Clone, FromRow)]
pub struct ScanDateRow {
    pub scan_date: NaiveDate,
}

/// Scan counts for one visitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ScanStats {
    pub total: i64,
    pub today: i64,
    /// Day-bucket histogram; unordered
    #[schema(value_type = Object)]
    pub by_date: HashMap<NaiveDate, i64>,
}

impl ScanStats {
    /// Build the histogram from the day-buckets of every event
    pub fn from_dates(dates: &[NaiveDate], today: NaiveDate) -> Self {
        let mut by_date: HashMap<NaiveDate, i64> = HashMap::new();
        for date in dates {
            *by_date.entry(*date).or_insert(0) += 1;
        }
        Self {
            total: dates.len() as i64,
            today: by_date.get(&today).copied().unwrap_or(0),
            by_date,
        }
    }

    /// Histogram entries, most recent day first
    pub fn dates_newest_first(&self) -> Vec<DateCount> {
        let mut entries: Vec<DateCount> = self
            .by_date
            .iter()
            .map(|(date, count)| DateCount {
                date: *date,
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Scan statistics response, histogram sorted for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScanStatsResponse {
    pub visitor_id: String,
    pub visitor_type: VisitorCategory,
    pub total: i64,
    pub today: i64,
    pub by_date: Vec<DateCount>,
}

/// Scans per category for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRecap {
    pub date: NaiveDate,
    /// Every category, in search order
    #[schema(value_type = Object)]
    pub per_category: IndexMap<VisitorCategory, i64>,
    pub total: i64,
}

/// Query parameters for the daily recap
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RecapQuery {
    /// Day to summarize (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}
