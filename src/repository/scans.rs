//! Scan-event log repository (`visitor_scans`)

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{scan::ScanDateRow, ScanEvent, VisitorCategory},
};

#[derive(Clone)]
pub struct ScansRepository {
    pool: Pool<Postgres>,
}

impl ScansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append a scan event.
    ///
    /// Connection failures after the statement was sent surface as
    /// [`AppError::Indeterminate`].
    pub async fn insert(&self, event: &ScanEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO visitor_scans (id, visitor_id, visitor_type, visitor_name, scanned_at, scan_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id)
        .bind(&event.visitor_id)
        .bind(event.visitor_type.tag())
        .bind(&event.visitor_name)
        .bind(event.scanned_at)
        .bind(event.scan_date)
        .execute(&self.pool)
        .await
        .map_err(AppError::from_write)?;

        Ok(())
    }

    pub async fn dates_for_visitor(
        &self,
        visitor_id: &str,
        category: VisitorCategory,
    ) -> AppResult<Vec<NaiveDate>> {
        let rows = sqlx::query_as::<_, ScanDateRow>(
            "SELECT scan_date FROM visitor_scans WHERE visitor_id = $1 AND visitor_type = $2",
        )
        .bind(visitor_id)
        .bind(category.tag())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.scan_date).collect())
    }

    /// Count scan events for a category, optionally on a single day
    pub async fn count(
        &self,
        category: VisitorCategory,
        date: Option<NaiveDate>,
    ) -> AppResult<i64> {
        let total: i64 = match date {
            Some(d) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM visitor_scans WHERE visitor_type = $1 AND scan_date = $2",
                )
                .bind(category.tag())
                .bind(d)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM visitor_scans WHERE visitor_type = $1")
                    .bind(category.tag())
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(total)
    }
}
