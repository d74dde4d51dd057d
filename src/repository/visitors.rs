//! Category tables repository
//!
//! Table names come from [`VisitorCategory::table`] only, never from input.
//! Rows are read through `to_jsonb` so category-specific columns pass through
//! into [`VisitorRecord::extra`] without a per-table struct.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{VisitorCategory, VisitorRecord},
};

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

fn decode_row(category: VisitorCategory, row: serde_json::Value) -> AppResult<VisitorRecord> {
    serde_json::from_value(row).map_err(|e| {
        AppError::Internal(format!("Malformed {} row: {}", category.table(), e))
    })
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find the visitor whose QR code equals `code`
    pub async fn find_by_code(
        &self,
        category: VisitorCategory,
        code: &str,
    ) -> AppResult<Option<VisitorRecord>> {
        let query = format!(
            "SELECT to_jsonb(t) FROM {} t WHERE t.qr_code = $1 LIMIT 1",
            category.table()
        );

        let row: Option<serde_json::Value> = sqlx::query_scalar(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| decode_row(category, r)).transpose()
    }

    /// Flag the visitor's badge as downloaded (true stays true)
    pub async fn set_badge_downloaded(
        &self,
        category: VisitorCategory,
        visitor_id: &str,
    ) -> AppResult<()> {
        let query = format!(
            "UPDATE {} SET badge_downloaded = TRUE WHERE id::text = $1",
            category.table()
        );

        let result = sqlx::query(&query)
            .bind(visitor_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Visitor {} not found in {}",
                visitor_id,
                category.table()
            )));
        }
        Ok(())
    }

    /// Newest registrations first
    pub async fn recent(
        &self,
        category: VisitorCategory,
        limit: i64,
    ) -> AppResult<Vec<VisitorRecord>> {
        let query = format!(
            "SELECT to_jsonb(t) FROM {} t ORDER BY t.created_at DESC LIMIT $1",
            category.table()
        );

        let rows: Vec<serde_json::Value> = sqlx::query_scalar(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| decode_row(category, r)).collect()
    }

    pub async fn count(&self, category: VisitorCategory) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) FROM {}", category.table());
        let total: i64 = sqlx::query_scalar(&query).fetch_one(&self.pool).await?;
        Ok(total)
    }

    /// Single-row select on the general visitors table
    pub async fn ping(&self) -> AppResult<()> {
        let query = format!(
            "SELECT 1 FROM {} LIMIT 1",
            VisitorCategory::General.table()
        );
        sqlx::query(&query).fetch_optional(&self.pool).await?;
        Ok(())
    }
}
