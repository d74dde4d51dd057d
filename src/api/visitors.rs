//! Per-visitor endpoints: scan statistics and badge tracking

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        category::CategoryInfo,
        scan::ScanStatsResponse,
        VisitorCategory,
    },
};

/// List visitor categories in search order
#[utoipa::path(
    get,
    path = "/categories",
    tag = "visitors",
    responses(
        (status = 200, description = "Visitor categories", body = Vec<CategoryInfo>)
    )
)]
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(VisitorCategory::ALL.into_iter().map(CategoryInfo::from).collect())
}

/// Scan statistics of one visitor
#[utoipa::path(
    get,
    path = "/visitors/{category}/{id}/stats",
    tag = "visitors",
    params(
        ("category" = String, Path, description = "Visitor category tag"),
        ("id" = String, Path, description = "Visitor ID")
    ),
    responses(
        (status = 200, description = "Scan statistics, most recent day first", body = ScanStatsResponse),
        (status = 400, description = "Unknown category", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_visitor_stats(
    State(state): State<crate::AppState>,
    Path((category, id)): Path<(String, String)>,
) -> AppResult<Json<ScanStatsResponse>> {
    let category: VisitorCategory = category.parse()?;
    let stats = state
        .services
        .stats
        .try_stats_on(&id, category, Utc::now().date_naive())
        .await?;

    Ok(Json(ScanStatsResponse {
        by_date: stats.dates_newest_first(),
        visitor_id: id,
        visitor_type: category,
        total: stats.total,
        today: stats.today,
    }))
}

/// Mark a visitor's badge as downloaded
#[utoipa::path(
    put,
    path = "/visitors/{category}/{id}/badge",
    tag = "visitors",
    params(
        ("category" = String, Path, description = "Visitor category tag"),
        ("id" = String, Path, description = "Visitor ID")
    ),
    responses(
        (status = 204, description = "Badge marked downloaded"),
        (status = 400, description = "Unknown category", body = crate::error::ErrorResponse),
        (status = 404, description = "Visitor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_badge_downloaded(
    State(state): State<crate::AppState>,
    Path((category, id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .services
        .badges
        .try_mark_downloaded_tag(&category, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
