//! Daily recap and registry dashboard endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        registry::RegistryQuery,
        scan::RecapQuery,
        DailyRecap, RegistryOverview,
    },
};

/// Scans per visitor category for one day
#[utoipa::path(
    get,
    path = "/recap",
    tag = "stats",
    params(RecapQuery),
    responses(
        (status = 200, description = "Daily recap", body = DailyRecap),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_recap(
    State(state): State<crate::AppState>,
    Query(query): Query<RecapQuery>,
) -> AppResult<Json<DailyRecap>> {
    let date = match query.date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date format (expected YYYY-MM-DD)".to_string()))?,
        None => Utc::now().date_naive(),
    };

    Ok(Json(state.services.recap.recap(date).await))
}

/// Recent registrations and dashboard totals
#[utoipa::path(
    get,
    path = "/registry",
    tag = "stats",
    params(RegistryQuery),
    responses(
        (status = 200, description = "Registry overview", body = RegistryOverview)
    )
)]
pub async fn get_registry(
    State(state): State<crate::AppState>,
    Query(query): Query<RegistryQuery>,
) -> AppResult<Json<RegistryOverview>> {
    query.validate()?;
    Ok(Json(state.services.registry.overview(query.limit).await))
}
