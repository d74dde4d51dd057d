//! Scan endpoint: resolve a decoded QR payload

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{scan_code, ResolvedVisitorView, VisitorCategory},
    services::resolver::Resolve,
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScanRequest {
    /// Decoded QR payload
    #[validate(custom(function = "scan_code::validate_field"))]
    pub code: String,
    /// Category shown for an unregistered code
    pub fallback_category: Option<VisitorCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Whether the code belongs to a registered visitor
    pub found: bool,
    pub visitor: ResolvedVisitorView,
}

/// Resolve a scan code, record the scan and return the visitor view
#[utoipa::path(
    post,
    path = "/scans",
    tag = "scans",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Visitor view (sentinel when unregistered)", body = ScanResponse),
        (status = 400, description = "Invalid scan code", body = crate::error::ErrorResponse),
        (status = 503, description = "Visitor store unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn scan(
    State(state): State<crate::AppState>,
    Json(request): Json<ScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    request.validate()?;

    let response = match state.services.resolver.resolve(&request.code).await? {
        Some(visitor) => ScanResponse {
            found: true,
            visitor,
        },
        None => ScanResponse {
            found: false,
            visitor: ResolvedVisitorView::unregistered(
                request.code.trim(),
                request.fallback_category.unwrap_or(VisitorCategory::General),
            ),
        },
    };

    Ok(Json(response))
}
