//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, recap, scans, visitors};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitor Check-in API",
        version = "0.1.0",
        description = "QR scan resolution, scan accounting and visitor statistics",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Scanning
        scans::scan,
        // Visitors
        visitors::list_categories,
        visitors::get_visitor_stats,
        visitors::mark_badge_downloaded,
        // Stats
        recap::get_recap,
        recap::get_registry,
    ),
    components(
        schemas(
            // Scanning
            scans::ScanRequest,
            scans::ScanResponse,
            crate::models::visitor::VisitorRecord,
            crate::models::visitor::ResolvedVisitorView,
            crate::models::category::VisitorCategory,
            crate::models::category::CategoryInfo,
            // Stats
            crate::models::scan::ScanStatsResponse,
            crate::models::scan::DateCount,
            crate::models::scan::DailyRecap,
            crate::models::scan::RecapQuery,
            crate::models::registry::RegistryOverview,
            crate::models::registry::RegisteredVisitor,
            crate::models::registry::RegistryQuery,
            crate::models::registry::StoreHealth,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scans", description = "QR code resolution"),
        (name = "visitors", description = "Visitor statistics and badges"),
        (name = "stats", description = "Daily recap and registry dashboard")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
