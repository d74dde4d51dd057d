//! API handlers for the check-in REST endpoints

pub mod health;
pub mod openapi;
pub mod recap;
pub mod scans;
pub mod visitors;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Scanning
        .route("/scans", post(scans::scan))
        // Visitors
        .route("/categories", get(visitors::list_categories))
        .route("/visitors/:category/:id/stats", get(visitors::get_visitor_stats))
        .route("/visitors/:category/:id/badge", put(visitors::mark_badge_downloaded))
        // Statistics
        .route("/recap", get(recap::get_recap))
        .route("/registry", get(recap::get_registry))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
