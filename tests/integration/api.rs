//! HTTP surface driven through the router without a socket

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use checkin_server::{api::create_router, models::VisitorCategory};

use crate::common::{app_state, visitor, MemoryStore};

fn app(store: &MemoryStore) -> Router {
    create_router(app_state(store))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(app(&MemoryStore::new()), Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_store() {
    let store = MemoryStore::new();
    let (status, _) = send(app(&store), Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    store.set_unreachable();
    let (status, body) = send(app(&store), Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["store"]["is_healthy"], false);
}

#[tokio::test]
async fn test_scan_registered_visitor() {
    let store = MemoryStore::new();
    store.add_visitor(
        VisitorCategory::Professional,
        visitor("p-7", "Dana Roux", "QR-0042"),
    );

    let (status, body) = send(
        app(&store),
        Method::POST,
        "/api/v1/scans",
        Some(json!({ "code": "QR-0042" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["visitor"]["id"], "p-7");
    assert_eq!(body["visitor"]["visitor_type"], "professional_visitors");
    assert_eq!(body["visitor"]["total_scans"], 1);
    assert_eq!(body["visitor"]["today_scans"], 1);
    assert_eq!(store.scans().len(), 1);
}

#[tokio::test]
async fn test_scan_unregistered_code_returns_sentinel() {
    let store = MemoryStore::new();

    let (status, body) = send(
        app(&store),
        Method::POST,
        "/api/v1/scans",
        Some(json!({ "code": "QR-404", "fallback_category": "exhibitors" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["visitor"]["id"], "new");
    assert_eq!(body["visitor"]["full_name"], "Unregistered User");
    assert_eq!(body["visitor"]["visitor_type"], "exhibitors");
    assert!(store.scans().is_empty());
}

#[tokio::test]
async fn test_scan_rejects_invalid_code() {
    let (status, body) = send(
        app(&MemoryStore::new()),
        Method::POST,
        "/api/v1/scans",
        Some(json!({ "code": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_scan_with_unreachable_store() {
    let store = MemoryStore::new();
    store.set_unreachable();

    let (status, _) = send(
        app(&store),
        Method::POST,
        "/api/v1/scans",
        Some(json!({ "code": "QR-0042" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_visitor_stats_and_badge() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::Vip, visitor("v-1", "Val", "VIP-1"));
    send(
        app(&store),
        Method::POST,
        "/api/v1/scans",
        Some(json!({ "code": "VIP-1" })),
    )
    .await;

    let (status, body) = send(app(&store), Method::GET, "/api/v1/visitors/vip/v-1/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["by_date"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(app(&store), Method::PUT, "/api/v1/visitors/vip/v-1/badge", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.visitor(VisitorCategory::Vip, "v-1").unwrap().badge_downloaded);

    let (status, _) = send(app(&store), Method::PUT, "/api/v1/visitors/vip/nobody/badge", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&store), Method::PUT, "/api/v1/visitors/aliens/v-1/badge", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recap_and_categories() {
    let store = MemoryStore::new();

    let (status, body) = send(app(&store), Method::GET, "/api/v1/recap?date=2025-03-10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-03-10");
    assert_eq!(body["total"], 0);

    let (status, _) = send(app(&store), Method::GET, "/api/v1/recap?date=10/03/2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(&store), Method::GET, "/api/v1/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(VisitorCategory::ALL.len()));
    assert_eq!(body[0]["tag"], "visitors");
}

#[tokio::test]
async fn test_registry_limit_is_validated() {
    let store = MemoryStore::new();
    let (status, _) = send(app(&store), Method::GET, "/api/v1/registry?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(&store), Method::GET, "/api/v1/registry?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
