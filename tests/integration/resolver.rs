//! Check-in flows through the service layer

use chrono::{Duration, Utc};
use tokio_test::assert_ok;

use checkin_server::{
    models::{ResolvedVisitorView, VisitorCategory},
    services::resolver::Resolve,
    AppError,
};

use crate::common::{scan_on, services, visitor, MemoryStore};

#[tokio::test]
async fn test_first_scan_of_professional_visitor() {
    let store = MemoryStore::new();
    store.add_visitor(
        VisitorCategory::Professional,
        visitor("p-7", "Dana Roux", "QR-0042"),
    );
    let services = services(&store);

    let view = assert_ok!(services.resolver.resolve("QR-0042").await).expect("registered");

    assert_eq!(view.visitor.id, "p-7");
    assert_eq!(view.visitor_type, VisitorCategory::Professional);
    assert_eq!(view.total_scans, 1);
    assert_eq!(view.today_scans, 1);

    let scans = store.scans();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].visitor_id, "p-7");
    assert_eq!(scans[0].visitor_type, VisitorCategory::Professional);
    assert_eq!(scans[0].visitor_name, "Dana Roux");
    assert_eq!(scans[0].scan_date, Utc::now().date_naive());
}

#[tokio::test]
async fn test_repeat_scan_adds_to_history() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::Press, visitor("j-1", "Ana Lenz", "PRESS-1"));
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    store.add_scan(scan_on("j-1", VisitorCategory::Press, yesterday));
    store.add_scan(scan_on("j-1", VisitorCategory::Press, yesterday));
    let services = services(&store);

    let view = assert_ok!(services.resolver.resolve("PRESS-1").await).expect("registered");
    assert_eq!(view.total_scans, 3);
    assert_eq!(view.today_scans, 1);
}

#[tokio::test]
async fn test_first_matching_category_wins() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::Vip, visitor("v-1", "In Vip", "SHARED"));
    store.add_visitor(VisitorCategory::Press, visitor("j-1", "In Press", "SHARED"));
    let services = services(&store);

    let view = assert_ok!(services.resolver.resolve("SHARED").await).expect("registered");
    assert_eq!(view.visitor_type, VisitorCategory::Press);
    assert_eq!(
        store.lookups(),
        vec![
            VisitorCategory::General,
            VisitorCategory::Professional,
            VisitorCategory::Press
        ]
    );
}

#[tokio::test]
async fn test_code_is_trimmed_before_lookup() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::Staff, visitor("s-1", "Sam", "STAFF-9"));
    let services = services(&store);

    let view = assert_ok!(services.resolver.resolve("  STAFF-9\n").await);
    assert!(view.is_some());
}

#[tokio::test]
async fn test_unknown_code_writes_nothing() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::General, visitor("g-1", "Gil", "QR-1"));
    let services = services(&store);

    let view = assert_ok!(services.resolver.resolve("QR-404").await);
    assert!(view.is_none());
    assert!(store.scans().is_empty());
    assert_eq!(store.lookups().len(), VisitorCategory::ALL.len());

    let sentinel = ResolvedVisitorView::unregistered("QR-404", VisitorCategory::Exhibitor);
    assert!(!sentinel.is_registered());
    assert_eq!(sentinel.total_scans, 0);
}

#[tokio::test]
async fn test_invalid_code_never_reaches_store() {
    let store = MemoryStore::new();
    let services = services(&store);

    for code in ["", "   ", "ab", "bad\u{7}code"] {
        let result = services.resolver.resolve(code).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "{:?}", code);
    }
    assert!(store.lookups().is_empty());
}

#[tokio::test]
async fn test_failing_category_is_skipped() {
    let store = MemoryStore::new();
    store.fail_category(VisitorCategory::General);
    store.fail_category(VisitorCategory::Professional);
    store.add_visitor(VisitorCategory::Exhibitor, visitor("e-3", "Booth 12", "EXH-3"));
    let services = services(&store);

    let view = assert_ok!(services.resolver.resolve("EXH-3").await).expect("registered");
    assert_eq!(view.visitor_type, VisitorCategory::Exhibitor);
    assert_eq!(store.scans().len(), 1);
}

#[tokio::test]
async fn test_unreachable_store_is_transient() {
    let store = MemoryStore::new();
    store.set_unreachable();
    let services = services(&store);

    let result = services.resolver.resolve("QR-0042").await;
    assert!(matches!(result, Err(AppError::TransientStore(_))));
    assert!(!services.health.check().await.is_healthy);
}

#[tokio::test]
async fn test_daily_recap_counts_every_category() {
    let store = MemoryStore::new();
    let day = chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    for _ in 0..3 {
        store.add_scan(scan_on("g-1", VisitorCategory::General, day));
    }
    for _ in 0..2 {
        store.add_scan(scan_on("p-1", VisitorCategory::Professional, day));
    }
    store.add_scan(scan_on("p-1", VisitorCategory::Professional, day.succ_opt().unwrap()));
    let services = services(&store);

    let recap = services.recap.recap(day).await;
    assert_eq!(recap.per_category.len(), VisitorCategory::ALL.len());
    assert_eq!(recap.per_category[&VisitorCategory::General], 3);
    assert_eq!(recap.per_category[&VisitorCategory::Professional], 2);
    assert_eq!(recap.per_category[&VisitorCategory::Vip], 0);
    assert_eq!(recap.total, 5);
}

#[tokio::test]
async fn test_badge_download_is_idempotent() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::Conference, visitor("c-1", "Cy", "CONF-1"));
    let services = services(&store);

    assert!(services.badges.mark_downloaded(VisitorCategory::Conference, "c-1").await);
    assert!(services.badges.mark_downloaded(VisitorCategory::Conference, "c-1").await);
    assert!(store.visitor(VisitorCategory::Conference, "c-1").unwrap().badge_downloaded);

    assert!(!services.badges.mark_downloaded(VisitorCategory::Conference, "missing").await);
}

#[tokio::test]
async fn test_registry_overview_totals() {
    let store = MemoryStore::new();
    store.add_visitor(VisitorCategory::General, visitor("g-1", "Gil", "QR-1"));
    store.add_visitor(VisitorCategory::Professional, visitor("p-1", "Pat", "QR-2"));
    store.add_visitor(VisitorCategory::Staff, visitor("s-1", "Sam", "QR-3"));
    let services = services(&store);

    assert_ok!(services.resolver.resolve("QR-2").await);
    let overview = services.registry.overview(Some(10)).await;

    assert_eq!(overview.recent.len(), 3);
    assert_eq!(overview.total_visitors, 2);
    assert_eq!(overview.total_scans, 1);
    assert_eq!(overview.badges_downloaded, 0);
}
