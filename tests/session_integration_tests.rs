//! Integration Tests for the Session over HTTP
//!
//! Runs a mock pricing service on an ephemeral port and drives the real
//! `HttpService` through the session controller.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use storefront::cart::CartStore;
use storefront::catalog::SortKey;
use storefront::client::{HttpService, RemoteService};
use storefront::session::{ConnectionStatus, SessionEvent, StageOutcome};
use storefront::storage::{FileStorage, MemoryStorage};
use storefront::{SessionController, StorefrontError};

// == Mock Pricing Service ==

#[derive(Clone, Default)]
struct MockState {
    hits: Arc<AtomicUsize>,
    insights_down: Arc<AtomicBool>,
    products_garbled: Arc<AtomicBool>,
}

impl MockState {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn products_json() -> Value {
    json!([
        {"product_id": 1, "name": "Rice", "category": "Grains", "base_price": 50.0,
         "stock": 20, "dynamic_price": 52.5, "discount_percent": 5.0, "demand_level": "High"},
        {"product_id": 2, "name": "Milk", "category": "Dairy", "base_price": 42.0,
         "stock": 5, "dynamic_price": 40.0, "discount_percent": -4.76, "demand_level": "Low"},
        {"product_id": 3, "name": "Cheddar", "category": "Dairy", "base_price": 120.0,
         "stock": 12, "dynamic_price": 126.0, "discount_percent": 5.0, "demand_level": "Medium"}
    ])
}

async fn health(State(state): State<MockState>) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "status": "success",
        "message": "Dynamic Pricing API is running",
        "version": "1.0.0"
    }))
}

async fn categories(State(state): State<MockState>) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({"categories": ["Dairy", "Grains"], "total": 2}))
}

async fn products(State(state): State<MockState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if state.products_garbled.load(Ordering::SeqCst) {
        return (StatusCode::OK, "<html>oops</html>").into_response();
    }
    Json(products_json()).into_response()
}

async fn product(State(state): State<MockState>, Path(id): Path<u32>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let Some(mut product) = products_json()
        .as_array()
        .and_then(|all| all.iter().find(|p| p["product_id"] == id).cloned())
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("Product {} not found", id)})),
        )
            .into_response();
    };
    product["demand_ratio"] = json!(1.43);
    product["sales_7_days"] = json!(30);
    product["sales_30_days"] = json!(110);
    Json(product).into_response()
}

async fn insights(State(state): State<MockState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if state.insights_down.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "total_products": 3,
        "total_stock": 37,
        "total_sales_7days": 64,
        "total_sales_30days": 250,
        "average_price": 70.67,
        "top_demand_products": [{"product_id": 1, "name": "Rice", "demand_ratio": 1.43}],
        "low_stock_alerts": [{"product_id": 2, "name": "Milk", "stock": 5}],
        "category_statistics": {
            "Dairy": {"product_count": 2, "base_price": 81.0, "stock": 17, "sales_7": 34},
            "Grains": {"product_count": 1, "base_price": 50.0, "stock": 20, "sales_7": 30}
        }
    }))
    .into_response()
}

async fn spawn_mock(state: MockState) -> SocketAddr {
    spawn_mock_at("", state).await
}

/// Serves the mock with every route under `prefix` (empty for the root).
async fn spawn_mock_at(prefix: &str, state: MockState) -> SocketAddr {
    let app = Router::new()
        .route(&format!("{}/", prefix), get(health))
        .route(&format!("{}/api/categories", prefix), get(categories))
        .route(&format!("{}/api/products", prefix), get(products))
        .route(&format!("{}/api/products/:id", prefix), get(product))
        .route(&format!("{}/api/insights", prefix), get(insights))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn session_for(addr: SocketAddr) -> SessionController<HttpService> {
    let service = HttpService::new(&format!("http://{}", addr)).unwrap();
    SessionController::new(service, CartStore::load(MemoryStorage::new()))
}

// == Startup Sequence ==

#[tokio::test]
async fn test_full_startup_over_http() {
    let state = MockState::default();
    let addr = spawn_mock(state.clone()).await;
    let mut session = session_for(addr);

    let report = session.load().await;

    assert!(report.is_complete(), "report: {:?}", report);
    assert_eq!(report.connectivity, ConnectionStatus::Online);
    assert_eq!(session.categories(), ["Dairy", "Grains"]);
    assert_eq!(session.catalog().len(), 3);

    let insights = session.insights().unwrap();
    assert_eq!(insights.low_stock_alerts[0].name, "Milk");
    assert_eq!(insights.category_statistics.as_ref().unwrap().len(), 2);
    assert_eq!(state.hits(), 4);
}

#[tokio::test]
async fn test_cache_shields_service() {
    let state = MockState::default();
    let addr = spawn_mock(state.clone()).await;
    let mut session = session_for(addr);

    session.load().await;
    let report = session.load().await;

    assert_eq!(report.categories, StageOutcome::Loaded { cached: true });
    assert_eq!(report.products, StageOutcome::Loaded { cached: true });
    assert_eq!(report.insights, StageOutcome::Loaded { cached: true });
    // Second round only probes connectivity
    assert_eq!(state.hits(), 5);
}

#[tokio::test]
async fn test_failed_insights_do_not_block_catalog() {
    let state = MockState::default();
    state.insights_down.store(true, Ordering::SeqCst);
    let addr = spawn_mock(state.clone()).await;
    let mut session = session_for(addr);
    let mut events = session.subscribe();

    let report = session.load().await;

    assert!(report.products.is_loaded());
    assert!(matches!(&report.insights, StageOutcome::Failed(reason) if reason.contains("500")));
    assert!(session.insights().is_none());
    assert_eq!(session.status(), ConnectionStatus::Online);

    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::SectionFailed { reason, .. } = event {
            saw_failure = reason.contains("/api/insights");
        }
    }
    assert!(saw_failure);

    // Reloading the failed stage succeeds once the service recovers
    state.insights_down.store(false, Ordering::SeqCst);
    assert!(session.load_insights().await.is_loaded());
}

#[tokio::test]
async fn test_garbled_products_reported_as_decode_failure() {
    let state = MockState::default();
    state.products_garbled.store(true, Ordering::SeqCst);
    let addr = spawn_mock(state).await;
    let mut session = session_for(addr);

    let report = session.load().await;

    assert!(matches!(&report.products, StageOutcome::Failed(reason) if reason.contains("Malformed")));
    assert!(report.categories.is_loaded());
    assert!(report.insights.is_loaded());
    assert!(session.view().is_empty);
}

#[tokio::test]
async fn test_unreachable_service_degrades() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = session_for(addr);
    let report = session.load().await;

    assert_eq!(report.connectivity, ConnectionStatus::Offline);
    assert!(!report.categories.is_loaded());
    assert!(!report.products.is_loaded());
    assert!(!report.insights.is_loaded());

    // Still usable: browsing yields an empty result, not a failure
    session.on_sort_change(SortKey::Demand);
    assert!(session.view().is_empty);
    assert!(!session.on_next_page());
}

#[tokio::test]
async fn test_service_mounted_under_prefix() {
    let state = MockState::default();
    let addr = spawn_mock_at("/pricing", state.clone()).await;
    let service = HttpService::new(&format!("http://{}/pricing", addr)).unwrap();
    let mut session = SessionController::new(service, CartStore::load(MemoryStorage::new()));

    let report = session.load().await;

    assert!(report.is_complete(), "report: {:?}", report);
    assert_eq!(report.connectivity, ConnectionStatus::Online);
    assert_eq!(session.product_detail(3).await.unwrap().product.name, "Cheddar");
    assert_eq!(state.hits(), 5);
}

// == Catalog Browsing ==

#[tokio::test]
async fn test_browse_and_filter() {
    let addr = spawn_mock(MockState::default()).await;
    let mut session = session_for(addr);
    session.load().await;

    session.on_sort_change(SortKey::Stock);
    let ids: Vec<u32> = session.view().page_items.iter().map(|p| p.product_id).collect();
    assert_eq!(ids, vec![1, 3, 2]);

    session.on_category_change("Dairy");
    let ids: Vec<u32> = session.view().page_items.iter().map(|p| p.product_id).collect();
    assert_eq!(ids, vec![3, 2]);

    session.on_search("xyz");
    assert!(session.view().is_empty);
    assert_eq!(session.view().total_pages, 0);
}

#[tokio::test]
async fn test_product_detail_over_http() {
    let state = MockState::default();
    let addr = spawn_mock(state.clone()).await;
    let mut session = session_for(addr);

    let detail = session.product_detail(1).await.unwrap();
    assert_eq!(detail.product.name, "Rice");
    assert_eq!(detail.sales_30_days, 110);

    session.product_detail(1).await.unwrap();
    assert_eq!(state.hits(), 1, "second lookup served from cache");

    let missing = session.product_detail(99).await;
    assert!(matches!(missing, Err(StorefrontError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_http_service_direct() {
    let addr = spawn_mock(MockState::default()).await;
    let service = HttpService::new(&format!("http://{}/", addr)).unwrap();

    let health = service.health().await.unwrap();
    assert_eq!(health.version, "1.0.0");
    assert_eq!(service.categories().await.unwrap(), vec!["Dairy", "Grains"]);
}

// == Cart Persistence ==

#[tokio::test]
async fn test_cart_survives_restart() {
    let addr = spawn_mock(MockState::default()).await;
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = FileStorage::open(dir.path()).unwrap();
        let service = HttpService::new(&format!("http://{}", addr)).unwrap();
        let mut session = SessionController::new(service, CartStore::load(storage));
        session.load().await;

        session.add_to_cart(1).unwrap();
        session.add_to_cart(1).unwrap();
        session.add_to_cart(2).unwrap();
        session.update_cart_quantity(2, 1).unwrap();
        assert_eq!(session.cart().total(), 185.0);
    }

    let restored = CartStore::load(FileStorage::open(dir.path()).unwrap());
    assert_eq!(restored.items().len(), 2);
    assert_eq!(restored.get(1).unwrap().quantity, 2);
    assert_eq!(restored.get(2).unwrap().quantity, 2);
    assert_eq!(restored.total(), 185.0);
}

#[tokio::test]
async fn test_corrupt_cart_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "[{\"product_id\": ").unwrap();

    let cart = CartStore::load(FileStorage::open(dir.path()).unwrap());
    assert!(cart.is_empty());
}
