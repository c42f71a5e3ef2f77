//! Application lifecycle tests against a mock backend.

use axum::routing::get;
use axum::{Json, Router};
use nexus_app::{AppConfig, Application};
use nexus_core::Page;
use nexus_pulse::FlowState;
use nexus_view::render::dashboard::{MARKET_WIDGET, STAT_TOTAL_PRODUCTS};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

async fn start_backend() -> SocketAddr {
    let app = Router::new()
        .route(
            "/api/realtime-updates",
            get(|| async {
                Json(json!({
                    "stats": {"total_products": 12, "low_stock": 1, "today_revenue": 99.5},
                    "market": [{"symbol": "^GSPC", "price": 5000, "change_percent": 3.1}],
                    "recent_sales": []
                }))
            }),
        )
        .route(
            "/api/market",
            get(|| async {
                Json(json!([{"symbol": "^GSPC", "price": 5000, "change_percent": 3.1}]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(base_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = base_url;
    config.api.timeout_ms = 500;
    config.sync.heartbeat_interval_ms = 100;
    config.page.status_interval_ms = 50;
    config
}

#[tokio::test]
async fn test_dashboard_renders_and_feeds_pulse() {
    let addr = start_backend().await;
    let mut app = Application::new(config(format!("http://{addr}"))).unwrap();

    app.run_until(tokio::time::sleep(Duration::from_millis(400)))
        .await
        .unwrap();

    let surface = app.surface();
    let surface = surface.lock();
    assert_eq!(surface.html(STAT_TOTAL_PRODUCTS), Some("12"));
    assert!(surface.html(MARKET_WIDGET).unwrap().contains("^GSPC"));
    drop(surface);

    // Timers are gone after shutdown, the frame loop advanced while running.
    assert!(app.page().is_none());
    assert!(app.frame().frame > 0);
}

#[tokio::test]
async fn test_dashboard_low_stock_holds_alert() {
    let addr = start_backend().await;
    let mut config = config(format!("http://{addr}"));
    config.sync.market_interval_ms = 100;
    let mut app = Application::new(config).unwrap();

    // Volatile quotes arrive every cycle; the low-stock alert still holds.
    app.run_until(tokio::time::sleep(Duration::from_millis(400)))
        .await
        .unwrap();

    assert_eq!(app.frame().flow, FlowState::Alert);
}

#[tokio::test]
async fn test_unreachable_backend_keeps_running() {
    let mut app = Application::new(config("http://127.0.0.1:1".to_string())).unwrap();

    app.run_until(tokio::time::sleep(Duration::from_millis(250)))
        .await
        .unwrap();

    assert!(app.surface().lock().html(STAT_TOTAL_PRODUCTS).is_none());
}

#[tokio::test]
async fn test_navigate_switches_page() {
    let addr = start_backend().await;
    let mut app = Application::new(config(format!("http://{addr}"))).unwrap();

    assert_eq!(app.navigate("/market"), Page::Market);
    assert_eq!(app.page(), Some(Page::Market));
    assert_eq!(app.navigate("/about"), Page::Static);
}
