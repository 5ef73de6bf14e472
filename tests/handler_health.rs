mod common;

use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_health_all_components_ok() {
    let app = common::test_app();

    let response = app.server().get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["click_counter"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_database_down() {
    let state = common::state_with_repository(Arc::new(common::NeverVisibleRepository));
    let server = axum_test::TestServer::new(tinyurl::routes::router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert!(json["checks"]["database"]["message"].is_string());
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}
