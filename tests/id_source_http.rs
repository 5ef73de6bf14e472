use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::json;
use std::time::Duration;
use tinyurl::AppError;
use tinyurl::domain::repositories::IdSource;
use tinyurl::infrastructure::id_source::HttpIdSource;

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn assert_upstream(result: Result<impl std::fmt::Debug, AppError>) {
    match result {
        Err(AppError::UpstreamUnavailable { .. }) => {}
        other => panic!("expected UpstreamUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_next_id_success() {
    let base_url = spawn_service(Router::new().route(
        "/api/v1/snowflake/next",
        get(|| async {
            Json(json!({ "id": 653436189499457547_i64, "nodeId": 3, "host": "snowflake-3" }))
        }),
    ))
    .await;

    let source = HttpIdSource::new(&base_url, Duration::from_secs(2)).unwrap();
    let id = source.next_id().await.unwrap();

    assert_eq!(id.id, 653436189499457547);
    assert_eq!(id.node_id, 3);
    assert_eq!(id.host, "snowflake-3");
}

#[tokio::test]
async fn test_next_id_timeout() {
    let base_url = spawn_service(Router::new().route(
        "/api/v1/snowflake/next",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "id": 1, "nodeId": 0, "host": "slow" }))
        }),
    ))
    .await;

    let source = HttpIdSource::new(&base_url, Duration::from_millis(100)).unwrap();

    assert_upstream(source.next_id().await);
}

#[tokio::test]
async fn test_next_id_error_status() {
    let base_url = spawn_service(Router::new().route(
        "/api/v1/snowflake/next",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let source = HttpIdSource::new(&base_url, Duration::from_secs(2)).unwrap();

    assert_upstream(source.next_id().await);
}

#[tokio::test]
async fn test_next_id_invalid_body() {
    let base_url = spawn_service(Router::new().route(
        "/api/v1/snowflake/next",
        get(|| async { "not json" }),
    ))
    .await;

    let source = HttpIdSource::new(&base_url, Duration::from_secs(2)).unwrap();

    assert_upstream(source.next_id().await);
}

#[tokio::test]
async fn test_next_id_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpIdSource::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();

    assert_upstream(source.next_id().await);
}
