use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use leadboard_core::config::Config;
use leadboard_core::rpc::memory::MemoryRpcBackend;
use leadboard_server::app::build_app;
use leadboard_server::state::AppState;

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SUPABASE_URL" => Some("http://db.invalid".to_string()),
        "SUPABASE_SERVICE_ROLE_KEY" => Some("service-key".to_string()),
        "LEADBOARD_AUTH" => Some("none".to_string()),
        _ => None,
    })
    .expect("test config")
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

fn health_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build request")
}

#[tokio::test]
async fn test_health_returns_200_when_database_reachable() {
    let state = Arc::new(AppState::new(Arc::new(MemoryRpcBackend::new()), test_config()));
    let app = build_app(state);

    let response = app.oneshot(health_request()).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_returns_503_when_database_unreachable() {
    let backend = Arc::new(MemoryRpcBackend::new());
    backend.set_healthy(false);
    let state = Arc::new(AppState::new(backend, test_config()));
    let app = build_app(state);

    let response = app.oneshot(health_request()).await.expect("request");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn test_health_is_public_with_password_auth() {
    let config = Config::from_lookup(|key| match key {
        "SUPABASE_URL" => Some("http://db.invalid".to_string()),
        "SUPABASE_SERVICE_ROLE_KEY" => Some("service-key".to_string()),
        "LEADBOARD_ADMIN_PASSWORD" => Some("hunter2".to_string()),
        _ => None,
    })
    .expect("test config");
    let state = Arc::new(AppState::new(Arc::new(MemoryRpcBackend::new()), config));
    let app = build_app(state);

    let response = app.oneshot(health_request()).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
}
