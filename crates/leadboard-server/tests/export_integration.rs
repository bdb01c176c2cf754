use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
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

fn setup(backend: MemoryRpcBackend) -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(backend), test_config()));
    build_app(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn text_body(response: axum::http::Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn test_export_volume_chart_as_csv() {
    let backend = MemoryRpcBackend::new().with_rows(
        "get_qleadvolume_linechart",
        json!([{ "group_date": "2025-01-02", "qualified_leads": 4, "qualified_leads_ppc": 1, "qualified_leads_seo": 3 }]),
    );
    let app = setup(backend);
    let response = app
        .oneshot(get(
            "/api/top-metrics/export?clientId=5&start=2025-01-01&end=2025-01-03&chart=volume",
        ))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("content-type"),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("content-disposition"),
        "attachment; filename=\"volume-5-2025-01-01-2025-01-03.csv\""
    );
    assert_eq!(
        text_body(response).await,
        "date,total,ppc,lsa,seo\n2025-01-01,0,0,0,0\n2025-01-02,4,1,0,3\n2025-01-03,0,0,0,0\n"
    );
}

#[tokio::test]
async fn test_export_uses_cost_per_lead_grouping() {
    let app = setup(MemoryRpcBackend::new());
    let response = app
        .oneshot(get(
            "/api/top-metrics/export?clientId=5&start=2025-01-01&end=2025-03-31&chart=cpql&costPerLeadGroupBy=month",
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = text_body(response).await;
    assert_eq!(body.lines().count(), 4);
}

#[tokio::test]
async fn test_export_requires_known_chart() {
    let app = setup(MemoryRpcBackend::new());
    let response = app
        .clone()
        .oneshot(get("/api/top-metrics/export?clientId=5&start=2025-01-01&end=2025-01-03"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get(
            "/api/top-metrics/export?clientId=5&start=2025-01-01&end=2025-01-03&chart=pie",
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_keeps_negative_amounts_numeric() {
    let backend = MemoryRpcBackend::new().with_rows(
        "get_cost_line_chart_metrics",
        json!([{ "group_date": "2025-01-01", "spend_total": -12.5, "spend_ppc": -12.5 }]),
    );
    let app = setup(backend);
    let response = app
        .oneshot(get(
            "/api/top-metrics/export?clientId=5&start=2025-01-01&end=2025-01-01&chart=cost",
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        text_body(response).await,
        "date,total,ppc,lsa,seo\n2025-01-01,-12.5,-12.5,0,0\n"
    );
}
