//! Route-level checks that need no upstream API: health, 404 fallback, and
//! the validations the web layer performs before calling the client.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use farmdata::arms::ArmsClient;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use farmdata_backend::routes::{self, AppState};

fn test_app() -> axum::Router {
    let state = AppState {
        client: ArmsClient::with_base_url("test-key", "http://127.0.0.1:1"),
    };
    routes::app().with_state(state)
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_service_identity() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("farm-financial-platform"));
}

#[tokio::test]
async fn unknown_route_is_a_json_404() {
    let response = test_app()
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Endpoint not found"}));
}

#[tokio::test]
async fn trend_analysis_requires_a_variable() {
    let request = Request::post("/api/trend-analysis")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"start_year": 2015, "end_year": 2020}"#))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Variable is required"}));
}

#[tokio::test]
async fn custom_query_requires_report_or_variable() {
    let request = Request::post("/api/custom-query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"years": [2020], "state": "all"}"#))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Either report or variable is required"}));
}

#[tokio::test]
async fn upstream_failure_is_returned_as_error_shape() {
    // client points at a closed port, so the call comes back as {error}
    let request = Request::post("/api/income-statement")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"years": [2020]}"#))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    let error = body["error"].as_str().expect("error shape");
    assert!(error.starts_with("API request failed:"), "{error}");
}
