//! Client behavior against a local stub of the ARMS API: request shape,
//! auth placement, and normalization of timeout / HTTP error / bad-body
//! responses.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Json, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use farmdata::arms::{ApiOutcome, ArmsClient, NamedReport, ReportFilters, SurveyRequest};

/// Stub ARMS API. `surveydata` echoes the query string and body back inside
/// the data array so tests can assert on exactly what was sent.
async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/year", get(|| async { Json(json!({"data": [2020, 2021]})) }))
        .route(
            "/state",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!({"data": []}))
            }),
        )
        .route(
            "/report",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "bad request"})),
                )
            }),
        )
        .route("/category", get(|| async { "this is not json" }))
        .route(
            "/surveydata",
            post(
                |Query(params): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                    Json(json!({"data": [{"query": params, "body": body}]}))
                },
            ),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn simple_lookup_returns_data() {
    let base = spawn_stub().await;
    let client = ArmsClient::with_base_url("test-key", base);

    let outcome = client.get_years().await;
    assert_eq!(outcome.data(), Some(&[json!(2020), json!(2021)][..]));
}

#[tokio::test]
async fn income_statement_posts_exact_body_with_key_in_query_string() {
    let base = spawn_stub().await;
    let client = ArmsClient::with_base_url("test-key", base);

    let outcome = client
        .named_report(
            NamedReport::IncomeStatement,
            ReportFilters {
                years: Some(vec![2020].into()),
                ..ReportFilters::default()
            },
        )
        .await;

    let data = outcome.data().expect("expected success").to_vec();
    let echo = data[0].as_object().unwrap();
    assert_eq!(echo["query"]["api_key"], json!("test-key"));
    assert_eq!(
        echo["body"],
        json!({
            "year": [2020],
            "state": ["all"],
            "report": ["Farm Business Income Statement"],
        })
    );
}

#[tokio::test]
async fn timeout_is_normalized_to_failure() {
    let base = spawn_stub().await;
    let client =
        ArmsClient::with_base_url("test-key", base).timeout(Duration::from_millis(100));

    let outcome = client.get_states().await;
    assert_eq!(
        outcome,
        ApiOutcome::failure("Request timed out. Please try again.")
    );
}

#[tokio::test]
async fn http_error_embeds_remote_detail() {
    let base = spawn_stub().await;
    let client = ArmsClient::with_base_url("test-key", base);

    let ApiOutcome::Failure { error } = client.get_reports(None).await else {
        panic!("expected failure");
    };
    assert!(error.starts_with("API request failed: 400"), "{error}");
    assert!(error.contains("bad request"), "{error}");
}

#[tokio::test]
async fn non_json_body_is_normalized_to_failure() {
    let base = spawn_stub().await;
    let client = ArmsClient::with_base_url("test-key", base);

    let outcome = client.get_categories(None).await;
    assert_eq!(outcome, ApiOutcome::failure("Invalid response from API"));
}

#[tokio::test]
async fn connection_failure_is_normalized_to_failure() {
    // nothing listens here
    let client = ArmsClient::with_base_url("test-key", "http://127.0.0.1:1");

    let ApiOutcome::Failure { error } = client.get_years().await else {
        panic!("expected failure");
    };
    assert!(error.starts_with("API request failed:"), "{error}");
}

#[tokio::test]
async fn invalid_years_fail_before_any_network_call() {
    // unroutable base URL: a transport failure would surface as a different
    // message than the validation one
    let client = ArmsClient::with_base_url("test-key", "http://127.0.0.1:1");

    let outcome = client
        .get_survey_data(SurveyRequest {
            years: Some(vec![1950].into()),
            variable: Some("igcfi".into()),
            ..SurveyRequest::default()
        })
        .await;
    assert_eq!(
        outcome,
        ApiOutcome::failure("Please select years between 1996 and 2023")
    );
}

#[tokio::test]
async fn missing_report_and_variable_fails_before_any_network_call() {
    let client = ArmsClient::with_base_url("test-key", "http://127.0.0.1:1");

    let outcome = client
        .get_survey_data(SurveyRequest {
            years: Some(vec![2020].into()),
            state: Some("all".into()),
            ..SurveyRequest::default()
        })
        .await;
    assert_eq!(
        outcome,
        ApiOutcome::failure("Either report or variable parameter is required")
    );
}

#[tokio::test]
async fn trend_analysis_round_trip() {
    let base = spawn_stub().await;
    let client = ArmsClient::with_base_url("test-key", base);

    let outcome = client.trend_analysis(2015, 2017, "igcfi", None).await;
    let data = outcome.data().expect("expected success").to_vec();
    let body = &data[0]["body"];
    assert_eq!(body["year"], json!([2015, 2016, 2017]));
    assert_eq!(body["variable"], json!(["igcfi"]));
}
