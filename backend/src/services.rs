use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;

use farmdata::arms::{
    ApiOutcome, Comparison, NamedReport, OneOrMany, ReportFilters, SurveyRequest,
};

use crate::routes::AppState;

/// Liveness endpoint for the load balancer.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "farm-financial-platform",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Endpoint not found"})),
    )
}

pub async fn years_handler(State(state): State<AppState>) -> Json<ApiOutcome> {
    Json(state.client.get_years().await)
}

pub async fn states_handler(State(state): State<AppState>) -> Json<ApiOutcome> {
    Json(state.client.get_states().await)
}

pub async fn reports_handler(State(state): State<AppState>) -> Json<ApiOutcome> {
    Json(state.client.get_reports(None).await)
}

pub async fn farm_types_handler(State(state): State<AppState>) -> Json<ApiOutcome> {
    Json(state.client.get_farm_types(None).await)
}

pub async fn categories_handler(State(state): State<AppState>) -> Json<ApiOutcome> {
    Json(state.client.get_categories(None).await)
}

pub async fn variables_handler(
    State(state): State<AppState>,
    Query(q): Query<VariablesQuery>,
) -> Json<ApiOutcome> {
    Json(state.client.get_variables(q.report.as_deref(), None).await)
}

pub async fn income_statement_handler(
    State(state): State<AppState>,
    Json(filters): Json<ReportFilters>,
) -> Json<ApiOutcome> {
    run_named_report(state, NamedReport::IncomeStatement, filters).await
}

pub async fn balance_sheet_handler(
    State(state): State<AppState>,
    Json(filters): Json<ReportFilters>,
) -> Json<ApiOutcome> {
    run_named_report(state, NamedReport::BalanceSheet, filters).await
}

pub async fn financial_ratios_handler(
    State(state): State<AppState>,
    Json(filters): Json<ReportFilters>,
) -> Json<ApiOutcome> {
    run_named_report(state, NamedReport::FinancialRatios, filters).await
}

pub async fn structural_characteristics_handler(
    State(state): State<AppState>,
    Json(filters): Json<ReportFilters>,
) -> Json<ApiOutcome> {
    run_named_report(state, NamedReport::StructuralCharacteristics, filters).await
}

pub async fn government_payments_handler(
    State(state): State<AppState>,
    Json(filters): Json<ReportFilters>,
) -> Json<ApiOutcome> {
    run_named_report(state, NamedReport::GovernmentPayments, filters).await
}

pub async fn operator_household_income_handler(
    State(state): State<AppState>,
    Json(filters): Json<ReportFilters>,
) -> Json<ApiOutcome> {
    run_named_report(state, NamedReport::OperatorHouseholdIncome, filters).await
}

async fn run_named_report(
    state: AppState,
    report: NamedReport,
    mut filters: ReportFilters,
) -> Json<ApiOutcome> {
    if filters.years.is_none() {
        filters.years = Some(vec![2020].into());
    }
    Json(state.client.named_report(report, filters).await)
}

pub async fn compare_farm_typology_handler(
    State(state): State<AppState>,
    Json(req): Json<CompareReq>,
) -> Json<ApiOutcome> {
    run_comparison(state, Comparison::FarmTypology, req).await
}

pub async fn compare_economic_class_handler(
    State(state): State<AppState>,
    Json(req): Json<CompareReq>,
) -> Json<ApiOutcome> {
    run_comparison(state, Comparison::EconomicClass, req).await
}

pub async fn compare_regions_handler(
    State(state): State<AppState>,
    Json(req): Json<CompareReq>,
) -> Json<ApiOutcome> {
    run_comparison(state, Comparison::NassRegion, req).await
}

async fn run_comparison(state: AppState, kind: Comparison, req: CompareReq) -> Json<ApiOutcome> {
    let year = req.year.unwrap_or(2020);
    Json(state.client.compare(kind, year, req.report).await)
}

pub async fn trend_analysis_handler(
    State(state): State<AppState>,
    Json(req): Json<TrendReq>,
) -> Result<Json<ApiOutcome>, (StatusCode, Json<ApiOutcome>)> {
    let Some(variable) = req.variable else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiOutcome::failure("Variable is required")),
        ));
    };
    let start_year = req.start_year.unwrap_or(2015);
    let end_year = req.end_year.unwrap_or(2020);
    Ok(Json(
        state
            .client
            .trend_analysis(start_year, end_year, variable, req.state)
            .await,
    ))
}

pub async fn custom_query_handler(
    State(state): State<AppState>,
    Json(mut req): Json<SurveyRequest>,
) -> Result<Json<ApiOutcome>, (StatusCode, Json<ApiOutcome>)> {
    if req.report.is_none() && req.variable.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiOutcome::failure("Either report or variable is required")),
        ));
    }
    if req.years.is_none() {
        req.years = Some(vec![2020].into());
    }
    Ok(Json(state.client.get_survey_data(req).await))
}

#[derive(Debug, Deserialize)]
pub struct VariablesQuery {
    pub report: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareReq {
    pub year: Option<i32>,
    pub report: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendReq {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub variable: Option<OneOrMany<String>>,
    pub state: Option<OneOrMany<String>>,
}
