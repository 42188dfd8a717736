use axum::{
    routing::{get, post},
    Router,
};
use farmdata::arms::ArmsClient;

use crate::services;

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/health", get(services::health_handler))
        // metadata lookups
        .route("/api/years", get(services::years_handler))
        .route("/api/states", get(services::states_handler))
        .route("/api/reports", get(services::reports_handler))
        .route("/api/farm-types", get(services::farm_types_handler))
        .route("/api/categories", get(services::categories_handler))
        .route("/api/variables", get(services::variables_handler))
        // named reports
        .route("/api/income-statement", post(services::income_statement_handler))
        .route("/api/balance-sheet", post(services::balance_sheet_handler))
        .route("/api/financial-ratios", post(services::financial_ratios_handler))
        .route(
            "/api/structural-characteristics",
            post(services::structural_characteristics_handler),
        )
        .route(
            "/api/government-payments",
            post(services::government_payments_handler),
        )
        .route(
            "/api/operator-household-income",
            post(services::operator_household_income_handler),
        )
        // comparisons
        .route(
            "/api/compare-farm-typology",
            post(services::compare_farm_typology_handler),
        )
        .route(
            "/api/compare-economic-class",
            post(services::compare_economic_class_handler),
        )
        .route("/api/compare-regions", post(services::compare_regions_handler))
        // analysis
        .route("/api/trend-analysis", post(services::trend_analysis_handler))
        .route("/api/custom-query", post(services::custom_query_handler))
        .fallback(services::not_found_handler)
}

#[derive(Clone)]
pub struct AppState {
    pub client: ArmsClient,
}
