use serde::{Deserialize, Serialize};

use crate::arms::error::ClientError;

/// Years the ARMS survey covers. Anything outside is silently dropped from a
/// request; a request left with no years at all is rejected.
pub const MIN_YEAR: i32 = 1996;
pub const MAX_YEAR: i32 = 2023;

/// A JSON scalar or array of the same. The remote API expects arrays for most
/// filters but callers (and the original web UI) routinely send scalars, so
/// the coercion happens here at the wire boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(v: T) -> Self {
        OneOrMany::One(v)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(v: Vec<T>) -> Self {
        OneOrMany::Many(v)
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(v: &str) -> Self {
        OneOrMany::One(v.to_string())
    }
}

/// The six report shortcuts. The titles are the contract with the remote
/// service and must stay exactly as spelled (the endpoint matches them
/// case-sensitively).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedReport {
    IncomeStatement,
    BalanceSheet,
    FinancialRatios,
    StructuralCharacteristics,
    GovernmentPayments,
    OperatorHouseholdIncome,
}

impl NamedReport {
    pub fn title(self) -> &'static str {
        match self {
            NamedReport::IncomeStatement => "Farm Business Income Statement",
            NamedReport::BalanceSheet => "Farm Business Balance Sheet",
            NamedReport::FinancialRatios => "Farm Business Financial Ratios",
            NamedReport::StructuralCharacteristics => "Structural Characteristics",
            NamedReport::GovernmentPayments => "Government Payments",
            NamedReport::OperatorHouseholdIncome => "Operator Household Income",
        }
    }
}

/// Cross-tabulation shortcuts: compare one report across a fixed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    FarmTypology,
    EconomicClass,
    NassRegion,
}

impl Comparison {
    pub fn category(self) -> &'static str {
        match self {
            Comparison::FarmTypology => "collapsed farm typology",
            Comparison::EconomicClass => "economic class",
            Comparison::NassRegion => "nass region",
        }
    }
}

/// High-level survey request as callers hand it over: scalars or lists,
/// nothing validated yet. `category_value` and `category2` are sent as bare
/// scalars by the remote contract, unlike the list filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyRequest {
    pub years: Option<OneOrMany<i32>>,
    pub state: Option<OneOrMany<String>>,
    pub report: Option<OneOrMany<String>>,
    pub variable: Option<OneOrMany<String>>,
    pub farmtype: Option<OneOrMany<String>>,
    pub category: Option<OneOrMany<String>>,
    pub category_value: Option<String>,
    pub category2: Option<String>,
}

/// Filters the named-report shortcuts accept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilters {
    pub years: Option<OneOrMany<i32>>,
    pub state: Option<OneOrMany<String>>,
    pub farmtype: Option<OneOrMany<String>>,
    pub category: Option<OneOrMany<String>>,
    pub category_value: Option<String>,
}

impl SurveyRequest {
    /// One parameterized constructor instead of six copies of the same
    /// method: fix `report` to the shortcut title, forward the rest.
    pub fn named(report: NamedReport, filters: ReportFilters) -> Self {
        SurveyRequest {
            years: filters.years,
            state: filters.state,
            report: Some(report.title().into()),
            farmtype: filters.farmtype,
            category: filters.category,
            category_value: filters.category_value,
            ..SurveyRequest::default()
        }
    }

    /// Compare one report across all values of a fixed category for a single
    /// year. `report` defaults to the income statement.
    pub fn comparison(kind: Comparison, year: i32, report: Option<String>) -> Self {
        let report = report.unwrap_or_else(|| NamedReport::IncomeStatement.title().to_string());
        SurveyRequest {
            years: Some(vec![year].into()),
            state: Some("all".into()),
            report: Some(report.into()),
            category: Some(kind.category().into()),
            ..SurveyRequest::default()
        }
    }

    /// Track one variable across an inclusive year range.
    pub fn trend(
        start_year: i32,
        end_year: i32,
        variable: impl Into<OneOrMany<String>>,
        state: Option<OneOrMany<String>>,
    ) -> Self {
        let years: Vec<i32> = (start_year..=end_year).collect();
        SurveyRequest {
            years: Some(years.into()),
            state,
            variable: Some(variable.into()),
            ..SurveyRequest::default()
        }
    }
}

/// The validated wire body for POST `surveydata`. Optional filters are left
/// out of the JSON entirely when absent; the endpoint rejects nulls and empty
/// arrays.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SurveyQuery {
    pub year: Vec<i32>,
    pub state: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmtype: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category2: Option<String>,
}

fn list_filter(value: Option<OneOrMany<String>>) -> Option<Vec<String>> {
    let mut items = value?.into_vec();
    items.retain(|s| !s.is_empty());
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn scalar_filter(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Normalize and validate a request. Fails before any network call when the
/// year set is empty after range filtering, or when neither `report` nor
/// `variable` is present.
pub fn build_survey_query(req: SurveyRequest) -> Result<SurveyQuery, ClientError> {
    let years: Vec<i32> = req
        .years
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .collect();
    if years.is_empty() {
        return Err(ClientError::YearsOutOfRange);
    }

    let state = list_filter(req.state).unwrap_or_else(|| vec!["all".to_string()]);
    let report = list_filter(req.report);
    let variable = list_filter(req.variable);

    if report.is_none() && variable.is_none() {
        return Err(ClientError::MissingReportOrVariable);
    }

    Ok(SurveyQuery {
        year: years,
        state,
        report,
        variable,
        farmtype: list_filter(req.farmtype),
        category: list_filter(req.category),
        category_value: scalar_filter(req.category_value),
        category2: scalar_filter(req.category2),
    })
}
