use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::arms::datatype::ApiOutcome;
use crate::arms::error::ClientError;
use crate::arms::query::{
    build_survey_query, Comparison, NamedReport, OneOrMany, ReportFilters, SurveyRequest,
};

const BASE_URL: &str = "https://api.ers.usda.gov/data/arms";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// How much of a non-JSON error body gets quoted back to the caller.
const ERROR_BODY_PREVIEW: usize = 300;

/// Client for the USDA ERS ARMS data API. One outbound call per method, no
/// retries; every data method resolves to an [`ApiOutcome`], never an error.
#[derive(Debug, Clone)]
pub struct ArmsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ArmsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Read the credential from `USDA_API_KEY`. Absence is a startup error,
    /// raised before any network activity.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("USDA_API_KEY")
            .map_err(|_| anyhow::anyhow!("USDA_API_KEY not found in environment variables"))?;
        Ok(Self::new(api_key))
    }

    /// Override the per-request timeout (tests shrink it to simulate slow
    /// upstreams).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read-only lookup: GET with the key in the query string, no body.
    async fn lookup(&self, endpoint: &str) -> Result<ApiOutcome, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", &self.api_key)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }

    /// Filtered lookup: POST with the key in the query string and the
    /// non-null filter set as JSON body.
    async fn filtered<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiOutcome, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, "POST filtered lookup");
        let response = self
            .http
            .post(&url)
            .query(&[("api_key", &self.api_key)])
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }

    pub async fn get_states(&self) -> ApiOutcome {
        self.lookup("state").await.unwrap_or_else(ApiOutcome::from)
    }

    pub async fn get_years(&self) -> ApiOutcome {
        self.lookup("year").await.unwrap_or_else(ApiOutcome::from)
    }

    pub async fn get_reports(&self, name: Option<&str>) -> ApiOutcome {
        self.named_lookup("report", NameFilter { name, report: None })
            .await
    }

    pub async fn get_variables(&self, report: Option<&str>, name: Option<&str>) -> ApiOutcome {
        self.named_lookup("variable", NameFilter { name, report })
            .await
    }

    pub async fn get_categories(&self, name: Option<&str>) -> ApiOutcome {
        self.named_lookup("category", NameFilter { name, report: None })
            .await
    }

    pub async fn get_farm_types(&self, name: Option<&str>) -> ApiOutcome {
        self.named_lookup("farmtype", NameFilter { name, report: None })
            .await
    }

    async fn named_lookup(&self, endpoint: &str, filter: NameFilter<'_>) -> ApiOutcome {
        let result = if filter.is_empty() {
            self.lookup(endpoint).await
        } else {
            self.filtered(endpoint, &filter).await
        };
        result.unwrap_or_else(ApiOutcome::from)
    }

    /// The generic filterable dataset all named reports reduce to. Invalid
    /// requests fail here, before any network call.
    pub async fn get_survey_data(&self, request: SurveyRequest) -> ApiOutcome {
        let query = match build_survey_query(request) {
            Ok(query) => query,
            Err(err) => return err.into(),
        };
        self.filtered("surveydata", &query)
            .await
            .unwrap_or_else(ApiOutcome::from)
    }

    pub async fn named_report(&self, report: NamedReport, filters: ReportFilters) -> ApiOutcome {
        self.get_survey_data(SurveyRequest::named(report, filters))
            .await
    }

    pub async fn compare(
        &self,
        kind: Comparison,
        year: i32,
        report: Option<String>,
    ) -> ApiOutcome {
        self.get_survey_data(SurveyRequest::comparison(kind, year, report))
            .await
    }

    pub async fn trend_analysis(
        &self,
        start_year: i32,
        end_year: i32,
        variable: impl Into<OneOrMany<String>>,
        state: Option<OneOrMany<String>>,
    ) -> ApiOutcome {
        self.get_survey_data(SurveyRequest::trend(start_year, end_year, variable, state))
            .await
    }
}

#[derive(Debug, Serialize)]
struct NameFilter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a str>,
}

impl NameFilter<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.report.is_none()
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        // without_url keeps the api_key out of surfaced messages
        ClientError::Transport(err.without_url().to_string())
    }
}

async fn decode_response(response: reqwest::Response) -> Result<ApiOutcome, ClientError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let detail = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => format!(" - Details: {value}"),
            Err(_) => {
                let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
                format!(" - Response: {preview}")
            }
        };
        return Err(ClientError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|_| ClientError::Decode)
}
