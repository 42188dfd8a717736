pub mod client;
pub mod datatype;
pub mod error;
pub mod query;

pub use client::ArmsClient;
pub use datatype::{ApiOutcome, Record};
pub use error::ClientError;
pub use query::{
    build_survey_query, Comparison, NamedReport, OneOrMany, ReportFilters, SurveyQuery,
    SurveyRequest,
};
