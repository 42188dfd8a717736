use thiserror::Error;

/// Everything that can go wrong between a high-level report request and a
/// normalized result. Validation variants are produced before any network
/// activity; the rest map transport and decoding failures onto the exact
/// messages the shells show to users.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please select years between 1996 and 2023")]
    YearsOutOfRange,

    #[error("Either report or variable parameter is required")]
    MissingReportOrVariable,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("API request failed: {0}")]
    Transport(String),

    /// Non-2xx status. `detail` carries the remote error body when it was
    /// JSON, or a truncated raw response otherwise.
    #[error("API request failed: {status}{detail}")]
    Status { status: u16, detail: String },

    #[error("Invalid response from API")]
    Decode,
}
