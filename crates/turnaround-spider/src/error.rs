use crate::stock::LineItem;
use thiserror::Error;

/// Why a single ticker could not be turned into a [`CandidateRecord`]; the ticker is skipped
/// and the run carries on.
///
/// [`CandidateRecord`]: crate::record::CandidateRecord
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed, error({0})")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to parse response, error({0})")]
    Json(#[from] serde_json::Error),

    #[error("malformed response, {0}")]
    Decode(String),

    #[error("missing line item \"{0}\"")]
    MissingLineItem(LineItem),

    #[error("insufficient history for \"{item}\", {found} of 3 annual data points")]
    InsufficientHistory { item: LineItem, found: usize },
}
