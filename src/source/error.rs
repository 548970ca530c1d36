use std::time::Duration;
use thiserror::Error;

/// Failure to obtain one sampled day. Never aborts a run on its own; the year is
/// recorded as absent instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request for {date} timed out after {after:?}")]
    Timeout { date: String, after: Duration },

    #[error("Failed to parse JSON data from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response shape from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("No hourly readings returned for {date}")]
    EmptyTable { date: String },
}
