use thiserror::Error;

/// Failures of a single audit fetch.
///
/// The `Display` output is what the dashboard shows the user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("Network error")]
    Status(u16),

    /// The response body lacks a field the aggregator needs.
    #[error("{0}")]
    MalformedPayload(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedPayload(err.to_string())
    }
}
