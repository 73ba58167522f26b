use thiserror::Error;

/// Per-request failure against the wallet service. Timeouts surface as
/// `Http` and are normal failure outcomes, never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response decode failed: {0}")]
    Decode(String),
}
