use thiserror::Error;

use crate::api::ApiError;

/// Run-level failures. Per-item failures are tallied, captured, and never
/// surface here; only an empty population aborts a run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("No wallets were created; cannot run operations")]
    EmptyPopulation,

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),
}
