//! Orchestration engine: population build, randomized dispatch, statistics,
//! and post-run verification.

mod dispatcher;
mod error;
mod policy;
mod population;
mod stats;
mod verifier;

pub use dispatcher::{ConcurrencyDispatcher, OperationOutcome, RetryPolicy};
pub use error::HarnessError;
pub use policy::{OperationDraw, OperationKind, OperationPolicy};
pub use population::WalletPopulationBuilder;
pub use stats::{RunStatistics, StatsAggregator};
pub use verifier::{ConsistencyVerifier, VerificationSample};
