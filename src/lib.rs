//! wallet-loadtest - Load-generation harness for a ledger-backed wallet
//! service.
//!
//! Provisions a population of wallets over the service's HTTP surface, then
//! drives randomized credit/debit/transfer operations against them under a
//! sequential or bounded-parallel schedule, and finally samples the
//! asynchronous ledger projection to check it caught up.
//!
//! # Modules
//!
//! - [`api`] - WalletApi trait, wire types, and the reqwest client
//! - [`harness`] - population builder, operation policy, dispatcher, stats,
//!   and the consistency verifier
//! - [`idgen`] - identifier / idempotency-key generation
//! - [`capture`] - best-effort JSONL failure capture sink
//! - [`config`] - per-environment YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod api;
pub mod capture;
pub mod config;
pub mod harness;
pub mod idgen;
pub mod logging;

// Convenient re-exports at crate root
pub use api::{HttpWalletClient, WalletApi, WalletRecord};
pub use capture::CaptureSink;
pub use config::AppConfig;
pub use harness::{
    ConcurrencyDispatcher, ConsistencyVerifier, HarnessError, OperationKind, OperationPolicy,
    RunStatistics, StatsAggregator, VerificationSample, WalletPopulationBuilder,
};
