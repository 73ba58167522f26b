//! Client surface of the external wallet service.
//!
//! The harness talks to the service only through [`WalletApi`]; tests
//! substitute an in-memory implementation at the same seam.

mod error;
mod http;
mod types;

pub use error::ApiError;
pub use http::HttpWalletClient;
pub use types::{
    AmountRequest, CreateWalletRequest, LedgerResponse, TransferRequest, WalletRecord,
};

use async_trait::async_trait;

/// Unified interface to the wallet service HTTP surface.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// POST /wallets
    async fn create_wallet(
        &self,
        request: &CreateWalletRequest,
        idempotency_key: &str,
    ) -> Result<WalletRecord, ApiError>;

    /// POST /wallets/{id}/credit
    async fn credit(
        &self,
        wallet_id: &str,
        request: &AmountRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError>;

    /// POST /wallets/{id}/debit
    async fn debit(
        &self,
        wallet_id: &str,
        request: &AmountRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError>;

    /// POST /wallets/{id}/transfer
    async fn transfer(
        &self,
        wallet_id: &str,
        request: &TransferRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError>;

    /// GET /wallets/{id} — advisory balance read, may be stale by the time
    /// the caller acts on it.
    async fn get_wallet(&self, wallet_id: &str) -> Result<WalletRecord, ApiError>;

    /// GET /ledger/wallet/{id} — asynchronous projection read model.
    async fn ledger_entries(&self, wallet_id: &str) -> Result<LedgerResponse, ApiError>;
}
