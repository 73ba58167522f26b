//! Wire types for the wallet service HTTP surface.
//!
//! Amounts are integer currency units end to end; the service does integer
//! arithmetic and floats would drift against it. Response structs ignore
//! fields this harness does not read.

use serde::{Deserialize, Serialize};

/// Wallet as returned by the service. Immutable once captured into the
/// population; the balance here is only the creation-time snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub id: String,
    pub owner_id: String,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub wallet_id: String,
    pub owner_id: String,
    pub initial_balance: i64,
}

/// Body for credit and debit.
#[derive(Debug, Clone, Serialize)]
pub struct AmountRequest {
    pub amount: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_wallet_id: String,
    pub amount: i64,
    pub description: String,
}

/// Ledger projection read model for one wallet.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub entries: Vec<serde_json::Value>,
}
