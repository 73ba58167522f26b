//! Thread-safe run statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::policy::OperationKind;

/// Per-kind success/failure tallies, safe under concurrent recorders.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    wallets_success: AtomicU64,
    wallets_failed: AtomicU64,
    credit_success: AtomicU64,
    credit_failed: AtomicU64,
    debit_success: AtomicU64,
    debit_failed: AtomicU64,
    transfer_success: AtomicU64,
    transfer_failed: AtomicU64,
}

/// Plain-number snapshot for final reporting.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RunStatistics {
    pub wallets_success: u64,
    pub wallets_failed: u64,
    pub credit_success: u64,
    pub credit_failed: u64,
    pub debit_success: u64,
    pub debit_failed: u64,
    pub transfer_success: u64,
    pub transfer_failed: u64,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one wallet-creation outcome.
    pub fn record_wallet(&self, success: bool) {
        let counter = if success {
            &self.wallets_success
        } else {
            &self.wallets_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one operation outcome, exactly once per dispatched task.
    pub fn record_operation(&self, kind: OperationKind, success: bool) {
        let counter = match (kind, success) {
            (OperationKind::Credit, true) => &self.credit_success,
            (OperationKind::Credit, false) => &self.credit_failed,
            (OperationKind::Debit, true) => &self.debit_success,
            (OperationKind::Debit, false) => &self.debit_failed,
            (OperationKind::Transfer, true) => &self.transfer_success,
            (OperationKind::Transfer, false) => &self.transfer_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn wallets_created(&self) -> u64 {
        self.wallets_success.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> RunStatistics {
        RunStatistics {
            wallets_success: self.wallets_success.load(Ordering::Relaxed),
            wallets_failed: self.wallets_failed.load(Ordering::Relaxed),
            credit_success: self.credit_success.load(Ordering::Relaxed),
            credit_failed: self.credit_failed.load(Ordering::Relaxed),
            debit_success: self.debit_success.load(Ordering::Relaxed),
            debit_failed: self.debit_failed.load(Ordering::Relaxed),
            transfer_success: self.transfer_success.load(Ordering::Relaxed),
            transfer_failed: self.transfer_failed.load(Ordering::Relaxed),
        }
    }
}

impl RunStatistics {
    pub fn operations_success(&self) -> u64 {
        self.credit_success + self.debit_success + self.transfer_success
    }

    pub fn operations_failed(&self) -> u64 {
        self.credit_failed + self.debit_failed + self.transfer_failed
    }

    pub fn operations_total(&self) -> u64 {
        self.operations_success() + self.operations_failed()
    }
}
