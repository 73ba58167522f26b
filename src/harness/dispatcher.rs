//! Operation dispatch: one code path parameterized by parallelism.
//!
//! Sequential mode executes draws one at a time with a pacing delay; parallel
//! mode keeps up to `parallelism` operations in flight and collects outcomes
//! in completion order. Two operations hitting the same wallet have no
//! ordering guarantee in either mode; surfacing races in the external service
//! is what the harness is for.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use rand::Rng;
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::api::{AmountRequest, TransferRequest, WalletApi, WalletRecord};
use crate::capture::CaptureSink;
use crate::idgen;

use super::policy::{OperationDraw, OperationKind, OperationPolicy};
use super::stats::StatsAggregator;

/// How often a task body runs. The dispatcher contract admits retrying
/// policies; only no-retry is implemented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    #[default]
    None,
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryPolicy::None => 1,
        }
    }
}

/// Result of one dispatched operation, recorded exactly once.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub kind: OperationKind,
    pub success: bool,
    pub amount: Option<i64>,
    pub error: Option<String>,
}

impl OperationOutcome {
    fn ok(kind: OperationKind, amount: i64) -> Self {
        Self {
            kind,
            success: true,
            amount: Some(amount),
            error: None,
        }
    }

    fn failed(kind: OperationKind, error: String) -> Self {
        Self {
            kind,
            success: false,
            amount: None,
            error: Some(error),
        }
    }
}

pub struct ConcurrencyDispatcher<'a> {
    api: &'a dyn WalletApi,
    policy: &'a OperationPolicy,
    stats: &'a StatsAggregator,
    capture: &'a CaptureSink,
    pacing: Duration,
    retry: RetryPolicy,
}

impl<'a> ConcurrencyDispatcher<'a> {
    pub fn new(
        api: &'a dyn WalletApi,
        policy: &'a OperationPolicy,
        stats: &'a StatsAggregator,
        capture: &'a CaptureSink,
        pacing: Duration,
    ) -> Self {
        Self {
            api,
            policy,
            stats,
            capture,
            pacing,
            retry: RetryPolicy::default(),
        }
    }

    /// Execute `operation_count` randomized operations against the
    /// population. Draws are pre-generated in submission order, so the RNG
    /// sees the same sequence whichever mode runs them.
    pub async fn run<R: Rng>(
        &self,
        operation_count: usize,
        population: &[WalletRecord],
        parallelism: usize,
        rng: &mut R,
    ) {
        debug_assert!(!population.is_empty());
        let draws: Vec<OperationDraw> = (0..operation_count)
            .map(|_| self.policy.draw(rng, population.len()))
            .collect();

        info!(
            operations = operation_count,
            parallelism,
            mode = if parallelism > 1 { "parallel" } else { "sequential" },
            "Dispatching operations"
        );

        if parallelism <= 1 {
            for (i, draw) in draws.into_iter().enumerate() {
                let outcome = self.execute(i, draw, population).await;
                self.record(outcome);
                self.log_progress(i + 1, operation_count);
                if i + 1 < operation_count {
                    sleep(self.pacing).await;
                }
            }
        } else {
            let mut outcomes = stream::iter(draws.into_iter().enumerate())
                .map(|(i, draw)| self.execute(i, draw, population))
                .buffer_unordered(parallelism);
            let mut done = 0;
            while let Some(outcome) = outcomes.next().await {
                done += 1;
                self.record(outcome);
                self.log_progress(done, operation_count);
            }
        }
    }

    async fn execute(
        &self,
        index: usize,
        draw: OperationDraw,
        population: &[WalletRecord],
    ) -> OperationOutcome {
        // attempts() is 1 under RetryPolicy::None; the loop is the seam a
        // retrying policy would widen.
        let mut outcome = self.execute_once(index, draw, population).await;
        for _ in 1..self.retry.attempts() {
            if outcome.success {
                break;
            }
            outcome = self.execute_once(index, draw, population).await;
        }
        outcome
    }

    async fn execute_once(
        &self,
        index: usize,
        draw: OperationDraw,
        population: &[WalletRecord],
    ) -> OperationOutcome {
        match draw.kind {
            OperationKind::Credit => self.execute_credit(index, draw, population).await,
            OperationKind::Debit => self.execute_debit(index, draw, population).await,
            OperationKind::Transfer => self.execute_transfer(index, draw, population).await,
        }
    }

    async fn execute_credit(
        &self,
        index: usize,
        draw: OperationDraw,
        population: &[WalletRecord],
    ) -> OperationOutcome {
        let wallet = &population[draw.target_idx];
        let amount = self.policy.credit_amount(draw.unit);
        let request = AmountRequest {
            amount,
            description: format!("Load test credit #{}", index + 1),
        };
        match self
            .api
            .credit(&wallet.id, &request, &idgen::idempotency_key())
            .await
        {
            Ok(()) => OperationOutcome::ok(OperationKind::Credit, amount),
            Err(e) => self.request_failed(OperationKind::Credit, e.to_string()),
        }
    }

    async fn execute_debit(
        &self,
        index: usize,
        draw: OperationDraw,
        population: &[WalletRecord],
    ) -> OperationOutcome {
        let wallet = &population[draw.target_idx];
        // Advisory read; may be stale by the time the debit lands.
        let balance = match self.api.get_wallet(&wallet.id).await {
            Ok(current) => current.balance,
            Err(e) => return self.request_failed(OperationKind::Debit, e.to_string()),
        };
        let ceiling = self.policy.debit_ceiling(balance);
        let Some(amount) = self.policy.bounded_amount(draw.unit, ceiling) else {
            debug!(wallet_id = %wallet.id, balance, ceiling, "Debit skipped: low balance");
            return OperationOutcome::failed(
                OperationKind::Debit,
                format!("skipped: ceiling {} at or under minimum", ceiling),
            );
        };
        let request = AmountRequest {
            amount,
            description: format!("Load test debit #{}", index + 1),
        };
        match self
            .api
            .debit(&wallet.id, &request, &idgen::idempotency_key())
            .await
        {
            Ok(()) => OperationOutcome::ok(OperationKind::Debit, amount),
            Err(e) => self.request_failed(OperationKind::Debit, e.to_string()),
        }
    }

    async fn execute_transfer(
        &self,
        index: usize,
        draw: OperationDraw,
        population: &[WalletRecord],
    ) -> OperationOutcome {
        let Some(dest_idx) = draw.dest_idx else {
            return OperationOutcome::failed(
                OperationKind::Transfer,
                "abandoned: population has fewer than 2 wallets".to_string(),
            );
        };
        let source = &population[draw.target_idx];
        let dest = &population[dest_idx];
        let balance = match self.api.get_wallet(&source.id).await {
            Ok(current) => current.balance,
            Err(e) => return self.request_failed(OperationKind::Transfer, e.to_string()),
        };
        let ceiling = self.policy.transfer_ceiling(balance);
        let Some(amount) = self.policy.bounded_amount(draw.unit, ceiling) else {
            debug!(source_id = %source.id, balance, ceiling, "Transfer skipped: low balance");
            return OperationOutcome::failed(
                OperationKind::Transfer,
                format!("skipped: ceiling {} at or under minimum", ceiling),
            );
        };
        let request = TransferRequest {
            to_wallet_id: dest.id.clone(),
            amount,
            description: format!("Load test transfer #{}", index + 1),
        };
        match self
            .api
            .transfer(&source.id, &request, &idgen::idempotency_key())
            .await
        {
            Ok(()) => OperationOutcome::ok(OperationKind::Transfer, amount),
            Err(e) => self.request_failed(OperationKind::Transfer, e.to_string()),
        }
    }

    fn request_failed(&self, kind: OperationKind, error: String) -> OperationOutcome {
        warn!(kind = kind.as_str(), error = %error, "Operation failed");
        self.capture.record(
            "operation_error",
            &error,
            Some(json!({"operation": kind.as_str()})),
        );
        OperationOutcome::failed(kind, error)
    }

    fn record(&self, outcome: OperationOutcome) {
        self.stats.record_operation(outcome.kind, outcome.success);
    }

    fn log_progress(&self, done: usize, total: usize) {
        if done % 20 == 0 || done == total {
            let snap = self.stats.snapshot();
            info!(
                done,
                total,
                success = snap.operations_success(),
                failed = snap.operations_failed(),
                "Operation progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_retry_policy_runs_once() {
        assert_eq!(RetryPolicy::default().attempts(), 1);
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = OperationOutcome::ok(OperationKind::Credit, 42);
        assert!(ok.success);
        assert_eq!(ok.amount, Some(42));
        assert!(ok.error.is_none());

        let failed = OperationOutcome::failed(OperationKind::Transfer, "boom".to_string());
        assert!(!failed.success);
        assert_eq!(failed.amount, None);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
