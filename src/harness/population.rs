//! Wallet population build phase.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use rand::Rng;
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::api::{CreateWalletRequest, WalletApi, WalletRecord};
use crate::capture::CaptureSink;
use crate::idgen;

use super::error::HarnessError;
use super::policy::OperationPolicy;
use super::stats::StatsAggregator;

/// Creates the wallet population and tallies creation outcomes. Individual
/// create failures are tallied and captured, never retried; only a fully
/// empty population is fatal.
pub struct WalletPopulationBuilder<'a> {
    api: &'a dyn WalletApi,
    policy: &'a OperationPolicy,
    stats: &'a StatsAggregator,
    capture: &'a CaptureSink,
    pacing: Duration,
}

impl<'a> WalletPopulationBuilder<'a> {
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
        }
    }

    /// Create `count` wallets, at most `parallelism` requests in flight.
    /// With `parallelism == 1` requests run strictly in submission order with
    /// the pacing delay between them; above that, completion order decides
    /// the population order.
    pub async fn build<R: Rng>(
        &self,
        count: usize,
        parallelism: usize,
        rng: &mut R,
    ) -> Result<Vec<WalletRecord>, HarnessError> {
        // Identities and balances are drawn up front, in submission order.
        let requests: Vec<CreateWalletRequest> = (0..count)
            .map(|_| CreateWalletRequest {
                wallet_id: idgen::wallet_id(),
                owner_id: idgen::owner_id(),
                initial_balance: self.policy.initial_balance(rng),
            })
            .collect();

        info!(count, parallelism, "Creating wallet population");

        let mut population = Vec::with_capacity(count);
        if parallelism <= 1 {
            for (i, request) in requests.iter().enumerate() {
                if let Some(wallet) = self.create_one(request).await {
                    population.push(wallet);
                }
                self.log_progress(i + 1, count);
                if i + 1 < count {
                    sleep(self.pacing).await;
                }
            }
        } else {
            let mut creates = stream::iter(requests.iter())
                .map(|request| self.create_one(request))
                .buffer_unordered(parallelism);
            let mut done = 0;
            while let Some(result) = creates.next().await {
                done += 1;
                if let Some(wallet) = result {
                    population.push(wallet);
                }
                self.log_progress(done, count);
            }
        }

        if population.is_empty() {
            return Err(HarnessError::EmptyPopulation);
        }
        info!(
            created = population.len(),
            failed = count - population.len(),
            "Population build complete"
        );
        Ok(population)
    }

    async fn create_one(&self, request: &CreateWalletRequest) -> Option<WalletRecord> {
        let key = idgen::idempotency_key();
        match self.api.create_wallet(request, &key).await {
            Ok(wallet) => {
                debug!(wallet_id = %wallet.id, balance = wallet.balance, "Wallet created");
                self.stats.record_wallet(true);
                Some(wallet)
            }
            Err(e) => {
                warn!(wallet_id = %request.wallet_id, error = %e, "Wallet creation failed");
                self.stats.record_wallet(false);
                self.capture.record(
                    "create_wallet_error",
                    &e.to_string(),
                    Some(json!({
                        "walletId": request.wallet_id,
                        "ownerId": request.owner_id,
                        "initialBalance": request.initial_balance,
                    })),
                );
                None
            }
        }
    }

    fn log_progress(&self, done: usize, total: usize) {
        if done % 10 == 0 || done == total {
            info!(
                done,
                total,
                created = self.stats.wallets_created(),
                "Creation progress"
            );
        }
    }
}
