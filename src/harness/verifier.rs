//! Post-run eventual-consistency verification by sampling.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::api::{WalletApi, WalletRecord};

/// Ledger projection observation for one sampled wallet.
#[derive(Debug, Clone)]
pub struct VerificationSample {
    pub wallet_id: String,
    pub entry_count: Option<u64>,
    pub error: Option<String>,
}

pub struct ConsistencyVerifier<'a> {
    api: &'a dyn WalletApi,
}

impl<'a> ConsistencyVerifier<'a> {
    pub fn new(api: &'a dyn WalletApi) -> Self {
        Self { api }
    }

    /// Wait out the settle delay, then query the ledger projection for
    /// `min(sample_size, population)` wallets drawn without replacement.
    /// A failed query is recorded on its sample and the rest still run.
    pub async fn verify<R: Rng>(
        &self,
        population: &[WalletRecord],
        sample_size: usize,
        settle_delay: Duration,
        rng: &mut R,
    ) -> Vec<VerificationSample> {
        info!(
            settle_secs = settle_delay.as_secs(),
            "Waiting for ledger projection to settle"
        );
        sleep(settle_delay).await;

        let sampled: Vec<&WalletRecord> = population
            .choose_multiple(rng, sample_size.min(population.len()))
            .collect();
        info!(samples = sampled.len(), "Verifying ledger entries");

        let mut samples = Vec::with_capacity(sampled.len());
        for wallet in sampled {
            samples.push(match self.api.ledger_entries(&wallet.id).await {
                Ok(ledger) => {
                    info!(wallet_id = %wallet.id, entries = ledger.count, "Ledger sample");
                    VerificationSample {
                        wallet_id: wallet.id.clone(),
                        entry_count: Some(ledger.count),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(wallet_id = %wallet.id, error = %e, "Ledger query failed");
                    VerificationSample {
                        wallet_id: wallet.id.clone(),
                        entry_count: None,
                        error: Some(e.to_string()),
                    }
                }
            });
        }
        samples
    }
}
