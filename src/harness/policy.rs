//! Randomized operation selection and balance-aware amount bounding.
//!
//! All randomness for one operation is drawn up front into an
//! [`OperationDraw`], before any network I/O. The later balance read (debit
//! and transfer only) is deliberately racy: no lock is held between the read
//! and the amount decision, so concurrent operations on the same wallet can
//! see stale balances. That stresses the service's own concurrency control,
//! which is the point of the harness. Pre-drawing also means sequential and
//! parallel modes consume the RNG in identical submission order.

use rand::Rng;
use serde::Serialize;

use crate::config::PolicyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Credit,
    Debit,
    Transfer,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Credit => "credit",
            OperationKind::Debit => "debit",
            OperationKind::Transfer => "transfer",
        }
    }
}

/// Every random decision for one operation, drawn before dispatch.
#[derive(Debug, Clone, Copy)]
pub struct OperationDraw {
    pub kind: OperationKind,
    /// Index of the target (source for transfers) wallet in the population.
    pub target_idx: usize,
    /// Transfer destination, always distinct from `target_idx`. `None` for a
    /// transfer means the population was too small and the operation is
    /// abandoned without a request.
    pub dest_idx: Option<usize>,
    /// Uniform fraction in [0, 1): positions the amount within whatever
    /// bounds apply once the balance is known.
    pub unit: f64,
}

#[derive(Debug, Clone)]
pub struct OperationPolicy {
    config: PolicyConfig,
}

impl OperationPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Draw one operation against a population of `population_len` wallets.
    /// `population_len` must be at least 1.
    pub fn draw<R: Rng>(&self, rng: &mut R, population_len: usize) -> OperationDraw {
        let kind = match rng.gen_range(0..3) {
            0 => OperationKind::Credit,
            1 => OperationKind::Debit,
            _ => OperationKind::Transfer,
        };
        let target_idx = rng.gen_range(0..population_len);

        let dest_idx = if kind == OperationKind::Transfer && population_len >= 2 {
            // Draw over the other wallets, then shift past the source.
            let drawn = rng.gen_range(0..population_len - 1);
            Some(if drawn >= target_idx { drawn + 1 } else { drawn })
        } else {
            None
        };

        OperationDraw {
            kind,
            target_idx,
            dest_idx,
            unit: rng.gen_range(0.0..1.0),
        }
    }

    /// Initial balance for a new wallet, uniform over the configured range.
    pub fn initial_balance<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.config.initial_balance_min..=self.config.initial_balance_max)
    }

    /// Credit amount: uniform over the configured range, balance-independent.
    pub fn credit_amount(&self, unit: f64) -> i64 {
        scale(unit, self.config.credit_min, self.config.credit_max)
    }

    pub fn debit_ceiling(&self, balance: i64) -> i64 {
        fraction_ceiling(balance, self.config.debit_fraction, self.config.debit_cap)
    }

    pub fn transfer_ceiling(&self, balance: i64) -> i64 {
        fraction_ceiling(
            balance,
            self.config.transfer_fraction,
            self.config.transfer_cap,
        )
    }

    /// Amount under a balance-derived ceiling, or `None` when the ceiling is
    /// at or under the minimum and the operation must be skipped.
    pub fn bounded_amount(&self, unit: f64, ceiling: i64) -> Option<i64> {
        let min = self.config.min_amount;
        if ceiling <= min {
            return None;
        }
        Some(scale(unit, min, ceiling))
    }
}

/// Map a unit fraction onto the inclusive integer range [min, max].
fn scale(unit: f64, min: i64, max: i64) -> i64 {
    debug_assert!(min <= max);
    let span = (max - min + 1) as f64;
    let amount = min + (unit * span) as i64;
    amount.min(max)
}

fn fraction_ceiling(balance: i64, fraction: f64, cap: i64) -> i64 {
    let by_balance = (balance.max(0) as f64 * fraction) as i64;
    by_balance.min(cap)
}
