//! Identifier and idempotency-key generation.
//!
//! Ids are `{prefix}-{millis}-{seq}-{rand}`: UTC millisecond timestamp, a
//! process-wide sequence tick, and a 4-digit random suffix. The sequence
//! component guarantees within-run uniqueness; the service is still free to
//! deduplicate whatever it wants on its side.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a collision-resistant identifier with the given prefix.
pub fn gen_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
    format!("{}-{}-{}-{}", prefix, millis, seq, suffix)
}

/// Fresh wallet id (`wallet-...`).
pub fn wallet_id() -> String {
    gen_id("wallet")
}

/// Fresh owner id (`user-...`).
pub fn owner_id() -> String {
    gen_id("user")
}

/// Fresh idempotency key (`idem-...`), one per mutating request.
pub fn idempotency_key() -> String {
    gen_id("idem")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_id_has_prefix_and_parts() {
        let id = gen_id("wallet");
        assert!(id.starts_with("wallet-"));
        assert_eq!(id.split('-').count(), 4);
    }

    #[test]
    fn test_no_collisions_in_10k_generations() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(idempotency_key()), "duplicate idempotency key");
        }
    }

    #[test]
    fn test_distinct_prefixes() {
        assert!(wallet_id().starts_with("wallet-"));
        assert!(owner_id().starts_with("user-"));
        assert!(idempotency_key().starts_with("idem-"));
    }
}
