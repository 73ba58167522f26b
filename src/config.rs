use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level harness configuration, loaded from `config/{env}.yaml`.
///
/// Every section has serde defaults so a bare checkout runs without a config
/// file; a config file that exists but does not parse is a fatal error.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "loadtest.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub mutation_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            mutation_timeout_ms: 10_000,
            read_timeout_ms: 5_000,
        }
    }
}

/// Amount-selection constants for the randomized operation mix.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PolicyConfig {
    /// Inclusive initial balance range for created wallets.
    pub initial_balance_min: i64,
    pub initial_balance_max: i64,
    /// Inclusive credit amount range, independent of balance.
    pub credit_min: i64,
    pub credit_max: i64,
    /// Debit ceiling = min(balance * debit_fraction, debit_cap).
    pub debit_fraction: f64,
    pub debit_cap: i64,
    /// Transfer ceiling = min(balance * transfer_fraction, transfer_cap).
    pub transfer_fraction: f64,
    pub transfer_cap: i64,
    /// Floor for debit/transfer amounts; a ceiling at or under this skips.
    pub min_amount: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            initial_balance_min: 100,
            initial_balance_max: 5000,
            credit_min: 10,
            credit_max: 500,
            debit_fraction: 0.5,
            debit_cap: 500,
            transfer_fraction: 0.3,
            transfer_cap: 300,
            min_amount: 10,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunConfig {
    /// Delay between consecutive requests in sequential mode.
    pub pacing_ms: u64,
    /// Wait before querying the asynchronous ledger projection.
    pub settle_secs: u64,
    /// Wallets sampled for post-run verification.
    pub sample_size: usize,
    /// Directory for the best-effort failure capture files.
    pub capture_dir: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 50,
            settle_secs: 5,
            sample_size: 5,
            capture_dir: "./debug-captures".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        if !Path::new(&config_path).exists() {
            return Self::default();
        }
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize() {
        let yaml = r#"
log:
  log_level: "debug"
  log_dir: "./logs"
  log_file: "loadtest.log"
  use_json: true
  rotation: "daily"
api:
  base_url: "http://localhost:3000"
  mutation_timeout_ms: 10000
  read_timeout_ms: 5000
policy:
  initial_balance_min: 100
  initial_balance_max: 5000
  credit_min: 10
  credit_max: 500
  debit_fraction: 0.5
  debit_cap: 500
  transfer_fraction: 0.3
  transfer_cap: 300
  min_amount: 10
run:
  pacing_ms: 50
  settle_secs: 5
  sample_size: 5
  capture_dir: "./debug-captures"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log.log_level, "debug");
        assert!(config.log.use_json);
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.policy.debit_cap, 500);
        assert_eq!(config.run.sample_size, 5);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let yaml = r#"
api:
  base_url: "http://10.0.0.1:8080"
  mutation_timeout_ms: 2000
  read_timeout_ms: 1000
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.api.base_url, "http://10.0.0.1:8080");
        assert_eq!(config.policy.min_amount, 10);
        assert_eq!(config.run.pacing_ms, 50);
        assert_eq!(config.log.rotation, "daily");
    }

    #[test]
    fn test_default_policy_bounds() {
        let policy = PolicyConfig::default();

        assert!(policy.credit_min > 0);
        assert!(policy.credit_min <= policy.credit_max);
        assert!(policy.debit_fraction > 0.0 && policy.debit_fraction <= 1.0);
        assert!(policy.transfer_cap < policy.debit_cap);
    }
}
