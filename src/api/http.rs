//! reqwest-backed implementation of [`WalletApi`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;

use super::error::ApiError;
use super::types::{AmountRequest, CreateWalletRequest, LedgerResponse, TransferRequest, WalletRecord};
use super::WalletApi;

const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";
const ERROR_BODY_LIMIT: usize = 512;

pub struct HttpWalletClient {
    client: reqwest::Client,
    base_url: String,
    mutation_timeout: Duration,
    read_timeout: Duration,
}

impl HttpWalletClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.mutation_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            mutation_timeout: Duration::from_millis(config.mutation_timeout_ms),
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: &str,
    ) -> Result<R, ApiError> {
        let url = self.url(path);
        debug!(%url, idempotency_key, "POST");
        let response = self
            .client
            .post(&url)
            .header(IDEMPOTENCY_HEADER, idempotency_key)
            .timeout(self.mutation_timeout)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .timeout(self.read_timeout)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(ERROR_BODY_LIMIT);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WalletApi for HttpWalletClient {
    async fn create_wallet(
        &self,
        request: &CreateWalletRequest,
        idempotency_key: &str,
    ) -> Result<WalletRecord, ApiError> {
        self.post_json("/wallets", request, idempotency_key).await
    }

    async fn credit(
        &self,
        wallet_id: &str,
        request: &AmountRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/wallets/{}/credit", wallet_id);
        let _: serde_json::Value = self.post_json(&path, request, idempotency_key).await?;
        Ok(())
    }

    async fn debit(
        &self,
        wallet_id: &str,
        request: &AmountRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/wallets/{}/debit", wallet_id);
        let _: serde_json::Value = self.post_json(&path, request, idempotency_key).await?;
        Ok(())
    }

    async fn transfer(
        &self,
        wallet_id: &str,
        request: &TransferRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/wallets/{}/transfer", wallet_id);
        let _: serde_json::Value = self.post_json(&path, request, idempotency_key).await?;
        Ok(())
    }

    async fn get_wallet(&self, wallet_id: &str) -> Result<WalletRecord, ApiError> {
        self.get_json(&format!("/wallets/{}", wallet_id)).await
    }

    async fn ledger_entries(&self, wallet_id: &str) -> Result<LedgerResponse, ApiError> {
        self.get_json(&format!("/ledger/wallet/{}", wallet_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/".to_string(),
            ..ApiConfig::default()
        };
        let client = HttpWalletClient::new(&config).unwrap();

        assert_eq!(client.url("/wallets"), "http://localhost:3000/wallets");
        assert_eq!(
            client.url("/ledger/wallet/wallet-1"),
            "http://localhost:3000/ledger/wallet/wallet-1"
        );
    }

    #[test]
    fn test_timeouts_come_from_config() {
        let config = ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            mutation_timeout_ms: 10_000,
            read_timeout_ms: 5_000,
        };
        let client = HttpWalletClient::new(&config).unwrap();

        assert_eq!(client.mutation_timeout, Duration::from_secs(10));
        assert_eq!(client.read_timeout, Duration::from_secs(5));
    }
}
