use crate::config::LedgerConfig;
use crate::error::{AppError, AppResult};
use crate::ledger::BalanceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

/// `getBalance` result: value is in lamports
#[derive(Debug, Deserialize)]
pub struct BalanceResult {
    pub value: u64,
}

/// Client for a Solana JSON-RPC node
pub struct SolanaRpcClient {
    http: Client,
    url: String,
    commitment: String,
    max_retries: u32,
}

impl std::fmt::Debug for SolanaRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpcClient")
            .field("url", &self.url)
            .field("commitment", &self.commitment)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl SolanaRpcClient {
    /// Create a new RPC client from config
    pub fn new(config: &LedgerConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            url: config.endpoint().to_string(),
            commitment: config.commitment.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn balance_request(&self, address: &str) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "getBalance",
            params: json!([address, { "commitment": self.commitment }]),
        }
    }

    async fn get_balance_once(&self, request: &RpcRequest) -> AppResult<u64> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::oracle(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::oracle(format!("node returned {}: {}", status, body)));
        }

        let body: RpcResponse<BalanceResult> = response
            .json()
            .await
            .map_err(|e| AppError::oracle(format!("malformed response: {}", e)))?;

        if let Some(err) = body.error {
            return Err(AppError::oracle(format!("rpc error {}: {}", err.code, err.message)));
        }

        body.result
            .map(|r| r.value)
            .ok_or_else(|| AppError::oracle("response carried neither result nor error"))
    }
}

#[async_trait]
impl BalanceSource for SolanaRpcClient {
    async fn lamports(&self, address: &str) -> AppResult<u64> {
        let request = self.balance_request(address);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt));
                warn!(
                    "Retrying getBalance (attempt {}/{}), waiting {:?}",
                    attempt, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }

            match self.get_balance_once(&request).await {
                Ok(lamports) => {
                    debug!(address, lamports, "getBalance succeeded");
                    return Ok(lamports);
                }
                Err(e) => {
                    error!(address, "getBalance failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::oracle("no attempts made")))
    }
}
