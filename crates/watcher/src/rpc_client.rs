use crate::chain::ChainAccessor;
use crate::config::ChainConfig;
use crate::error::ChainError;
use async_trait::async_trait;
use faucet_types::{Address, BlockHash, BlockNumber, TransactionReceipt, TxHash};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

pub struct RpcClient {
    client: reqwest::Client,
    config: ChainConfig,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.rpc_url
    }

    /// Calls `method` with retries and returns the `result` member.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(self.config.retry_delay_seconds * attempt as u64);
                warn!(
                    "RPC call {} failed, retrying in {}s (attempt {}/{}): {}",
                    method,
                    delay.as_secs(),
                    attempt,
                    self.config.max_retries,
                    last_error
                        .as_ref()
                        .map(|e: &ChainError| e.to_string())
                        .unwrap_or_default()
                );
                sleep(delay).await;
            }

            match self.call_once(method, params.clone()).await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("RPC call {} succeeded after {} retries", method, attempt);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt == self.config.max_retries {
                        error!(
                            "RPC call {} failed after {} retries",
                            method, self.config.max_retries
                        );
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ChainError::InvalidResponse(format!("{} failed", method))))
    }

    /// Single attempt, no retries. Used for calls that must not be repeated
    /// blindly, such as broadcasting a transaction.
    pub async fn call_once(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let response: Value = self
            .client
            .post(&self.config.rpc_url)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown RPC error")
                .to_string();
            let code = error.get("code").and_then(|v| v.as_i64()).unwrap_or(-1);

            if code == -32005 || code == 429 {
                return Err(ChainError::RateLimited(message));
            }

            return Err(ChainError::Rpc { code, message });
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::InvalidResponse("missing result".to_string()))
    }

    pub async fn get_block_number(&self) -> Result<BlockNumber, ChainError> {
        let result = self.call("eth_blockNumber", serde_json::json!([])).await?;
        parse_quantity_u64(&result)
    }

    pub async fn get_block_hash(&self, number: BlockNumber) -> Result<Option<BlockHash>, ChainError> {
        let result = self
            .call(
                "eth_getBlockByNumber",
                serde_json::json!([format!("0x{:x}", number), false]),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        result
            .get("hash")
            .and_then(|v| v.as_str())
            .map(|hash| Some(hash.to_string()))
            .ok_or_else(|| ChainError::InvalidResponse("block without hash".to_string()))
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let result = self.call("eth_chainId", serde_json::json!([])).await?;
        parse_quantity_u64(&result)
    }

    pub async fn get_balance(&self, address: &Address) -> Result<u128, ChainError> {
        let result = self
            .call(
                "eth_getBalance",
                serde_json::json!([address.to_checksum(), "latest"]),
            )
            .await?;
        parse_quantity_u128(&result)
    }

    pub async fn gas_price(&self) -> Result<u128, ChainError> {
        let result = self.call("eth_gasPrice", serde_json::json!([])).await?;
        parse_quantity_u128(&result)
    }

    /// Nonce including transactions still in the mempool.
    pub async fn get_pending_nonce(&self, address: &Address) -> Result<u64, ChainError> {
        let result = self
            .call(
                "eth_getTransactionCount",
                serde_json::json!([address.to_checksum(), "pending"]),
            )
            .await?;
        parse_quantity_u64(&result)
    }

    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, ChainError> {
        let result = self
            .call_once(
                "eth_sendRawTransaction",
                serde_json::json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ChainError::InvalidResponse("transaction hash is not a string".to_string()))
    }

    /// `Ok(None)` while the transaction is still pending.
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        let result = self
            .call("eth_getTransactionReceipt", serde_json::json!([hash]))
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        parse_receipt(&result).map(Some)
    }
}

#[async_trait]
impl ChainAccessor for RpcClient {
    async fn get_current_block_number(&self) -> Result<BlockNumber, ChainError> {
        self.get_block_number().await
    }

    async fn get_block_hash_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<BlockHash>, ChainError> {
        self.get_block_hash(number).await
    }
}

fn quantity_str(value: &Value) -> Result<&str, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("expected hex quantity, got {}", value)))?;
    Ok(s.trim_start_matches("0x"))
}

pub(crate) fn parse_quantity_u64(value: &Value) -> Result<u64, ChainError> {
    let hex_str = quantity_str(value)?;
    u64::from_str_radix(hex_str, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("failed to parse quantity {}: {}", hex_str, e)))
}

pub(crate) fn parse_quantity_u128(value: &Value) -> Result<u128, ChainError> {
    let hex_str = quantity_str(value)?;
    u128::from_str_radix(hex_str, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("failed to parse quantity {}: {}", hex_str, e)))
}

fn parse_receipt(value: &Value) -> Result<TransactionReceipt, ChainError> {
    let field = |name: &str| {
        value
            .get(name)
            .ok_or_else(|| ChainError::InvalidResponse(format!("receipt missing {}", name)))
    };

    let as_string = |v: &Value, name: &str| {
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| ChainError::InvalidResponse(format!("receipt {} is not a string", name)))
    };

    // Pre-Byzantium receipts carry a state root instead of a status.
    let status = match value.get("status") {
        Some(status) if !status.is_null() => parse_quantity_u64(status)? == 1,
        _ => true,
    };

    Ok(TransactionReceipt {
        transaction_hash: as_string(field("transactionHash")?, "transactionHash")?,
        block_number: parse_quantity_u64(field("blockNumber")?)?,
        block_hash: as_string(field("blockHash")?, "blockHash")?,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(url: String) -> ChainConfig {
        ChainConfig {
            rpc_url: url,
            rpc_timeout_seconds: 5,
            max_retries: 0,
            retry_delay_seconds: 0,
        }
    }

    async fn mock_rpc(server: &mut mockito::Server, method: &str, result: Value) -> mockito::Mock {
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": method })))
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_get_block_number_parses_hex() {
        let mut server = mockito::Server::new_async().await;
        let mock = mock_rpc(&mut server, "eth_blockNumber", json!("0x1b4")).await;

        let client = RpcClient::new(config_for(server.url())).unwrap();
        assert_eq!(client.get_current_block_number().await.unwrap(), 436);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_block_hash_returns_none_for_unknown_block() {
        let mut server = mockito::Server::new_async().await;
        mock_rpc(&mut server, "eth_getBlockByNumber", Value::Null).await;

        let client = RpcClient::new(config_for(server.url())).unwrap();
        assert_eq!(client.get_block_hash_by_number(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_block_hash_requests_hex_number() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "method": "eth_getBlockByNumber",
                "params": ["0xc", false]
            })))
            .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": { "number": "0xc", "hash": "0xabc" } }).to_string())
            .create_async()
            .await;

        let client = RpcClient::new(config_for(server.url())).unwrap();
        assert_eq!(
            client.get_block_hash_by_number(12).await.unwrap(),
            Some("0xabc".to_string())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rpc_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_body(
                json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32000, "message": "header not found" } })
                    .to_string(),
            )
            .create_async()
            .await;

        let client = RpcClient::new(config_for(server.url())).unwrap();
        match client.get_block_number().await {
            Err(ChainError::Rpc { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "header not found");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_error_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_body(
                json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": 429, "message": "slow down" } })
                    .to_string(),
            )
            .create_async()
            .await;

        let client = RpcClient::new(config_for(server.url())).unwrap();
        assert!(matches!(
            client.get_block_number().await,
            Err(ChainError::RateLimited(_))
        ));
    }

    #[tokio::test]
    async fn test_receipt_parsing() {
        let mut server = mockito::Server::new_async().await;
        mock_rpc(
            &mut server,
            "eth_getTransactionReceipt",
            json!({
                "transactionHash": "0x01",
                "blockNumber": "0x10",
                "blockHash": "0x02",
                "status": "0x0"
            }),
        )
        .await;

        let client = RpcClient::new(config_for(server.url())).unwrap();
        let receipt = client.get_transaction_receipt("0x01").await.unwrap().unwrap();
        assert_eq!(receipt.block_number, 16);
        assert_eq!(receipt.block_hash, "0x02");
        assert!(!receipt.status);
    }

    #[test]
    fn test_parse_quantity_rejects_non_string() {
        assert!(parse_quantity_u64(&json!(12)).is_err());
        assert_eq!(parse_quantity_u128(&json!("0xde0b6b3a7640000")).unwrap(), 10u128.pow(18));
    }
}
