//! Minimal JSON-RPC 2.0 client for an EVM-style node.
//!
//! Only the handful of `eth_*` methods the workflows consume are exposed.
//! Receipt polling deliberately has no timeout: a hung node hangs the
//! invoking workflow, and any deadline must come from the HTTP client
//! configuration or the operator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, trace};
use url::Url;

use crate::error::ChainError;

/// Default receipt poll interval, roughly one devnet block.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_500);

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// A single log entry from a transaction receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Transaction receipt, trimmed to the fields the orchestrator reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub status: Option<U64>,
    pub contract_address: Option<Address>,
    pub gas_used: U256,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

impl TxReceipt {
    /// Whether the transaction was mined with a success status.
    pub fn succeeded(&self) -> bool {
        self.status.is_some_and(|s| s == U64::from(1))
    }

    /// Converts a failed receipt into [`ChainError::TransactionFailed`],
    /// keeping the receipt (including logs) for diagnosis.
    pub fn ensure_success(self) -> Result<TxReceipt, ChainError> {
        if self.succeeded() {
            Ok(self)
        } else {
            Err(ChainError::TransactionFailed {
                receipt: Box::new(self),
            })
        }
    }
}

/// JSON-RPC client over HTTP.
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: Url,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: Url) -> Self {
        Self::with_poll_interval(url, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(url: Url, poll_interval: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            poll_interval,
            next_id: AtomicU64::new(1),
        }
    }

    /// Issues a raw JSON-RPC request and returns the `result` field as-is
    /// (which may be JSON `null`, e.g. for a pending receipt).
    pub async fn request_value<P: Serialize>(
        &self,
        method: &str,
        params: P,
    ) -> Result<serde_json::Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        trace!(method, id, "sending json-rpc request");

        let response: RpcResponse = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result.unwrap_or(serde_json::Value::Null))
    }

    /// Issues a JSON-RPC request and deserializes a non-null `result`.
    pub async fn request<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, ChainError> {
        let value = self.request_value(method, params).await?;
        if value.is_null() {
            return Err(ChainError::InvalidResponse(format!(
                "{method}: missing result"
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    pub async fn get_balance(&self, address: Address) -> Result<U256, ChainError> {
        self.request("eth_getBalance", json!([address, "latest"]))
            .await
    }

    /// Pending nonce for an account.
    pub async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        let count: U64 = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        Ok(count.to::<u64>())
    }

    pub async fn gas_price(&self) -> Result<u128, ChainError> {
        let price: U256 = self.request("eth_gasPrice", json!([])).await?;
        Ok(price.to::<u128>())
    }

    /// Estimates gas for a call or deployment (`to: None`).
    pub async fn estimate_gas(
        &self,
        from: Address,
        to: Option<Address>,
        data: &Bytes,
        value: U256,
    ) -> Result<u64, ChainError> {
        let mut call = json!({
            "from": from,
            "data": data,
            "value": value,
        });
        if let Some(to) = to {
            call["to"] = json!(to);
        }
        let gas: U256 = self.request("eth_estimateGas", json!([call])).await?;
        Ok(gas.to::<u64>())
    }

    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError> {
        let raw = Bytes::copy_from_slice(raw);
        self.request("eth_sendRawTransaction", json!([raw])).await
    }

    pub async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, ChainError> {
        let value = self
            .request_value("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ChainError::InvalidResponse(format!("eth_getTransactionReceipt: {e}")))
    }

    /// Read-only contract call against the latest block.
    pub async fn call(&self, to: Address, data: &Bytes) -> Result<Bytes, ChainError> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    /// Blocks until the transaction is mined. No timeout at this layer.
    pub async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, ChainError> {
        debug!(%hash, "waiting for transaction receipt");
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                debug!(%hash, status = ?receipt.status, "transaction mined");
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_deserializes_from_rpc_json() {
        let json = serde_json::json!({
            "transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "status": "0x1",
            "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "gasUsed": "0x12d687",
            "logs": [{
                "address": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "topics": ["0x1111111111111111111111111111111111111111111111111111111111111111"],
                "data": "0x00"
            }],
            "blockNumber": "0x10"
        });
        let receipt: TxReceipt = serde_json::from_value(json).unwrap();
        assert!(receipt.succeeded());
        assert!(receipt.contract_address.is_some());
        assert_eq!(receipt.gas_used, U256::from(0x12d687u64));
        assert_eq!(receipt.logs.len(), 1);
    }

    #[test]
    fn receipt_without_status_is_not_success() {
        let json = serde_json::json!({
            "transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "status": null,
            "contractAddress": null,
            "gasUsed": "0x0",
            "logs": []
        });
        let receipt: TxReceipt = serde_json::from_value(json).unwrap();
        assert!(!receipt.succeeded());
    }

    #[test]
    fn ensure_success_surfaces_failed_receipt() {
        let json = serde_json::json!({
            "transactionHash": "0x3333333333333333333333333333333333333333333333333333333333333333",
            "status": "0x0",
            "contractAddress": null,
            "gasUsed": "0x5208",
            "logs": []
        });
        let receipt: TxReceipt = serde_json::from_value(json).unwrap();
        let err = receipt.ensure_success().unwrap_err();
        match err {
            ChainError::TransactionFailed { receipt } => {
                assert!(!receipt.succeeded());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rpc_error_object_deserializes() {
        let json = serde_json::json!({
            "result": null,
            "error": { "code": -32000, "message": "insufficient funds" }
        });
        let response: RpcResponse = serde_json::from_value(json).unwrap();
        let err = response.error.unwrap();
        assert_eq!(err.code, -32000);
        assert!(err.message.contains("insufficient"));
    }
}
