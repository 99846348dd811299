//! The chain gateway seam.
//!
//! Workflows talk to the ledger exclusively through [`ChainGateway`], so
//! they can be exercised against an in-memory double in tests while the
//! binary uses [`RpcGateway`] over JSON-RPC.

use alloy_consensus::TxLegacy;
use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::debug;

use crate::error::ChainError;
use crate::rpc::{JsonRpcClient, TxReceipt};
use crate::signer::sign_transaction;

/// Optional gas parameters for a single transaction. Whatever is absent is
/// resolved immediately before submission (never cached).
#[derive(Debug, Clone, Copy, Default)]
pub struct GasOverrides {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

/// A transaction the orchestrator wants mined. `to: None` is a deployment.
#[derive(Debug, Clone)]
pub struct TxRequest {
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub gas: GasOverrides,
}

impl TxRequest {
    /// A zero-value contract call with the given calldata.
    pub fn call(to: Address, data: Bytes, gas: GasOverrides) -> Self {
        Self {
            to: Some(to),
            value: U256::ZERO,
            data,
            gas,
        }
    }

    /// A contract deployment carrying the full init code.
    pub fn deploy(init_code: Bytes, gas: GasOverrides) -> Self {
        Self {
            to: None,
            value: U256::ZERO,
            data: init_code,
            gas,
        }
    }
}

/// Transaction submission and query interface to the ledger.
///
/// Every mutating call blocks until the transaction is confirmed; there is
/// no fire-and-forget path and no internal retry.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Native-coin balance of an account, in base units.
    async fn get_balance(&self, account: Address) -> Result<U256, ChainError>;

    /// Current gas price quoted by the node.
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Gas estimate for a call (`to: Some`) or deployment (`to: None`).
    async fn estimate_gas(
        &self,
        from: Address,
        to: Option<Address>,
        data: &Bytes,
        value: U256,
    ) -> Result<u64, ChainError>;

    /// Signs, submits and waits for the receipt of a transaction. The
    /// receipt status is NOT checked here; callers decide whether a failed
    /// status is fatal (see [`TxReceipt::ensure_success`]).
    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        tx: TxRequest,
    ) -> Result<TxReceipt, ChainError>;

    /// Read-only contract call.
    async fn view(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;
}

/// The real gateway: JSON-RPC against a node, legacy transactions signed
/// locally with the caller-supplied key.
pub struct RpcGateway {
    client: JsonRpcClient,
    chain_id: u64,
}

impl RpcGateway {
    pub fn new(client: JsonRpcClient, chain_id: u64) -> Self {
        Self { client, chain_id }
    }

    /// Connects and asks the node for its chain id.
    pub async fn connect(client: JsonRpcClient) -> Result<Self, ChainError> {
        let chain_id = client.chain_id().await?;
        debug!(chain_id, "connected to chain gateway");
        Ok(Self { client, chain_id })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn client(&self) -> &JsonRpcClient {
        &self.client
    }
}

#[async_trait]
impl ChainGateway for RpcGateway {
    async fn get_balance(&self, account: Address) -> Result<U256, ChainError> {
        self.client.get_balance(account).await
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.client.gas_price().await
    }

    async fn estimate_gas(
        &self,
        from: Address,
        to: Option<Address>,
        data: &Bytes,
        value: U256,
    ) -> Result<u64, ChainError> {
        self.client.estimate_gas(from, to, data, value).await
    }

    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        tx: TxRequest,
    ) -> Result<TxReceipt, ChainError> {
        let from = signer.address();
        let nonce = self.client.transaction_count(from).await?;
        // Gas price and limit are resolved right before submission so a
        // price move since deployment is picked up.
        let gas_price = match tx.gas.gas_price {
            Some(price) => price,
            None => self.client.gas_price().await?,
        };
        let gas_limit = match tx.gas.gas_limit {
            Some(limit) => limit,
            None => {
                self.client
                    .estimate_gas(from, tx.to, &tx.data, tx.value)
                    .await?
            }
        };

        let legacy = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: match tx.to {
                Some(to) => TxKind::Call(to),
                None => TxKind::Create,
            },
            value: tx.value,
            input: tx.data,
        };
        let raw = sign_transaction(legacy, signer)?;
        let hash = self.client.send_raw_transaction(&raw).await?;
        debug!(%hash, %from, to = ?tx.to, "transaction submitted");
        self.client.wait_for_receipt(hash).await
    }

    async fn view(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        self.client.call(to, &data).await
    }
}
