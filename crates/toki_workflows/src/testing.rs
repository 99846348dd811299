//! In-memory doubles for the gateway and secret-store seams.
//!
//! `MockGateway` mines every submission instantly, applies native-minter
//! calldata to its balance table, and hands out deterministic deployment
//! addresses. `MemoryStore` keeps one record per secret name and counts
//! calls so tests can assert on store traffic.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use toki_chain::contracts::{INativeMinter, NATIVE_MINTER_ADDRESS};
use toki_chain::{ChainError, ChainGateway, RpcLog, TxReceipt, TxRequest};
use toki_secrets::{CreatedSecret, SecretRecord, SecretStore, SecretsError};

/// A transaction a workflow asked the gateway to mine.
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    pub from: Address,
    pub to: Option<Address>,
    pub data: Bytes,
    pub value: U256,
}

#[derive(Default)]
struct MockState {
    balances: HashMap<Address, U256>,
    submitted: Vec<SubmittedTx>,
    views: HashMap<(Address, [u8; 4]), Bytes>,
    next_logs: Vec<RpcLog>,
    revert_next: bool,
    tx_counter: u64,
}

#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, account: Address, balance: U256) {
        self.state.lock().unwrap().balances.insert(account, balance);
    }

    pub fn balance(&self, account: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Scripts the return data of an `eth_call` to `to` with the given
    /// 4-byte selector.
    pub fn script_view(&self, to: Address, selector: [u8; 4], ret: Bytes) {
        self.state.lock().unwrap().views.insert((to, selector), ret);
    }

    /// Attaches logs to the receipt of the next submitted transaction.
    pub fn queue_logs(&self, logs: Vec<RpcLog>) {
        self.state.lock().unwrap().next_logs = logs;
    }

    /// Makes the next submitted transaction mine with a failed status.
    pub fn revert_next(&self) {
        self.state.lock().unwrap().revert_next = true;
    }

    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Address assigned to the nth deployment (zero-based) of this gateway's
    /// lifetime. Deployments and calls share one transaction counter, so
    /// this matches only when the test knows the full submission order; use
    /// the workflow's returned addresses otherwise.
    pub fn deploy_address(tx_counter: u64) -> Address {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xde;
        bytes[12..].copy_from_slice(&tx_counter.to_be_bytes());
        Address::from(bytes)
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    async fn get_balance(&self, account: Address) -> Result<U256, ChainError> {
        Ok(self.balance(account))
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        Ok(25_000_000_000)
    }

    async fn estimate_gas(
        &self,
        _from: Address,
        _to: Option<Address>,
        _data: &Bytes,
        _value: U256,
    ) -> Result<u64, ChainError> {
        Ok(21_000)
    }

    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        tx: TxRequest,
    ) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        let counter = state.tx_counter;
        state.tx_counter += 1;
        state.submitted.push(SubmittedTx {
            from: signer.address(),
            to: tx.to,
            data: tx.data.clone(),
            value: tx.value,
        });

        let reverted = std::mem::take(&mut state.revert_next);
        let logs = std::mem::take(&mut state.next_logs);

        let mut contract_address = None;
        if !reverted {
            match tx.to {
                None => contract_address = Some(Self::deploy_address(counter)),
                Some(to) if to == NATIVE_MINTER_ADDRESS => {
                    if let Ok(call) = INativeMinter::mintNativeCoinCall::abi_decode(&tx.data) {
                        let entry = state.balances.entry(call.addr).or_insert(U256::ZERO);
                        *entry += call.amount;
                    }
                }
                Some(_) => {}
            }
        }

        Ok(TxReceipt {
            transaction_hash: B256::from(U256::from(counter + 1)),
            status: Some(U64::from(if reverted { 0u64 } else { 1 })),
            contract_address,
            gas_used: U256::from(21_000u64),
            logs,
        })
    }

    async fn view(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| ChainError::InvalidResponse("calldata shorter than a selector".into()))?;
        self.state
            .lock()
            .unwrap()
            .views
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| {
                ChainError::InvalidResponse(format!("no scripted view for {to} {selector:02x?}"))
            })
    }
}

#[derive(Default)]
struct StoreState {
    records: HashMap<String, Vec<SecretRecord>>,
    creates: usize,
    updates: usize,
    gets: usize,
}

/// In-memory [`SecretStore`] keeping the full write history per name.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

fn mock_arn(name: &str) -> String {
    format!("arn:mock:{name}")
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, record: SecretRecord) {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(name.to_string(), vec![record]);
    }

    /// Every record version written under `name`, oldest first.
    pub fn history(&self, name: &str) -> Vec<SecretRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().updates
    }

    pub fn get_calls(&self) -> usize {
        self.state.lock().unwrap().gets
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn create(
        &self,
        name: &str,
        record: &SecretRecord,
    ) -> Result<CreatedSecret, SecretsError> {
        let mut state = self.state.lock().unwrap();
        state.creates += 1;
        if state.records.contains_key(name) {
            return Err(SecretsError::Store {
                name: name.to_string(),
                message: "secret already exists".to_string(),
            });
        }
        state.records.insert(name.to_string(), vec![record.clone()]);
        Ok(CreatedSecret {
            arn: mock_arn(name),
            name: name.to_string(),
        })
    }

    async fn update(&self, id: &str, record: &SecretRecord) -> Result<(), SecretsError> {
        let name = id.strip_prefix("arn:mock:").unwrap_or(id);
        let mut state = self.state.lock().unwrap();
        state.updates += 1;
        match state.records.get_mut(name) {
            Some(history) => {
                history.push(record.clone());
                Ok(())
            }
            None => Err(SecretsError::NotFound(name.to_string())),
        }
    }

    async fn get(&self, name: &str) -> Result<SecretRecord, SecretsError> {
        let mut state = self.state.lock().unwrap();
        state.gets += 1;
        state
            .records
            .get(name)
            .and_then(|history| history.last().cloned())
            .ok_or_else(|| SecretsError::NotFound(name.to_string()))
    }
}
