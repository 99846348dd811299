//! The atomic dual-mint workflow.
//!
//! Reconstructs the double-minter role signer from the stored secret
//! record, tops the role account up so it can pay gas, and invokes
//! `mintTokens` on the double-minter contract, which mints the native coin
//! and the application token to the recipient in one transaction.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use alloy_signer_local::PrivateKeySigner;
use tracing::info;

use toki_chain::contracts::{double_minter, erc20};
use toki_chain::signer::signer_from_hex;
use toki_chain::{parse_toki, ChainGateway, GasOverrides, TxReceipt};
use toki_secrets::{secret_name_for, SecretRecord, SecretStore};

use crate::error::WorkflowError;
use crate::funding::ensure_funded;

/// Recipient balances observed around the mint. Non-authoritative: reads
/// race with unrelated transfers, the receipt is the source of truth.
#[derive(Debug, Clone)]
pub struct BalanceSnapshot {
    pub native: U256,
    /// ERC-20 token balance; `None` for ERC-1155 token families.
    pub token: Option<U256>,
}

/// Result of a successful double mint.
#[derive(Debug)]
pub struct MintOutcome {
    pub receipt: TxReceipt,
    /// Token symbol, read from ERC-20 records only.
    pub token_symbol: Option<String>,
    pub before: BalanceSnapshot,
    pub after: BalanceSnapshot,
    /// Native coin minted to the role account to cover gas, if any.
    pub role_funded: Option<U256>,
}

fn required<'a>(
    identifier: &str,
    field: &str,
    value: &'a Option<String>,
) -> Result<&'a str, WorkflowError> {
    value
        .as_deref()
        .ok_or_else(|| WorkflowError::RecordIncomplete {
            identifier: identifier.to_string(),
            field: field.to_string(),
        })
}

fn required_address(
    identifier: &str,
    field: &str,
    value: &Option<String>,
) -> Result<Address, WorkflowError> {
    let raw = required(identifier, field, value)?;
    Address::from_str(raw).map_err(|_| WorkflowError::RecordInvalid {
        identifier: identifier.to_string(),
        field: field.to_string(),
    })
}

/// Mints `amount_native` base units of native coin and `amount_token` token
/// units to `recipient`, driven by the key material stored under
/// `identifier`. The `funder` account tops the role account up to 1 native
/// token first so the role can pay gas.
#[allow(clippy::too_many_arguments)]
pub async fn double_mint<G: ChainGateway>(
    gateway: &G,
    store: &dyn SecretStore,
    funder: &PrivateKeySigner,
    identifier: &str,
    amount_native: U256,
    amount_token: U256,
    recipient: Address,
    gas: GasOverrides,
) -> Result<MintOutcome, WorkflowError> {
    let record = store.get(&secret_name_for(identifier)).await?;
    let keys = record.keys();

    let token = required_address(identifier, "tokenAddress", &keys.token_address)?;
    let minter =
        required_address(identifier, "doubleMinterAddress", &keys.double_minter_address)?;
    let role_key = required(
        identifier,
        "doubleMinterRolePrivateKey",
        &keys.double_minter_role_private_key,
    )?;
    let role = signer_from_hex(role_key)?;
    info!(identifier, %minter, role = %role.address(), "double-minter role signer reconstructed");

    let role_funded = ensure_funded(gateway, funder, role.address(), parse_toki("1")?, gas).await?;

    let before = snapshot(gateway, &record, token, recipient).await?;

    let receipt =
        double_minter::mint_tokens(gateway, &role, minter, recipient, amount_native, amount_token, gas)
            .await?;
    if !receipt.succeeded() {
        return Err(WorkflowError::MintFailed {
            hash: receipt.transaction_hash.to_string(),
            receipt: Box::new(receipt),
        });
    }
    info!(
        identifier,
        %recipient,
        %amount_native,
        %amount_token,
        hash = %receipt.transaction_hash,
        "double mint confirmed"
    );

    let after = snapshot(gateway, &record, token, recipient).await?;
    let token_symbol = match &record {
        SecretRecord::Erc20(_) => Some(erc20::symbol(gateway, token).await?),
        _ => None,
    };

    Ok(MintOutcome {
        receipt,
        token_symbol,
        before,
        after,
        role_funded,
    })
}

async fn snapshot<G: ChainGateway>(
    gateway: &G,
    record: &SecretRecord,
    token: Address,
    account: Address,
) -> Result<BalanceSnapshot, WorkflowError> {
    let native = gateway.get_balance(account).await?;
    let token_balance = match record {
        SecretRecord::Erc20(_) => Some(erc20::balance_of(gateway, token, account).await?),
        _ => None,
    };
    Ok(BalanceSnapshot {
        native,
        token: token_balance,
    })
}
