//! Chain gateway error types.

use crate::rpc::TxReceipt;

/// Errors that can occur while talking to the chain gateway.
///
/// None of these are retried by this layer; every error propagates to the
/// caller, which decides whether to resume or clean up (on-chain side
/// effects of earlier steps are never rolled back).
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Transport-level failure reaching the JSON-RPC endpoint.
    #[error("gateway error: {0}")]
    Gateway(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered 200 but the payload was not what we expected.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    /// The transaction was mined but reverted or reported a failure status.
    /// Carries the full receipt (status + logs) for diagnosis.
    #[error("transaction {} failed with status {:?}", receipt.transaction_hash, receipt.status)]
    TransactionFailed { receipt: Box<TxReceipt> },

    /// ABI encoding/decoding of a contract call or event failed.
    #[error("abi error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    /// A stored private key could not be parsed back into a signer.
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// Transaction signing failed.
    #[error("signing error: {0}")]
    Signer(#[from] alloy_signer::Error),
}
