//! Chain gateway: JSON-RPC transport, transaction signing, contract
//! bindings and allow-list roles for the Toki deployment tooling.

pub mod contracts;
pub mod error;
pub mod gateway;
pub mod roles;
pub mod rpc;
pub mod signer;
pub mod units;

// Re-export primary types for convenient access.
pub use error::ChainError;
pub use gateway::{ChainGateway, GasOverrides, RpcGateway, TxRequest};
pub use roles::{Role, UnknownRoleError};
pub use rpc::{JsonRpcClient, RpcLog, TxReceipt};
pub use signer::{generate_keypair, private_key_hex, signer_from_hex};
pub use units::{format_toki, parse_toki};

pub use alloy_signer_local::PrivateKeySigner;
