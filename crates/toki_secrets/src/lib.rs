//! Deployment key storage.
//!
//! Deployment records (token metadata plus the private keys generated during
//! deployment) are persisted as JSON documents in a secret store, one record
//! per token identifier under the name `token/{identifier}/keys`.

pub mod error;
pub mod record;
pub mod store;

pub use error::SecretsError;
pub use record::{
    secret_name_for, DeploymentKeys, Erc1155ActivityRecord, Erc1155RewardTierRecord, Erc20Record,
    SecretRecord,
};
pub use store::{AwsSecretsClient, CreatedSecret, SecretStore};
