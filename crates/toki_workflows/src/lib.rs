//! Deployment, funding and double-mint workflows.
//!
//! Each workflow is a single logical thread of blocking awaits against the
//! [`toki_chain::ChainGateway`] and [`toki_secrets::SecretStore`] seams;
//! there are no retries and no rollback of partial on-chain effects.

pub mod artifacts;
pub mod config;
pub mod deploy;
pub mod double_mint;
pub mod error;
pub mod funding;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::ArtifactStore;
pub use config::TokiConfig;
pub use deploy::{
    deploy_erc1155_activity, deploy_erc1155_activity_double_minter, deploy_erc1155_reward_tier,
    deploy_erc20, enable_double_minter, transfer_ownership, DeploymentResult,
    Erc1155ActivityMinterInfo, Erc1155RewardTierInfo, Erc20TokenInfo,
};
pub use double_mint::{double_mint, BalanceSnapshot, MintOutcome};
pub use error::WorkflowError;
pub use funding::ensure_funded;
