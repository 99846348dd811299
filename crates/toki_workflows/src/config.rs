//! Environment-driven configuration.
//!
//! All workflow inputs that depend on the operator's environment are
//! collected up front into a [`TokiConfig`], so the workflows themselves
//! never read environment variables.

use toki_chain::GasOverrides;

use crate::error::WorkflowError;

pub const ENV_NODE_URL: &str = "TOKI_NODE_JSONRPC_URL";
pub const ENV_DEPLOYER_KEY: &str = "TOKI_DEPLOYER_PRIVATE_KEY";
pub const ENV_GAS_LIMIT: &str = "TOKI_TX_GAS_LIMIT";
pub const ENV_GAS_PRICE: &str = "TOKI_TX_GAS_PRICE";
pub const ENV_NETWORK: &str = "TOKI_NETWORK";
pub const ENV_ARTIFACTS_DIR: &str = "TOKI_ARTIFACTS_DIR";
pub const ENV_AWS_PROFILE: &str = "AWS_PROFILE";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_POLL_INTERVAL_MS: &str = "TOKI_RECEIPT_POLL_MS";

const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Everything the workflows need from the operator's environment.
#[derive(Debug, Clone)]
pub struct TokiConfig {
    /// JSON-RPC endpoint of the node the gateway talks to.
    pub node_url: String,
    /// Hex-encoded private key of the funded deployer account.
    pub deployer_private_key: String,
    /// Optional gas limit / gas price overrides applied to every transaction.
    pub gas: GasOverrides,
    /// Network label, recorded for operator output only.
    pub network: Option<String>,
    /// Directory holding compiled contract artifacts.
    pub artifacts_dir: String,
    /// AWS CLI profile for the secret store.
    pub aws_profile: Option<String>,
    /// AWS region for the secret store.
    pub aws_region: Option<String>,
    /// How often to poll for transaction receipts.
    pub receipt_poll_interval: std::time::Duration,
}

impl TokiConfig {
    /// Build a configuration from process environment variables.
    pub fn from_env() -> Result<Self, WorkflowError> {
        Ok(Self {
            node_url: require(ENV_NODE_URL)?,
            deployer_private_key: require(ENV_DEPLOYER_KEY)?,
            gas: GasOverrides {
                gas_limit: optional_parsed(ENV_GAS_LIMIT)?,
                gas_price: optional_parsed(ENV_GAS_PRICE)?,
            },
            network: optional(ENV_NETWORK),
            artifacts_dir: optional(ENV_ARTIFACTS_DIR)
                .unwrap_or_else(|| DEFAULT_ARTIFACTS_DIR.to_string()),
            aws_profile: optional(ENV_AWS_PROFILE),
            aws_region: optional(ENV_AWS_REGION),
            receipt_poll_interval: optional_parsed::<u64>(ENV_POLL_INTERVAL_MS)?
                .map(std::time::Duration::from_millis)
                .unwrap_or(toki_chain::rpc::DEFAULT_POLL_INTERVAL),
        })
    }
}

fn require(name: &str) -> Result<String, WorkflowError> {
    optional(name).ok_or_else(|| WorkflowError::MissingEnv(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn optional_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>, WorkflowError> {
    match optional(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| WorkflowError::InvalidEnv {
                name: name.to_string(),
                value,
            }),
    }
}
