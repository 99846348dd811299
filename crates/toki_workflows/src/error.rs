use toki_chain::{ChainError, TxReceipt};
use toki_secrets::SecretsError;

/// Errors produced by the deployment and funding workflows.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Secrets(#[from] SecretsError),

    #[error(transparent)]
    Units(#[from] toki_chain::units::UnitsError),

    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: String, value: String },

    #[error("failed to read contract artifact {path}: {source}")]
    ArtifactRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("contract artifact {path} is malformed: {reason}")]
    ArtifactMalformed { path: String, reason: String },

    #[error("deployment receipt for {contract} carries no contract address")]
    MissingContractAddress { contract: String },

    #[error("collection creation transaction produced no CollectionCreated event")]
    CollectionCreationFailed,

    #[error("secret record for {identifier} is missing field {field}")]
    RecordIncomplete { identifier: String, field: String },

    #[error("secret record for {identifier} field {field} is not a valid address")]
    RecordInvalid { identifier: String, field: String },

    #[error("double mint transaction reverted (hash {hash})")]
    MintFailed {
        hash: String,
        receipt: Box<TxReceipt>,
    },
}
