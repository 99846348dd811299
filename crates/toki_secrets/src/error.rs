//! Secret store error types.

/// Errors from the secret store. Never retried by this layer.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    /// No record exists under the given secret name.
    #[error("secret \"{0}\" not found")]
    NotFound(String),

    /// The store rejected or failed a create/update/get. The provider's
    /// own error text is preserved for diagnosis.
    #[error("secret store operation on \"{name}\" failed: {message}")]
    Store { name: String, message: String },

    /// A stored record could not be (de)serialized.
    #[error("secret record serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// Spawning or talking to the provider CLI failed.
    #[error("secret store unreachable: {0}")]
    Io(#[from] std::io::Error),
}
