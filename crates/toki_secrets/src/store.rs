//! Secret store access.
//!
//! [`AwsSecretsClient`] shells out to the `aws` command-line tool with
//! `--output json`, which keeps typed access to Secrets Manager without a
//! heavyweight SDK dependency. Workflows depend on the [`SecretStore`]
//! trait so tests can substitute an in-memory store.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::SecretsError;
use crate::record::SecretRecord;

/// Response to a successful secret creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedSecret {
    #[serde(rename = "ARN")]
    pub arn: String,
    pub name: String,
}

/// Key/value store holding one JSON record per secret name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Creates a new secret. Fails if the name already exists.
    async fn create(&self, name: &str, record: &SecretRecord) -> Result<CreatedSecret, SecretsError>;

    /// Overwrites an existing secret, addressed by name or ARN.
    async fn update(&self, id: &str, record: &SecretRecord) -> Result<(), SecretsError>;

    /// Fetches and deserializes a secret by name.
    async fn get(&self, name: &str) -> Result<SecretRecord, SecretsError>;
}

/// AWS Secrets Manager via the `aws` CLI.
pub struct AwsSecretsClient {
    /// Optional AWS CLI profile name (`--profile`).
    pub profile: Option<String>,
    /// Optional AWS region override (`--region`).
    pub region: Option<String>,
}

impl AwsSecretsClient {
    /// Create a new client. Both `profile` and `region` are optional.
    pub fn new(profile: Option<String>, region: Option<String>) -> Self {
        Self { profile, region }
    }

    /// Build and execute an `aws secretsmanager` command, returning stdout
    /// on success and the stderr text on failure.
    async fn run(&self, args: &[&str]) -> Result<String, RunError> {
        let mut cmd = tokio::process::Command::new("aws");
        cmd.arg("secretsmanager");
        cmd.args(args);
        cmd.arg("--output").arg("json");

        if let Some(ref profile) = self.profile {
            cmd.arg("--profile").arg(profile);
        }
        if let Some(ref region) = self.region {
            cmd.arg("--region").arg(region);
        }

        debug!(command = ?cmd, "executing AWS CLI command");

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RunError::Failed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

enum RunError {
    Io(std::io::Error),
    Failed(String),
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Io(e)
    }
}

impl RunError {
    fn into_secrets_error(self, name: &str) -> SecretsError {
        match self {
            RunError::Io(e) => SecretsError::Io(e),
            RunError::Failed(stderr) if stderr.contains("ResourceNotFoundException") => {
                SecretsError::NotFound(name.to_string())
            }
            RunError::Failed(stderr) => SecretsError::Store {
                name: name.to_string(),
                message: stderr,
            },
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsClient {
    async fn create(
        &self,
        name: &str,
        record: &SecretRecord,
    ) -> Result<CreatedSecret, SecretsError> {
        info!(secret = %name, "creating secret");
        let secret_string = serde_json::to_string(record)?;
        let output = self
            .run(&[
                "create-secret",
                "--name",
                name,
                "--secret-string",
                &secret_string,
            ])
            .await
            .map_err(|e| e.into_secrets_error(name))?;

        let created: CreatedSecret =
            serde_json::from_str(&output).map_err(SecretsError::Serde)?;
        info!(secret = %name, arn = %created.arn, "secret created");
        Ok(created)
    }

    async fn update(&self, id: &str, record: &SecretRecord) -> Result<(), SecretsError> {
        info!(secret = %id, "updating secret");
        let secret_string = serde_json::to_string(record)?;
        self.run(&[
            "update-secret",
            "--secret-id",
            id,
            "--secret-string",
            &secret_string,
        ])
        .await
        .map_err(|e| e.into_secrets_error(id))?;
        info!(secret = %id, "secret updated");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<SecretRecord, SecretsError> {
        debug!(secret = %name, "fetching secret");
        let output = self
            .run(&["get-secret-value", "--secret-id", name])
            .await
            .map_err(|e| e.into_secrets_error(name))?;

        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct GetSecretValue {
            secret_string: String,
        }

        let value: GetSecretValue =
            serde_json::from_str(&output).map_err(SecretsError::Serde)?;
        let record: SecretRecord = serde_json::from_str(&value.secret_string)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_secret_parses_cli_output() {
        let json = r#"{
            "ARN": "arn:aws:secretsmanager:eu-west-1:123456789012:secret:token/acme/keys-AbCdEf",
            "Name": "token/acme/keys",
            "VersionId": "11111111-2222-3333-4444-555555555555"
        }"#;
        let created: CreatedSecret = serde_json::from_str(json).unwrap();
        assert_eq!(created.name, "token/acme/keys");
        assert!(created.arn.starts_with("arn:aws:secretsmanager"));
    }

    #[test]
    fn missing_secret_maps_to_not_found() {
        let err = RunError::Failed(
            "An error occurred (ResourceNotFoundException) when calling the \
             GetSecretValue operation: Secrets Manager can't find the specified secret."
                .into(),
        )
        .into_secrets_error("token/acme/keys");
        assert!(matches!(err, SecretsError::NotFound(name) if name == "token/acme/keys"));
    }

    #[test]
    fn other_failures_map_to_store_error() {
        let err = RunError::Failed(
            "An error occurred (AccessDeniedException) when calling the CreateSecret operation"
                .into(),
        )
        .into_secrets_error("token/acme/keys");
        match err {
            SecretsError::Store { name, message } => {
                assert_eq!(name, "token/acme/keys");
                assert!(message.contains("AccessDeniedException"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
