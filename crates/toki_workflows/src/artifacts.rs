//! Compiled contract artifact loading.
//!
//! The Solidity contracts are compiled outside this repository; deployments
//! read creation bytecode from the compiler's JSON artifacts, one
//! `{name}.json` per contract with a hex `bytecode` field.

use std::path::PathBuf;

use alloy_primitives::{hex, Bytes};
use serde::Deserialize;

use crate::error::WorkflowError;

#[derive(Deserialize)]
struct Artifact {
    bytecode: String,
}

/// Reads creation bytecode from a directory of compiled artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, contract: &str) -> PathBuf {
        self.dir.join(format!("{contract}.json"))
    }

    /// Load the creation bytecode for a named contract.
    pub fn load(&self, contract: &str) -> Result<Bytes, WorkflowError> {
        let path = self.path(contract);
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(&path).map_err(|source| WorkflowError::ArtifactRead {
            path: display.clone(),
            source,
        })?;

        let artifact: Artifact =
            serde_json::from_str(&raw).map_err(|e| WorkflowError::ArtifactMalformed {
                path: display.clone(),
                reason: e.to_string(),
            })?;

        let stripped = artifact
            .bytecode
            .strip_prefix("0x")
            .unwrap_or(&artifact.bytecode);
        if stripped.is_empty() {
            return Err(WorkflowError::ArtifactMalformed {
                path: display,
                reason: "empty bytecode".to_string(),
            });
        }

        let bytes = hex::decode(stripped).map_err(|e| WorkflowError::ArtifactMalformed {
            path: display,
            reason: format!("bytecode is not valid hex: {e}"),
        })?;

        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write_artifact(dir: &Path, contract: &str, body: &str) {
        std::fs::write(dir.join(format!("{contract}.json")), body).unwrap();
    }

    #[test]
    fn loads_bytecode_from_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        write_artifact(
            tmp.path(),
            "TokiERC20",
            r#"{"contractName":"TokiERC20","bytecode":"0x6080604052"}"#,
        );

        let store = ArtifactStore::new(tmp.path());
        let code = store.load("TokiERC20").unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn missing_artifact_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let err = store.load("DoubleMinter").unwrap_err();
        match err {
            WorkflowError::ArtifactRead { path, .. } => {
                assert!(path.contains("DoubleMinter.json"), "{path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_bytecode() {
        let tmp = tempfile::tempdir().unwrap();
        write_artifact(tmp.path(), "Empty", r#"{"bytecode":"0x"}"#);
        let store = ArtifactStore::new(tmp.path());
        let err = store.load("Empty").unwrap_err();
        assert!(matches!(err, WorkflowError::ArtifactMalformed { .. }));
    }

    #[test]
    fn rejects_non_hex_bytecode() {
        let tmp = tempfile::tempdir().unwrap();
        write_artifact(tmp.path(), "Bad", r#"{"bytecode":"0xzz"}"#);
        let store = ArtifactStore::new(tmp.path());
        let err = store.load("Bad").unwrap_err();
        assert!(matches!(err, WorkflowError::ArtifactMalformed { .. }));
    }
}
