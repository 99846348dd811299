//! Persisted secret records, one per deployed token.
//!
//! A record is written twice: once as a placeholder with every address and
//! key field `null` (reserving the identifier and capturing the static
//! metadata before any contract exists), and once fully populated after
//! deployment. Between the writes the record is in a pending state; nothing
//! here prevents two writers racing on the same identifier, which is a
//! documented operational risk.
//!
//! Unpopulated fields are serialized as explicit `null`s, never omitted, so
//! the schema shape is identical across both writes.

use serde::{Deserialize, Serialize};

/// Secret-store key for a token identifier.
pub fn secret_name_for(identifier: &str) -> String {
    format!("token/{identifier}/keys")
}

/// Addresses and key material produced by a deployment. All `None` in the
/// placeholder write, all `Some` after the deployment completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentKeys {
    pub token_address: Option<String>,
    pub token_owner_address: Option<String>,
    pub token_owner_private_key: Option<String>,
    pub double_minter_address: Option<String>,
    pub double_minter_role_address: Option<String>,
    pub double_minter_role_private_key: Option<String>,
}

impl DeploymentKeys {
    /// Whether the record still awaits its post-deployment write.
    pub fn is_pending(&self) -> bool {
        self.token_address.is_none()
    }
}

/// ERC-20 token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Record {
    pub identifier: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(flatten)]
    pub keys: DeploymentKeys,
}

/// ERC-1155 activity-reward token record. The collection fields stay `null`
/// for a bare token deployment and are populated when a per-collection
/// double minter is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc1155ActivityRecord {
    pub identifier: String,
    pub uri: Option<String>,
    pub max_total_supply: Option<u64>,
    pub collection_id: Option<String>,
    #[serde(flatten)]
    pub keys: DeploymentKeys,
}

/// ERC-1155 reward-tier token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc1155RewardTierRecord {
    pub identifier: String,
    pub creator_address: String,
    pub max_total_supplies: Vec<u64>,
    pub reward_tier_names: Vec<String>,
    pub required_reward_amounts: Vec<u64>,
    pub uris: Vec<String>,
    #[serde(flatten)]
    pub keys: DeploymentKeys,
}

/// The unit of truth for one deployed token, discriminated by family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SecretRecord {
    #[serde(rename = "erc20")]
    Erc20(Erc20Record),
    #[serde(rename = "erc1155-activity")]
    Erc1155Activity(Erc1155ActivityRecord),
    #[serde(rename = "erc1155-reward-tier")]
    Erc1155RewardTier(Erc1155RewardTierRecord),
}

impl SecretRecord {
    pub fn identifier(&self) -> &str {
        match self {
            SecretRecord::Erc20(r) => &r.identifier,
            SecretRecord::Erc1155Activity(r) => &r.identifier,
            SecretRecord::Erc1155RewardTier(r) => &r.identifier,
        }
    }

    pub fn keys(&self) -> &DeploymentKeys {
        match self {
            SecretRecord::Erc20(r) => &r.keys,
            SecretRecord::Erc1155Activity(r) => &r.keys,
            SecretRecord::Erc1155RewardTier(r) => &r.keys,
        }
    }

    pub fn keys_mut(&mut self) -> &mut DeploymentKeys {
        match self {
            SecretRecord::Erc20(r) => &mut r.keys,
            SecretRecord::Erc1155Activity(r) => &mut r.keys,
            SecretRecord::Erc1155RewardTier(r) => &mut r.keys,
        }
    }

    /// The secret-store key this record lives under.
    pub fn secret_name(&self) -> String {
        secret_name_for(self.identifier())
    }
}
