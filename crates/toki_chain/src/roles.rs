//! Allow-list role codes.
//!
//! The precompiled allow lists store a role per address as a small integer:
//! `0 = none`, `1 = enable`, `2 = admin`. Any other value read from the
//! chain is mapped to [`Role::Unknown`]; it should never occur if the
//! contract is correct, but the mapping stays total.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// The role a given address holds on an allow list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    None,
    Enable,
    Admin,
    Unknown,
}

/// A role name that does not map back to an on-chain code.
#[derive(Debug, thiserror::Error)]
#[error("unknown role \"{0}\"")]
pub struct UnknownRoleError(pub String);

impl Role {
    /// Total mapping from an on-chain role code.
    pub fn from_code(code: U256) -> Role {
        match code.try_into().unwrap_or(u64::MAX) {
            0u64 => Role::None,
            1 => Role::Enable,
            2 => Role::Admin,
            _ => Role::Unknown,
        }
    }

    /// Inverse of [`Role::from_code`]; fails for [`Role::Unknown`].
    pub fn to_code(self) -> Result<U256, UnknownRoleError> {
        match self {
            Role::None => Ok(U256::from(0u64)),
            Role::Enable => Ok(U256::from(1u64)),
            Role::Admin => Ok(U256::from(2u64)),
            Role::Unknown => Err(UnknownRoleError("unknown".into())),
        }
    }

    /// Parses an operator-supplied role name.
    pub fn parse(name: &str) -> Result<Role, UnknownRoleError> {
        match name {
            "none" => Ok(Role::None),
            "enable" => Ok(Role::Enable),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRoleError(other.into())),
        }
    }

    /// Whether this role grants use of the guarded operation.
    pub fn is_allowed(self) -> bool {
        matches!(self, Role::Enable | Role::Admin)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Enable => "enable",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
