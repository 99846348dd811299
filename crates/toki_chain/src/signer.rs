//! Keypair generation and legacy transaction signing.
//!
//! Freshly generated keypairs are owned by the workflow that created them
//! until their hex encoding is persisted to the secret store, which is the
//! canonical long-term holder.

use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::hex;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::error::ChainError;

/// Generates a fresh random keypair. Pure local operation, no chain access.
pub fn generate_keypair() -> PrivateKeySigner {
    PrivateKeySigner::random()
}

/// 0x-prefixed 32-byte hex encoding of the private key, the format stored
/// in secret records (matches what ethers-style wallets emit).
pub fn private_key_hex(signer: &PrivateKeySigner) -> String {
    format!("0x{}", hex::encode(signer.to_bytes()))
}

/// Reconstructs a signer from the hex encoding produced by
/// [`private_key_hex`]. Accepts the key with or without the 0x prefix.
pub fn signer_from_hex(key: &str) -> Result<PrivateKeySigner, ChainError> {
    key.parse::<PrivateKeySigner>()
        .map_err(|e| ChainError::InvalidKey(e.to_string()))
}

/// Signs a legacy (EIP-155) transaction and returns the raw bytes ready for
/// `eth_sendRawTransaction`.
pub fn sign_transaction(tx: TxLegacy, signer: &PrivateKeySigner) -> Result<Vec<u8>, ChainError> {
    let signature = signer.sign_hash_sync(&tx.signature_hash())?;
    let signed = tx.into_signed(signature);
    Ok(TxEnvelope::Legacy(signed).encoded_2718())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bytes, TxKind, U256};

    use super::*;

    #[test]
    fn generated_keypairs_are_unique() {
        let a = generate_keypair();
        let b = generate_keypair();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn private_key_hex_round_trips() {
        let signer = generate_keypair();
        let hex_key = private_key_hex(&signer);
        assert!(hex_key.starts_with("0x"));
        assert_eq!(hex_key.len(), 66);

        let restored = signer_from_hex(&hex_key).unwrap();
        assert_eq!(restored.address(), signer.address());
    }

    #[test]
    fn signer_from_hex_accepts_unprefixed_keys() {
        let signer = generate_keypair();
        let hex_key = private_key_hex(&signer);
        let restored = signer_from_hex(hex_key.trim_start_matches("0x")).unwrap();
        assert_eq!(restored.address(), signer.address());
    }

    #[test]
    fn signer_from_hex_rejects_garbage() {
        assert!(signer_from_hex("not-a-key").is_err());
        assert!(signer_from_hex("0x1234").is_err());
    }

    #[test]
    fn sign_transaction_produces_raw_legacy_bytes() {
        let signer = generate_keypair();
        let tx = TxLegacy {
            chain_id: Some(99_999),
            nonce: 0,
            gas_price: 225_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::from(1u64),
            input: Bytes::new(),
        };
        let raw = sign_transaction(tx, &signer).unwrap();
        // Legacy transactions are plain RLP lists, first byte >= 0xc0.
        assert!(raw[0] >= 0xc0);
        assert!(raw.len() > 64);
    }
}
