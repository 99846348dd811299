//! Idempotent account funding.

use alloy_primitives::{Address, U256};
use alloy_signer_local::PrivateKeySigner;
use tracing::info;

use toki_chain::contracts::native_minter;
use toki_chain::{format_toki, ChainGateway, GasOverrides};

use crate::error::WorkflowError;

/// Tops an account up to `target` base units of native coin by minting
/// exactly the deficit through the native-minter precompile. The admin
/// signer must hold a minting role on the native-minter allow list.
///
/// Returns the amount minted, or `None` when the balance already met the
/// target and no transaction was sent.
pub async fn ensure_funded<G: ChainGateway>(
    gateway: &G,
    admin: &PrivateKeySigner,
    account: Address,
    target: U256,
    gas: GasOverrides,
) -> Result<Option<U256>, WorkflowError> {
    let balance = gateway.get_balance(account).await?;

    let deficit = match target.checked_sub(balance) {
        Some(d) if !d.is_zero() => d,
        _ => {
            info!(
                %account,
                balance = %format_toki(balance),
                target = %format_toki(target),
                "account already funded, nothing to mint"
            );
            return Ok(None);
        }
    };

    info!(
        %account,
        balance = %format_toki(balance),
        target = %format_toki(target),
        deficit = %format_toki(deficit),
        "minting native coin to cover deficit"
    );
    native_minter::mint(gateway, admin, account, deficit, gas).await?;

    Ok(Some(deficit))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;

    use toki_chain::contracts::{INativeMinter, NATIVE_MINTER_ADDRESS};
    use toki_chain::signer::generate_keypair;
    use toki_chain::parse_toki;

    use super::*;
    use crate::testing::MockGateway;

    const ACCOUNT: Address = address!("00000000000000000000000000000000000000aa");

    #[tokio::test]
    async fn account_at_target_is_left_alone() {
        let gateway = MockGateway::new();
        let admin = generate_keypair();
        let target = parse_toki("1").unwrap();
        gateway.set_balance(ACCOUNT, target);

        let minted = ensure_funded(&gateway, &admin, ACCOUNT, target, GasOverrides::default())
            .await
            .unwrap();

        assert_eq!(minted, None);
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn account_above_target_is_left_alone() {
        let gateway = MockGateway::new();
        let admin = generate_keypair();
        gateway.set_balance(ACCOUNT, parse_toki("2").unwrap());

        let minted = ensure_funded(
            &gateway,
            &admin,
            ACCOUNT,
            parse_toki("1").unwrap(),
            GasOverrides::default(),
        )
        .await
        .unwrap();

        assert_eq!(minted, None);
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn exact_deficit_is_minted() {
        let gateway = MockGateway::new();
        let admin = generate_keypair();
        let target = parse_toki("1").unwrap();
        gateway.set_balance(ACCOUNT, parse_toki("0.25").unwrap());

        let minted = ensure_funded(&gateway, &admin, ACCOUNT, target, GasOverrides::default())
            .await
            .unwrap();

        let deficit = parse_toki("0.75").unwrap();
        assert_eq!(minted, Some(deficit));

        let submitted = gateway.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].to, Some(NATIVE_MINTER_ADDRESS));
        assert_eq!(submitted[0].from, admin.address());

        let call = INativeMinter::mintNativeCoinCall::abi_decode(&submitted[0].data).unwrap();
        assert_eq!(call.addr, ACCOUNT);
        assert_eq!(call.amount, deficit);

        assert_eq!(gateway.balance(ACCOUNT), target);
    }

    #[tokio::test]
    async fn zero_balance_account_gets_full_target() {
        let gateway = MockGateway::new();
        let admin = generate_keypair();
        let target = parse_toki("1").unwrap();

        let minted = ensure_funded(&gateway, &admin, ACCOUNT, target, GasOverrides::default())
            .await
            .unwrap();

        assert_eq!(minted, Some(target));
        assert_eq!(gateway.balance(ACCOUNT), target);
    }
}
