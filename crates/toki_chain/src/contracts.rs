//! Bindings for the external contracts the orchestrator drives.
//!
//! The Solidity sources live outside this repository; these `sol!`
//! declarations mirror their public surface. The allow-list and
//! native-minter precompiles sit at fixed addresses baked into the chain.

use alloy_primitives::{address, Address, LogData, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall, SolEvent};

use crate::error::ChainError;
use crate::gateway::{ChainGateway, GasOverrides, TxRequest};
use crate::roles::Role;
use crate::rpc::TxReceipt;

/// Contract-deployer allow-list precompile.
pub const CONTRACT_ALLOW_LIST_ADDRESS: Address =
    address!("0200000000000000000000000000000000000000");
/// Native-coin minter precompile.
pub const NATIVE_MINTER_ADDRESS: Address = address!("0200000000000000000000000000000000000001");
/// Transaction allow-list precompile.
pub const TX_ALLOW_LIST_ADDRESS: Address = address!("0200000000000000000000000000000000000002");

sol! {
    interface IAllowList {
        function readAllowList(address addr) external view returns (uint256);
        function setAdmin(address addr) external;
        function setEnabled(address addr) external;
        function setNone(address addr) external;
    }

    interface INativeMinter {
        function mintNativeCoin(address addr, uint256 amount) external;
    }

    contract TokiERC20 {
        constructor(string name, string symbol);

        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function owner() external view returns (address);
        function setEnabled(address addr) external;
        function transferOwnership(address newOwner) external;
    }

    contract DoubleMinter {
        constructor(address token);

        function mintTokens(address to, uint256 amountNative, uint256 amountErc20) external;
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
    }

    contract RewardERC1155 {
        constructor();

        event CollectionCreated(uint256 collectionId);

        function createCollection(address owner, string uri, uint256 maxTotalSupply) external returns (uint256);
        function owner() external view returns (address);
        function setEnabled(address addr) external;
        function transferOwnership(address newOwner) external;
    }

    contract ERC1155ActivitiesDoubleMinter {
        constructor(address token, uint256 collectionId);
    }

    contract RewardTierERC1155 {
        constructor(
            address creator,
            uint256[] maxTotalSupplies,
            string[] rewardTierNames,
            uint256[] requiredRewardAmounts,
            string[] uris
        );
    }

    contract ERC1155RewardTiersDoubleMinter {
        constructor(
            address creator,
            uint256[] maxTotalSupplies,
            string[] rewardTierNames,
            uint256[] requiredRewardAmounts,
            string[] uris
        );
    }
}

/// One of the precompiled allow lists, addressable by operator-facing
/// aliases.
pub struct AllowListEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub address: Address,
}

pub const ALLOW_LISTS: &[AllowListEntry] = &[
    AllowListEntry {
        name: "ContractDeployerAllowList",
        aliases: &[
            "deploy-contract",
            "contract",
            "deployer",
            "deploy",
            "deployment",
            "contract-deployment",
        ],
        address: CONTRACT_ALLOW_LIST_ADDRESS,
    },
    AllowListEntry {
        name: "ContractNativeMinter",
        aliases: &["minter", "native", "native-minter", "native-mint", "mint"],
        address: NATIVE_MINTER_ADDRESS,
    },
    AllowListEntry {
        name: "TxAllowList",
        aliases: &["tx", "transaction"],
        address: TX_ALLOW_LIST_ADDRESS,
    },
];

/// Resolves an operator-supplied allow-list alias.
pub fn find_allow_list(alias: &str) -> Option<&'static AllowListEntry> {
    ALLOW_LISTS.iter().find(|l| l.aliases.contains(&alias))
}

/// Typed wrappers over the allow-list precompiles.
pub mod allow_list {
    use super::*;

    /// Reads the role an address holds on the given allow list.
    pub async fn read<G: ChainGateway>(
        gateway: &G,
        list: Address,
        who: Address,
    ) -> Result<Role, ChainError> {
        let data = IAllowList::readAllowListCall { addr: who }.abi_encode();
        let out = gateway.view(list, data.into()).await?;
        let code: U256 = IAllowList::readAllowListCall::abi_decode_returns(&out)?;
        Ok(Role::from_code(code))
    }

    /// Sets an address to the given role on the list. `Role::Unknown` is
    /// rejected by the caller via [`Role::to_code`] before getting here.
    pub async fn set<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        list: Address,
        who: Address,
        role: Role,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data: Vec<u8> = match role {
            Role::None => IAllowList::setNoneCall { addr: who }.abi_encode(),
            Role::Enable => IAllowList::setEnabledCall { addr: who }.abi_encode(),
            Role::Admin => IAllowList::setAdminCall { addr: who }.abi_encode(),
            Role::Unknown => {
                return Err(ChainError::InvalidResponse(
                    "cannot set role \"unknown\"".into(),
                ))
            }
        };
        let receipt = gateway
            .submit(signer, TxRequest::call(list, data.into(), gas))
            .await?;
        receipt.ensure_success()
    }
}

/// Typed wrapper over the native-minter precompile.
pub mod native_minter {
    use super::*;

    /// Mints `amount` base units of the native coin to `to`.
    pub async fn mint<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = INativeMinter::mintNativeCoinCall { addr: to, amount }.abi_encode();
        let receipt = gateway
            .submit(
                signer,
                TxRequest::call(NATIVE_MINTER_ADDRESS, data.into(), gas),
            )
            .await?;
        receipt.ensure_success()
    }
}

/// Typed wrappers over a deployed ERC-20 token contract.
pub mod erc20 {
    use super::*;

    pub async fn balance_of<G: ChainGateway>(
        gateway: &G,
        token: Address,
        account: Address,
    ) -> Result<U256, ChainError> {
        let data = TokiERC20::balanceOfCall { account }.abi_encode();
        let out = gateway.view(token, data.into()).await?;
        Ok(TokiERC20::balanceOfCall::abi_decode_returns(&out)?)
    }

    pub async fn symbol<G: ChainGateway>(gateway: &G, token: Address) -> Result<String, ChainError> {
        let data = TokiERC20::symbolCall {}.abi_encode();
        let out = gateway.view(token, data.into()).await?;
        Ok(TokiERC20::symbolCall::abi_decode_returns(&out)?)
    }

    pub async fn name<G: ChainGateway>(gateway: &G, token: Address) -> Result<String, ChainError> {
        let data = TokiERC20::nameCall {}.abi_encode();
        let out = gateway.view(token, data.into()).await?;
        Ok(TokiERC20::nameCall::abi_decode_returns(&out)?)
    }

    pub async fn total_supply<G: ChainGateway>(
        gateway: &G,
        token: Address,
    ) -> Result<U256, ChainError> {
        let data = TokiERC20::totalSupplyCall {}.abi_encode();
        let out = gateway.view(token, data.into()).await?;
        Ok(TokiERC20::totalSupplyCall::abi_decode_returns(&out)?)
    }

    pub async fn owner<G: ChainGateway>(gateway: &G, token: Address) -> Result<Address, ChainError> {
        let data = TokiERC20::ownerCall {}.abi_encode();
        let out = gateway.view(token, data.into()).await?;
        Ok(TokiERC20::ownerCall::abi_decode_returns(&out)?)
    }

    /// Grants `who` minting rights on the token's own allow list.
    pub async fn set_enabled<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        token: Address,
        who: Address,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = TokiERC20::setEnabledCall { addr: who }.abi_encode();
        let receipt = gateway
            .submit(signer, TxRequest::call(token, data.into(), gas))
            .await?;
        receipt.ensure_success()
    }

    pub async fn transfer_ownership<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        token: Address,
        new_owner: Address,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = TokiERC20::transferOwnershipCall { newOwner: new_owner }.abi_encode();
        let receipt = gateway
            .submit(signer, TxRequest::call(token, data.into(), gas))
            .await?;
        receipt.ensure_success()
    }
}

/// Typed wrappers over a deployed double-minter contract.
pub mod double_minter {
    use super::*;

    /// Atomically mints `amount_native` native coin and `amount_erc20`
    /// token units to `to`. The receipt is returned unchecked; the caller
    /// turns a failed status into its own error with the logs attached.
    pub async fn mint_tokens<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        minter: Address,
        to: Address,
        amount_native: U256,
        amount_erc20: U256,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = DoubleMinter::mintTokensCall {
            to,
            amountNative: amount_native,
            amountErc20: amount_erc20,
        }
        .abi_encode();
        gateway
            .submit(signer, TxRequest::call(minter, data.into(), gas))
            .await
    }

    pub async fn owner<G: ChainGateway>(
        gateway: &G,
        minter: Address,
    ) -> Result<Address, ChainError> {
        let data = DoubleMinter::ownerCall {}.abi_encode();
        let out = gateway.view(minter, data.into()).await?;
        Ok(DoubleMinter::ownerCall::abi_decode_returns(&out)?)
    }

    pub async fn transfer_ownership<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        minter: Address,
        new_owner: Address,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = DoubleMinter::transferOwnershipCall { newOwner: new_owner }.abi_encode();
        let receipt = gateway
            .submit(signer, TxRequest::call(minter, data.into(), gas))
            .await?;
        receipt.ensure_success()
    }
}

/// Typed wrappers over a deployed multi-collection ERC-1155 contract.
pub mod reward_erc1155 {
    use super::*;

    /// Creates a new collection owned by `owner` and returns the receipt;
    /// the collection id is read from the `CollectionCreated` event via
    /// [`collection_id_from_receipt`].
    pub async fn create_collection<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        token: Address,
        owner: Address,
        uri: String,
        max_total_supply: U256,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = RewardERC1155::createCollectionCall {
            owner,
            uri,
            maxTotalSupply: max_total_supply,
        }
        .abi_encode();
        let receipt = gateway
            .submit(signer, TxRequest::call(token, data.into(), gas))
            .await?;
        receipt.ensure_success()
    }

    /// Scans receipt logs for a `CollectionCreated` event emitted by the
    /// token contract. Logs from other events or other contracts are
    /// skipped; `None` means the transaction emitted no identifying log.
    pub fn collection_id_from_receipt(receipt: &TxReceipt, token: Address) -> Option<U256> {
        receipt
            .logs
            .iter()
            .filter(|log| log.address == token)
            .find_map(|log| {
                let data = LogData::new_unchecked(log.topics.clone(), log.data.clone());
                RewardERC1155::CollectionCreated::decode_log_data(&data)
                    .ok()
                    .map(|event| event.collectionId)
            })
    }

    pub async fn transfer_ownership<G: ChainGateway>(
        gateway: &G,
        signer: &PrivateKeySigner,
        token: Address,
        new_owner: Address,
        gas: GasOverrides,
    ) -> Result<TxReceipt, ChainError> {
        let data = RewardERC1155::transferOwnershipCall { newOwner: new_owner }.abi_encode();
        let receipt = gateway
            .submit(signer, TxRequest::call(token, data.into(), gas))
            .await?;
        receipt.ensure_success()
    }
}
