//! Token deployment workflows.
//!
//! Every deployment follows the same commit-point sequence: generate fresh
//! keypairs, write a placeholder secret record reserving the identifier,
//! deploy the contracts, then overwrite the record fully populated. Each
//! completed step is logged so a partial failure leaves a diagnosable
//! trail; nothing is rolled back.
//!
//! Allow-list wiring and ownership transfer are deliberately not part of
//! `deploy_*` — the binary composes them from [`enable_double_minter`] and
//! [`transfer_ownership`] after the deployment result is in hand.

use alloy_primitives::{Address, Bytes, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolConstructor;
use tracing::info;

use toki_chain::contracts::{
    self, allow_list, double_minter, erc20, reward_erc1155, NATIVE_MINTER_ADDRESS,
};
use toki_chain::signer::{generate_keypair, private_key_hex};
use toki_chain::{ChainGateway, GasOverrides, Role, TxRequest};
use toki_secrets::{
    CreatedSecret, DeploymentKeys, Erc1155ActivityRecord, Erc1155RewardTierRecord, Erc20Record,
    SecretRecord, SecretStore,
};

use crate::artifacts::ArtifactStore;
use crate::error::WorkflowError;

/// Static metadata of an ERC-20 token to deploy.
#[derive(Debug, Clone)]
pub struct Erc20TokenInfo {
    pub identifier: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Inputs for attaching a per-collection double minter to an existing
/// ERC-1155 activity token.
#[derive(Debug, Clone)]
pub struct Erc1155ActivityMinterInfo {
    pub identifier: String,
    pub token_address: Address,
    pub uri: String,
    pub max_total_supply: u64,
}

/// Inputs for a reward-tier ERC-1155 deployment. The four vectors are
/// parallel, one entry per tier.
#[derive(Debug, Clone)]
pub struct Erc1155RewardTierInfo {
    pub identifier: String,
    pub creator_address: Address,
    pub max_total_supplies: Vec<u64>,
    pub reward_tier_names: Vec<String>,
    pub required_reward_amounts: Vec<u64>,
    pub uris: Vec<String>,
}

/// What a deployment produced: the on-chain addresses, the generated key
/// material, and the record as written to the secret store.
#[derive(Debug)]
pub struct DeploymentResult {
    pub token_address: Address,
    pub double_minter_address: Option<Address>,
    pub collection_id: Option<U256>,
    /// Freshly generated token-owner keypair, when the flow creates one.
    pub owner: Option<PrivateKeySigner>,
    /// Freshly generated double-minter role keypair, when the flow creates
    /// one.
    pub minter_role: Option<PrivateKeySigner>,
    pub record: SecretRecord,
    /// `None` when the secret-store upload was skipped.
    pub secret: Option<CreatedSecret>,
}

/// Deploys a contract and returns the address from its receipt.
async fn deploy_contract<G: ChainGateway>(
    gateway: &G,
    deployer: &PrivateKeySigner,
    contract: &str,
    init_code: Bytes,
    gas: GasOverrides,
) -> Result<Address, WorkflowError> {
    let receipt = gateway
        .submit(deployer, TxRequest::deploy(init_code, gas))
        .await?;
    let receipt = receipt.ensure_success()?;
    let address = receipt
        .contract_address
        .ok_or_else(|| WorkflowError::MissingContractAddress {
            contract: contract.to_string(),
        })?;
    info!(contract, %address, "contract deployed");
    Ok(address)
}

fn account_fields(signer: &PrivateKeySigner) -> (Option<String>, Option<String>) {
    (
        Some(signer.address().to_string()),
        Some(private_key_hex(signer)),
    )
}

async fn create_placeholder(
    store: Option<&dyn SecretStore>,
    record: &SecretRecord,
) -> Result<Option<CreatedSecret>, WorkflowError> {
    let Some(store) = store else {
        info!(identifier = record.identifier(), "secret-store upload disabled, skipping");
        return Ok(None);
    };
    let created = store.create(&record.secret_name(), record).await?;
    info!(secret = %created.name, "placeholder secret created");
    Ok(Some(created))
}

async fn write_populated(
    store: Option<&dyn SecretStore>,
    secret: Option<&CreatedSecret>,
    record: &SecretRecord,
) -> Result<(), WorkflowError> {
    let Some(store) = store else {
        return Ok(());
    };
    let name = record.secret_name();
    let id = secret.map(|c| c.arn.as_str()).unwrap_or(&name);
    store.update(id, record).await?;
    info!(secret = %name, "secret record populated");
    Ok(())
}

/// Deploys `TokiERC20(name, symbol)` and its `DoubleMinter`, persisting the
/// generated keys through the two-write secret lifecycle.
pub async fn deploy_erc20<G: ChainGateway>(
    gateway: &G,
    store: Option<&dyn SecretStore>,
    artifacts: &ArtifactStore,
    deployer: &PrivateKeySigner,
    info: &Erc20TokenInfo,
    gas: GasOverrides,
) -> Result<DeploymentResult, WorkflowError> {
    let owner = generate_keypair();
    let minter_role = generate_keypair();
    info!(
        identifier = %info.identifier,
        owner = %owner.address(),
        minter_role = %minter_role.address(),
        "generated deployment keypairs"
    );

    let (owner_addr, owner_key) = account_fields(&owner);
    let (role_addr, role_key) = account_fields(&minter_role);
    let mut record = SecretRecord::Erc20(Erc20Record {
        identifier: info.identifier.clone(),
        name: info.name.clone(),
        symbol: info.symbol.clone(),
        decimals: info.decimals,
        keys: DeploymentKeys {
            token_address: None,
            token_owner_address: owner_addr,
            token_owner_private_key: owner_key,
            double_minter_address: None,
            double_minter_role_address: role_addr,
            double_minter_role_private_key: role_key,
        },
    });
    let secret = create_placeholder(store, &record).await?;

    let mut token_code = artifacts.load("TokiERC20")?.to_vec();
    token_code.extend(
        contracts::TokiERC20::constructorCall {
            name: info.name.clone(),
            symbol: info.symbol.clone(),
        }
        .abi_encode(),
    );
    let token = deploy_contract(gateway, deployer, "TokiERC20", token_code.into(), gas).await?;

    let mut minter_code = artifacts.load("DoubleMinter")?.to_vec();
    minter_code.extend(contracts::DoubleMinter::constructorCall { token }.abi_encode());
    let minter =
        deploy_contract(gateway, deployer, "DoubleMinter", minter_code.into(), gas).await?;

    let keys = record.keys_mut();
    keys.token_address = Some(token.to_string());
    keys.double_minter_address = Some(minter.to_string());
    write_populated(store, secret.as_ref(), &record).await?;

    Ok(DeploymentResult {
        token_address: token,
        double_minter_address: Some(minter),
        collection_id: None,
        owner: Some(owner),
        minter_role: Some(minter_role),
        record,
        secret,
    })
}

/// Deploys a bare `RewardERC1155` activity token. Collections and their
/// double minters are attached later via
/// [`deploy_erc1155_activity_double_minter`].
pub async fn deploy_erc1155_activity<G: ChainGateway>(
    gateway: &G,
    store: Option<&dyn SecretStore>,
    artifacts: &ArtifactStore,
    deployer: &PrivateKeySigner,
    identifier: &str,
    gas: GasOverrides,
) -> Result<DeploymentResult, WorkflowError> {
    let owner = generate_keypair();
    info!(identifier, owner = %owner.address(), "generated deployment keypair");

    let (owner_addr, owner_key) = account_fields(&owner);
    let mut record = SecretRecord::Erc1155Activity(Erc1155ActivityRecord {
        identifier: identifier.to_string(),
        uri: None,
        max_total_supply: None,
        collection_id: None,
        keys: DeploymentKeys {
            token_address: None,
            token_owner_address: owner_addr,
            token_owner_private_key: owner_key,
            double_minter_address: None,
            double_minter_role_address: None,
            double_minter_role_private_key: None,
        },
    });
    let secret = create_placeholder(store, &record).await?;

    let token_code = artifacts.load("RewardERC1155")?;
    let token = deploy_contract(gateway, deployer, "RewardERC1155", token_code, gas).await?;

    record.keys_mut().token_address = Some(token.to_string());
    write_populated(store, secret.as_ref(), &record).await?;

    Ok(DeploymentResult {
        token_address: token,
        double_minter_address: None,
        collection_id: None,
        owner: Some(owner),
        minter_role: None,
        record,
        secret,
    })
}

/// Creates a collection on an existing activity token and deploys a double
/// minter bound to it. Fails with [`WorkflowError::CollectionCreationFailed`]
/// before any minter deployment when the `createCollection` transaction
/// emits no `CollectionCreated` event from the token.
pub async fn deploy_erc1155_activity_double_minter<G: ChainGateway>(
    gateway: &G,
    store: Option<&dyn SecretStore>,
    artifacts: &ArtifactStore,
    deployer: &PrivateKeySigner,
    info: &Erc1155ActivityMinterInfo,
    gas: GasOverrides,
) -> Result<DeploymentResult, WorkflowError> {
    let owner = generate_keypair();
    let minter_role = generate_keypair();
    info!(
        identifier = %info.identifier,
        owner = %owner.address(),
        minter_role = %minter_role.address(),
        "generated deployment keypairs"
    );

    let (owner_addr, owner_key) = account_fields(&owner);
    let (role_addr, role_key) = account_fields(&minter_role);
    let mut record = SecretRecord::Erc1155Activity(Erc1155ActivityRecord {
        identifier: info.identifier.clone(),
        uri: Some(info.uri.clone()),
        max_total_supply: Some(info.max_total_supply),
        collection_id: None,
        keys: DeploymentKeys {
            token_address: Some(info.token_address.to_string()),
            token_owner_address: owner_addr,
            token_owner_private_key: owner_key,
            double_minter_address: None,
            double_minter_role_address: role_addr,
            double_minter_role_private_key: role_key,
        },
    });
    let secret = create_placeholder(store, &record).await?;

    let receipt = reward_erc1155::create_collection(
        gateway,
        deployer,
        info.token_address,
        minter_role.address(),
        info.uri.clone(),
        U256::from(info.max_total_supply),
        gas,
    )
    .await?;
    let collection_id =
        reward_erc1155::collection_id_from_receipt(&receipt, info.token_address)
            .ok_or(WorkflowError::CollectionCreationFailed)?;
    info!(%collection_id, token = %info.token_address, "collection created");

    let mut minter_code = artifacts.load("ERC1155ActivitiesDoubleMinter")?.to_vec();
    minter_code.extend(
        contracts::ERC1155ActivitiesDoubleMinter::constructorCall {
            token: info.token_address,
            collectionId: collection_id,
        }
        .abi_encode(),
    );
    let minter = deploy_contract(
        gateway,
        deployer,
        "ERC1155ActivitiesDoubleMinter",
        minter_code.into(),
        gas,
    )
    .await?;

    if let SecretRecord::Erc1155Activity(ref mut r) = record {
        r.collection_id = Some(collection_id.to_string());
    }
    record.keys_mut().double_minter_address = Some(minter.to_string());
    write_populated(store, secret.as_ref(), &record).await?;

    Ok(DeploymentResult {
        token_address: info.token_address,
        double_minter_address: Some(minter),
        collection_id: Some(collection_id),
        owner: Some(owner),
        minter_role: Some(minter_role),
        record,
        secret,
    })
}

/// Deploys a reward-tier ERC-1155 token and its double minter, both
/// constructed over the same per-tier parameter vectors.
pub async fn deploy_erc1155_reward_tier<G: ChainGateway>(
    gateway: &G,
    store: Option<&dyn SecretStore>,
    artifacts: &ArtifactStore,
    deployer: &PrivateKeySigner,
    info: &Erc1155RewardTierInfo,
    gas: GasOverrides,
) -> Result<DeploymentResult, WorkflowError> {
    let owner = generate_keypair();
    let minter_role = generate_keypair();
    info!(
        identifier = %info.identifier,
        owner = %owner.address(),
        minter_role = %minter_role.address(),
        "generated deployment keypairs"
    );

    let (owner_addr, owner_key) = account_fields(&owner);
    let (role_addr, role_key) = account_fields(&minter_role);
    let mut record = SecretRecord::Erc1155RewardTier(Erc1155RewardTierRecord {
        identifier: info.identifier.clone(),
        creator_address: info.creator_address.to_string(),
        max_total_supplies: info.max_total_supplies.clone(),
        reward_tier_names: info.reward_tier_names.clone(),
        required_reward_amounts: info.required_reward_amounts.clone(),
        uris: info.uris.clone(),
        keys: DeploymentKeys {
            token_address: None,
            token_owner_address: owner_addr,
            token_owner_private_key: owner_key,
            double_minter_address: None,
            double_minter_role_address: role_addr,
            double_minter_role_private_key: role_key,
        },
    });
    let secret = create_placeholder(store, &record).await?;

    let supplies: Vec<U256> = info.max_total_supplies.iter().map(|&v| U256::from(v)).collect();
    let amounts: Vec<U256> = info
        .required_reward_amounts
        .iter()
        .map(|&v| U256::from(v))
        .collect();

    let mut token_code = artifacts.load("RewardTierERC1155")?.to_vec();
    token_code.extend(
        contracts::RewardTierERC1155::constructorCall {
            creator: info.creator_address,
            maxTotalSupplies: supplies.clone(),
            rewardTierNames: info.reward_tier_names.clone(),
            requiredRewardAmounts: amounts.clone(),
            uris: info.uris.clone(),
        }
        .abi_encode(),
    );
    let token =
        deploy_contract(gateway, deployer, "RewardTierERC1155", token_code.into(), gas).await?;

    let mut minter_code = artifacts.load("ERC1155RewardTiersDoubleMinter")?.to_vec();
    minter_code.extend(
        contracts::ERC1155RewardTiersDoubleMinter::constructorCall {
            creator: info.creator_address,
            maxTotalSupplies: supplies,
            rewardTierNames: info.reward_tier_names.clone(),
            requiredRewardAmounts: amounts,
            uris: info.uris.clone(),
        }
        .abi_encode(),
    );
    let minter = deploy_contract(
        gateway,
        deployer,
        "ERC1155RewardTiersDoubleMinter",
        minter_code.into(),
        gas,
    )
    .await?;

    let keys = record.keys_mut();
    keys.token_address = Some(token.to_string());
    keys.double_minter_address = Some(minter.to_string());
    write_populated(store, secret.as_ref(), &record).await?;

    Ok(DeploymentResult {
        token_address: token,
        double_minter_address: Some(minter),
        collection_id: None,
        owner: Some(owner),
        minter_role: Some(minter_role),
        record,
        secret,
    })
}

/// Grants minting rights to the double minter and its role account:
/// `Enable` for both on the native-minter precompile allow list, and
/// `setEnabled` for both on the token's own allow list. Must be signed by
/// an admin of both lists.
pub async fn enable_double_minter<G: ChainGateway>(
    gateway: &G,
    admin: &PrivateKeySigner,
    token: Address,
    minter: Address,
    role: Address,
    gas: GasOverrides,
) -> Result<(), WorkflowError> {
    for who in [minter, role] {
        allow_list::set(gateway, admin, NATIVE_MINTER_ADDRESS, who, Role::Enable, gas).await?;
        info!(%who, "enabled on native-minter allow list");
        erc20::set_enabled(gateway, admin, token, who, gas).await?;
        info!(%who, %token, "enabled on token allow list");
    }
    Ok(())
}

/// Hands the token to its owner account and the double minter to the role
/// holder. Signed by the deployer, which owns both immediately after
/// deployment.
pub async fn transfer_ownership<G: ChainGateway>(
    gateway: &G,
    deployer: &PrivateKeySigner,
    token: Address,
    token_owner: Address,
    minter: Address,
    minter_owner: Address,
    gas: GasOverrides,
) -> Result<(), WorkflowError> {
    erc20::transfer_ownership(gateway, deployer, token, token_owner, gas).await?;
    info!(%token, new_owner = %token_owner, "token ownership transferred");
    double_minter::transfer_ownership(gateway, deployer, minter, minter_owner, gas).await?;
    info!(%minter, new_owner = %minter_owner, "double-minter ownership transferred");
    Ok(())
}
