//! `toki` — operator CLI for deploying and driving the Toki token
//! contracts.

use alloy_primitives::Address;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use toki_chain::contracts::{allow_list, double_minter, erc20, find_allow_list, ALLOW_LISTS};
use toki_chain::{
    format_toki, generate_keypair, parse_toki, private_key_hex, signer_from_hex, ChainGateway,
    JsonRpcClient, PrivateKeySigner, Role, RpcGateway,
};
use toki_secrets::{secret_name_for, AwsSecretsClient, SecretStore};
use toki_workflows::{
    deploy_erc1155_activity, deploy_erc1155_activity_double_minter, deploy_erc1155_reward_tier,
    deploy_erc20, double_mint, enable_double_minter, ensure_funded, transfer_ownership,
    ArtifactStore, DeploymentResult, Erc1155ActivityMinterInfo, Erc1155RewardTierInfo,
    Erc20TokenInfo, TokiConfig,
};

#[derive(Parser)]
#[command(name = "toki", about = "Deployment and funding tooling for the Toki token contracts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy an ERC-20 token with its double minter, wire permissions and
    /// hand over ownership.
    DeployErc20 {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
        /// Skip all secret-store writes.
        #[arg(long)]
        no_secret_store: bool,
        /// Print the generated private keys to stdout.
        #[arg(long)]
        print_private_keys: bool,
    },
    /// Deploy a bare ERC-1155 activity token.
    DeployErc1155Activity {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        no_secret_store: bool,
        #[arg(long)]
        print_private_keys: bool,
    },
    /// Create a collection on an activity token and deploy a double minter
    /// bound to it.
    DeployErc1155ActivityMinter {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        token: Address,
        #[arg(long)]
        uri: String,
        #[arg(long)]
        max_total_supply: u64,
        #[arg(long)]
        no_secret_store: bool,
        #[arg(long)]
        print_private_keys: bool,
    },
    /// Deploy a reward-tier ERC-1155 token and its double minter.
    DeployErc1155RewardTier {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        creator: Address,
        /// Per-tier maximum supply, repeatable.
        #[arg(long = "max-total-supply", required = true)]
        max_total_supplies: Vec<u64>,
        /// Per-tier name, repeatable.
        #[arg(long = "tier-name", required = true)]
        tier_names: Vec<String>,
        /// Per-tier required reward amount, repeatable.
        #[arg(long = "required-amount", required = true)]
        required_amounts: Vec<u64>,
        /// Per-tier metadata URI, repeatable.
        #[arg(long = "uri", required = true)]
        uris: Vec<String>,
        #[arg(long)]
        no_secret_store: bool,
        #[arg(long)]
        print_private_keys: bool,
    },
    /// Mint native coin and token to a recipient in one transaction.
    DoubleMint {
        #[arg(long)]
        identifier: String,
        /// Native amount in whole tokens, e.g. "1.5".
        #[arg(long)]
        amount_native: String,
        /// ERC-20 amount in whole tokens.
        #[arg(long)]
        amount_erc20: String,
        #[arg(long)]
        to: Address,
    },
    /// Top the accounts stored under an identifier up to a minimum balance.
    TopOff {
        #[arg(long)]
        identifier: String,
        #[arg(long, default_value = "1")]
        minimum: String,
    },
    /// Top a single account up to a minimum balance.
    RefillAccount {
        #[arg(long)]
        address: Address,
        #[arg(long, default_value = "1")]
        minimum: String,
    },
    /// Read or set allow-list roles.
    #[command(subcommand)]
    Role(RoleCommand),
    /// Native and token balances of a wallet.
    Balances {
        #[arg(long)]
        wallet: Address,
        /// ERC-20 token addresses to include.
        tokens: Vec<Address>,
    },
    /// Generate fresh keypairs.
    GenerateWallets {
        #[arg(long, default_value_t = 1)]
        num: usize,
        /// Write the wallets to a JSON file instead of stdout only.
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
}

#[derive(Subcommand)]
enum RoleCommand {
    /// Read the role an address holds, on one list or all of them.
    Read {
        #[arg(long)]
        address: Address,
        /// Allow-list alias (e.g. "deployer", "minter", "tx"); all lists
        /// when omitted.
        #[arg(long)]
        list: Option<String>,
    },
    /// Set the role an address holds on an allow list.
    Set {
        #[arg(long)]
        list: String,
        #[arg(long)]
        address: Address,
        /// "none", "enable" or "admin".
        #[arg(long)]
        role: String,
    },
}

/// Connected handles shared by every command.
struct App {
    config: TokiConfig,
    gateway: RpcGateway,
    deployer: PrivateKeySigner,
}

impl App {
    async fn connect() -> anyhow::Result<Self> {
        let config = TokiConfig::from_env()?;
        let url = Url::parse(&config.node_url)
            .with_context(|| format!("invalid node url {:?}", config.node_url))?;
        let client = JsonRpcClient::with_poll_interval(url, config.receipt_poll_interval);
        let gateway = RpcGateway::connect(client).await?;
        let deployer = signer_from_hex(&config.deployer_private_key)?;
        Ok(Self {
            config,
            gateway,
            deployer,
        })
    }

    fn secret_store(&self) -> AwsSecretsClient {
        AwsSecretsClient::new(self.config.aws_profile.clone(), self.config.aws_region.clone())
    }

    fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(&self.config.artifacts_dir)
    }

    fn network_label(&self) -> &str {
        self.config.network.as_deref().unwrap_or("default")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();

    match Cli::parse().command {
        Command::DeployErc20 {
            identifier,
            name,
            symbol,
            decimals,
            no_secret_store,
            print_private_keys,
        } => {
            cmd_deploy_erc20(
                Erc20TokenInfo {
                    identifier,
                    name,
                    symbol,
                    decimals,
                },
                no_secret_store,
                print_private_keys,
            )
            .await
        }
        Command::DeployErc1155Activity {
            identifier,
            no_secret_store,
            print_private_keys,
        } => cmd_deploy_activity(identifier, no_secret_store, print_private_keys).await,
        Command::DeployErc1155ActivityMinter {
            identifier,
            token,
            uri,
            max_total_supply,
            no_secret_store,
            print_private_keys,
        } => {
            cmd_deploy_activity_minter(
                Erc1155ActivityMinterInfo {
                    identifier,
                    token_address: token,
                    uri,
                    max_total_supply,
                },
                no_secret_store,
                print_private_keys,
            )
            .await
        }
        Command::DeployErc1155RewardTier {
            identifier,
            creator,
            max_total_supplies,
            tier_names,
            required_amounts,
            uris,
            no_secret_store,
            print_private_keys,
        } => {
            anyhow::ensure!(
                max_total_supplies.len() == tier_names.len()
                    && tier_names.len() == required_amounts.len()
                    && required_amounts.len() == uris.len(),
                "tier argument lists must have equal lengths"
            );
            cmd_deploy_reward_tier(
                Erc1155RewardTierInfo {
                    identifier,
                    creator_address: creator,
                    max_total_supplies,
                    reward_tier_names: tier_names,
                    required_reward_amounts: required_amounts,
                    uris,
                },
                no_secret_store,
                print_private_keys,
            )
            .await
        }
        Command::DoubleMint {
            identifier,
            amount_native,
            amount_erc20,
            to,
        } => cmd_double_mint(identifier, amount_native, amount_erc20, to).await,
        Command::TopOff {
            identifier,
            minimum,
        } => cmd_top_off(identifier, minimum).await,
        Command::RefillAccount { address, minimum } => cmd_refill(address, minimum).await,
        Command::Role(role) => match role {
            RoleCommand::Read { address, list } => cmd_role_read(address, list).await,
            RoleCommand::Set {
                list,
                address,
                role,
            } => cmd_role_set(list, address, role).await,
        },
        Command::Balances { wallet, tokens } => cmd_balances(wallet, tokens).await,
        Command::GenerateWallets { num, file } => cmd_generate_wallets(num, file),
    }
}

fn print_keys(result: &DeploymentResult, print_private_keys: bool) {
    if let Some(owner) = &result.owner {
        println!("  token owner:        {}", owner.address());
        if print_private_keys {
            println!("  owner private key:  {}", private_key_hex(owner));
        }
    }
    if let Some(role) = &result.minter_role {
        println!("  minter role:        {}", role.address());
        if print_private_keys {
            println!("  role private key:   {}", private_key_hex(role));
        }
    }
    match &result.secret {
        Some(secret) => println!("  secret:             {} ({})", secret.name, secret.arn),
        None => println!("  secret:             not stored"),
    }
}

async fn cmd_deploy_erc20(
    info: Erc20TokenInfo,
    no_secret_store: bool,
    print_private_keys: bool,
) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let artifacts = app.artifacts();
    let store_client;
    let store: Option<&dyn SecretStore> = if no_secret_store {
        None
    } else {
        store_client = app.secret_store();
        Some(&store_client)
    };

    let result = deploy_erc20(
        &app.gateway,
        store,
        &artifacts,
        &app.deployer,
        &info,
        app.config.gas,
    )
    .await?;
    let minter = result
        .double_minter_address
        .context("erc20 deployment produced no double minter")?;
    let owner = result.owner.as_ref().context("no owner keypair")?;
    let role = result.minter_role.as_ref().context("no role keypair")?;

    enable_double_minter(
        &app.gateway,
        &app.deployer,
        result.token_address,
        minter,
        role.address(),
        app.config.gas,
    )
    .await?;

    // The fresh accounts need gas before they can use what they now own.
    let one = parse_toki("1")?;
    ensure_funded(&app.gateway, &app.deployer, owner.address(), one, app.config.gas).await?;
    ensure_funded(&app.gateway, &app.deployer, role.address(), one, app.config.gas).await?;

    transfer_ownership(
        &app.gateway,
        &app.deployer,
        result.token_address,
        owner.address(),
        minter,
        role.address(),
        app.config.gas,
    )
    .await?;

    println!("Deployed {} ({}) on {}", info.name, info.symbol, app.network_label());
    println!("  token address:      {}", result.token_address);
    println!("  double minter:      {minter}");
    print_keys(&result, print_private_keys);
    Ok(())
}

async fn cmd_deploy_activity(
    identifier: String,
    no_secret_store: bool,
    print_private_keys: bool,
) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let artifacts = app.artifacts();
    let store_client;
    let store: Option<&dyn SecretStore> = if no_secret_store {
        None
    } else {
        store_client = app.secret_store();
        Some(&store_client)
    };

    let result = deploy_erc1155_activity(
        &app.gateway,
        store,
        &artifacts,
        &app.deployer,
        &identifier,
        app.config.gas,
    )
    .await?;
    let owner = result.owner.as_ref().context("no owner keypair")?;

    ensure_funded(
        &app.gateway,
        &app.deployer,
        owner.address(),
        parse_toki("1")?,
        app.config.gas,
    )
    .await?;
    toki_chain::contracts::reward_erc1155::transfer_ownership(
        &app.gateway,
        &app.deployer,
        result.token_address,
        owner.address(),
        app.config.gas,
    )
    .await?;

    println!("Deployed activity token {identifier} on {}", app.network_label());
    println!("  token address:      {}", result.token_address);
    print_keys(&result, print_private_keys);
    Ok(())
}

async fn cmd_deploy_activity_minter(
    info: Erc1155ActivityMinterInfo,
    no_secret_store: bool,
    print_private_keys: bool,
) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let artifacts = app.artifacts();
    let store_client;
    let store: Option<&dyn SecretStore> = if no_secret_store {
        None
    } else {
        store_client = app.secret_store();
        Some(&store_client)
    };

    let result = deploy_erc1155_activity_double_minter(
        &app.gateway,
        store,
        &artifacts,
        &app.deployer,
        &info,
        app.config.gas,
    )
    .await?;
    let minter = result
        .double_minter_address
        .context("deployment produced no double minter")?;
    let role = result.minter_role.as_ref().context("no role keypair")?;
    let collection_id = result.collection_id.context("no collection id")?;

    ensure_funded(
        &app.gateway,
        &app.deployer,
        role.address(),
        parse_toki("1")?,
        app.config.gas,
    )
    .await?;
    double_minter::transfer_ownership(
        &app.gateway,
        &app.deployer,
        minter,
        role.address(),
        app.config.gas,
    )
    .await?;

    println!(
        "Deployed collection double minter {} on {}",
        info.identifier,
        app.network_label()
    );
    println!("  token address:      {}", result.token_address);
    println!("  collection id:      {collection_id}");
    println!("  double minter:      {minter}");
    print_keys(&result, print_private_keys);
    Ok(())
}

async fn cmd_deploy_reward_tier(
    info: Erc1155RewardTierInfo,
    no_secret_store: bool,
    print_private_keys: bool,
) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let artifacts = app.artifacts();
    let store_client;
    let store: Option<&dyn SecretStore> = if no_secret_store {
        None
    } else {
        store_client = app.secret_store();
        Some(&store_client)
    };

    let result = deploy_erc1155_reward_tier(
        &app.gateway,
        store,
        &artifacts,
        &app.deployer,
        &info,
        app.config.gas,
    )
    .await?;
    let minter = result
        .double_minter_address
        .context("deployment produced no double minter")?;
    let role = result.minter_role.as_ref().context("no role keypair")?;

    ensure_funded(
        &app.gateway,
        &app.deployer,
        role.address(),
        parse_toki("1")?,
        app.config.gas,
    )
    .await?;
    double_minter::transfer_ownership(
        &app.gateway,
        &app.deployer,
        minter,
        role.address(),
        app.config.gas,
    )
    .await?;

    println!(
        "Deployed reward-tier token {} on {}",
        info.identifier,
        app.network_label()
    );
    println!("  token address:      {}", result.token_address);
    println!("  double minter:      {minter}");
    print_keys(&result, print_private_keys);
    Ok(())
}

async fn cmd_double_mint(
    identifier: String,
    amount_native: String,
    amount_erc20: String,
    to: Address,
) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let store = app.secret_store();
    let amount_native = parse_toki(&amount_native)?;
    let amount_erc20 = parse_toki(&amount_erc20)?;

    let outcome = double_mint(
        &app.gateway,
        &store,
        &app.deployer,
        &identifier,
        amount_native,
        amount_erc20,
        to,
        app.config.gas,
    )
    .await?;

    let symbol = outcome.token_symbol.as_deref().unwrap_or("token");
    println!("Double mint to {to} confirmed ({})", outcome.receipt.transaction_hash);
    println!(
        "  native balance:     {} -> {}",
        format_toki(outcome.before.native),
        format_toki(outcome.after.native)
    );
    if let (Some(before), Some(after)) = (outcome.before.token, outcome.after.token) {
        println!(
            "  {symbol} balance:     {} -> {}",
            format_toki(before),
            format_toki(after)
        );
    }
    Ok(())
}

async fn cmd_top_off(identifier: String, minimum: String) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let store = app.secret_store();
    let minimum = parse_toki(&minimum)?;

    let record = store.get(&secret_name_for(&identifier)).await?;
    let keys = record.keys();
    let stored = [
        ("token owner", &keys.token_owner_address),
        ("minter role", &keys.double_minter_role_address),
    ];

    for (label, address) in stored {
        let Some(raw) = address else { continue };
        let account: Address = raw
            .parse()
            .with_context(|| format!("stored {label} address {raw:?} is invalid"))?;
        match ensure_funded(&app.gateway, &app.deployer, account, minimum, app.config.gas).await? {
            Some(minted) => {
                println!("{label} {account}: minted {}", format_toki(minted));
            }
            None => println!("{label} {account}: already funded"),
        }
    }
    Ok(())
}

async fn cmd_refill(address: Address, minimum: String) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let minimum = parse_toki(&minimum)?;
    match ensure_funded(&app.gateway, &app.deployer, address, minimum, app.config.gas).await? {
        Some(minted) => println!("{address}: minted {}", format_toki(minted)),
        None => println!("{address}: already funded"),
    }
    Ok(())
}

async fn cmd_role_read(address: Address, list: Option<String>) -> anyhow::Result<()> {
    let app = App::connect().await?;
    match list {
        Some(alias) => {
            let entry = find_allow_list(&alias)
                .with_context(|| format!("unknown allow list {alias:?}"))?;
            let role = allow_list::read(&app.gateway, entry.address, address).await?;
            println!("{}: {role}", entry.name);
        }
        None => {
            for entry in ALLOW_LISTS {
                let role = allow_list::read(&app.gateway, entry.address, address).await?;
                println!("{}: {role}", entry.name);
            }
        }
    }
    Ok(())
}

async fn cmd_role_set(list: String, address: Address, role: String) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let entry =
        find_allow_list(&list).with_context(|| format!("unknown allow list {list:?}"))?;
    let role = Role::parse(&role)?;
    allow_list::set(
        &app.gateway,
        &app.deployer,
        entry.address,
        address,
        role,
        app.config.gas,
    )
    .await?;
    println!("{}: {address} set to {role}", entry.name);
    Ok(())
}

async fn cmd_balances(wallet: Address, tokens: Vec<Address>) -> anyhow::Result<()> {
    let app = App::connect().await?;
    let native = app.gateway.get_balance(wallet).await?;
    println!("{wallet}");
    println!("  native:             {}", format_toki(native));
    for token in tokens {
        let balance = erc20::balance_of(&app.gateway, token, wallet).await?;
        let symbol = erc20::symbol(&app.gateway, token).await?;
        println!("  {symbol} ({token}): {}", format_toki(balance));
    }
    Ok(())
}

fn cmd_generate_wallets(num: usize, file: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let mut wallets = Vec::with_capacity(num);
    for i in 0..num {
        let signer = generate_keypair();
        println!("wallet {i}: {}", signer.address());
        wallets.push(serde_json::json!({
            "address": signer.address().to_string(),
            "privateKey": private_key_hex(&signer),
        }));
    }
    if let Some(path) = file {
        std::fs::write(&path, serde_json::to_string_pretty(&wallets)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {num} wallets to {}", path.display());
    }
    Ok(())
}
