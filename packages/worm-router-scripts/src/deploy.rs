//! Contract deployment commands
//!
//! Each command walks the configured chains in order, deploys from the
//! compiled artifacts in `artifactsDir`, and records the results in the
//! deployed address book once every chain has succeeded.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use eyre::{eyre, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use worm_router_rs::evm::{deploy_contract, tokens, ContractArtifact};
use worm_router_rs::relay::{attest_token, create_or_update_wrapped};
use worm_router_rs::VaaSource;

use crate::config::{ChainConfig, ScriptConfig};
use crate::deployed::DeployedAddresses;

pub const WORM_ROUTER_CONTRACT: &str = "WormRouter";
pub const TOKEN_BRIDGE_HELPERS_CONTRACT: &str = "TokenBridgeHelpers";
pub const MOCK_TOKEN_CONTRACT: &str = "ERC20Mock";

/// Supply minted to the deployer for each new mock token (whole tokens)
pub const MOCK_TOKEN_SUPPLY: u64 = 1_000_000_000;

/// Attempts and interval when waiting for an attestation VAA to be signed
pub const ATTESTATION_VAA_ATTEMPTS: u32 = 60;
pub const ATTESTATION_VAA_INTERVAL: Duration = Duration::from_secs(5);

/// `WormRouter(address wormholeRelayer, uint16 chainId)`
pub fn worm_router_args(chain: &ChainConfig) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Address(chain.contracts.relayer),
        DynSolValue::Uint(U256::from(chain.chain_id.to_u16()), 16),
    ]
}

/// `TokenBridgeHelpers(address wormholeRelayer, address wormhole, address tokenBridge)`
pub fn token_bridge_helpers_args(chain: &ChainConfig) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Address(chain.contracts.relayer),
        DynSolValue::Address(chain.contracts.core),
        DynSolValue::Address(chain.contracts.token_bridge),
    ]
}

/// Mock token constructor arguments: none, or `(string name, string symbol)`
pub fn mock_token_args(artifact: &ContractArtifact, chain: &ChainConfig) -> Result<Vec<DynSolValue>> {
    match artifact.constructor_arity() {
        0 => Ok(Vec::new()),
        2 => Ok(vec![
            DynSolValue::String(format!("Worm Router Test Token ({})", chain.chain_id)),
            DynSolValue::String(format!("WRT{}", chain.chain_id.to_u16())),
        ]),
        n => Err(eyre!(
            "{} constructor takes {} arguments; expected none or (name, symbol)",
            artifact.name,
            n
        )),
    }
}

const WORM_ROUTER_LABEL: &str = "Worm Router";
const MOCK_TOKEN_LABEL: &str = "Test token";

fn deployed_line(label: &str, address: Address, chain: &ChainConfig) -> String {
    format!(
        "{} deployed to {} on {} (chain {})",
        label, address, chain.description, chain.chain_id
    )
}

fn load_artifact(config: &ScriptConfig, name: &str) -> Result<ContractArtifact> {
    ContractArtifact::find(&config.artifacts_dir, name)
}

/// Deploy a WormRouter on every configured chain
pub async fn deploy_worm_router(config: &ScriptConfig, book_path: &Path) -> Result<DeployedAddresses> {
    let artifact = load_artifact(config, WORM_ROUTER_CONTRACT)?;
    let mut deployed = DeployedAddresses::load(book_path)?;

    for chain in &config.chains {
        let wallet = config.wallet(chain.chain_id)?;
        let contract = deploy_contract(&wallet, &artifact, &worm_router_args(chain)).await?;
        deployed.set_worm_router(chain.chain_id, contract.address);
        info!("{}", deployed_line(WORM_ROUTER_LABEL, contract.address, chain));
    }

    deployed.store(book_path)?;
    Ok(deployed)
}

/// Deploy TokenBridgeHelpers on every configured chain
pub async fn deploy_token_bridge_helpers(
    config: &ScriptConfig,
    book_path: &Path,
) -> Result<DeployedAddresses> {
    let artifact = load_artifact(config, TOKEN_BRIDGE_HELPERS_CONTRACT)?;
    let mut deployed = DeployedAddresses::load(book_path)?;

    for chain in &config.chains {
        let wallet = config.wallet(chain.chain_id)?;
        let contract =
            deploy_contract(&wallet, &artifact, &token_bridge_helpers_args(chain)).await?;
        deployed.set_token_bridge_helpers(chain.chain_id, contract.address);
        info!("{}", deployed_line(TOKEN_BRIDGE_HELPERS_CONTRACT, contract.address, chain));
    }

    deployed.store(book_path)?;
    Ok(deployed)
}

/// Deploy a mintable test token on every chain and attest it to the others
pub async fn deploy_mock_token<S>(
    config: &ScriptConfig,
    book_path: &Path,
    vaa_source: &S,
) -> Result<DeployedAddresses>
where
    S: VaaSource + ?Sized,
{
    let artifact = load_artifact(config, MOCK_TOKEN_CONTRACT)?;
    let mut deployed = DeployedAddresses::load(book_path)?;

    for chain in &config.chains {
        let wallet = config.wallet(chain.chain_id)?;
        let args = mock_token_args(&artifact, chain)?;
        let token = deploy_contract(&wallet, &artifact, &args).await?.address;

        let decimals = tokens::decimals(&wallet, token).await?;
        let supply = U256::from(MOCK_TOKEN_SUPPLY) * U256::from(10u64).pow(U256::from(decimals));
        tokens::mint(&wallet, token, wallet.address(), supply).await?;
        deployed.add_erc20(chain.chain_id, token);
        info!("{}", deployed_line(MOCK_TOKEN_LABEL, token, chain));

        attest_to_other_chains(config, chain, token, vaa_source).await?;
    }

    deployed.store(book_path)?;
    Ok(deployed)
}

async fn attest_to_other_chains<S>(
    config: &ScriptConfig,
    origin: &ChainConfig,
    token: Address,
    vaa_source: &S,
) -> Result<()>
where
    S: VaaSource + ?Sized,
{
    let others: Vec<&ChainConfig> = config
        .chains
        .iter()
        .filter(|c| c.chain_id != origin.chain_id)
        .collect();
    if others.is_empty() {
        warn!(chain = %origin.chain_id, "Only one chain configured; skipping attestation");
        return Ok(());
    }

    let wallet = config.wallet(origin.chain_id)?;
    let attestation = attest_token(&wallet, &origin.contracts, token).await?;
    let vaa = attestation
        .fetch_vaa(vaa_source, ATTESTATION_VAA_ATTEMPTS, ATTESTATION_VAA_INTERVAL)
        .await?;

    for target in others {
        let target_wallet = config.wallet(target.chain_id)?;
        let wrapped = create_or_update_wrapped(
            &target_wallet,
            target.contracts.token_bridge,
            &attestation,
            vaa.clone(),
        )
        .await?;
        info!(
            "Wrapped {} from chain {} is {} on {} (chain {})",
            token, origin.chain_id, wrapped, target.description, target.chain_id
        );
    }
    Ok(())
}
