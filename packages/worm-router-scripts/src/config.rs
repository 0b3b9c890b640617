//! Script configuration
//!
//! One JSON file per environment (`config/<env>.json`) lists the chains to
//! deploy to and test against. Wormhole contract addresses may be omitted;
//! they are filled from the published addresses for the configured network.
//! Private keys never live in the file: they come from the environment.

use alloy::primitives::Address;
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

use worm_router_rs::evm::ChainWallet;
use worm_router_rs::{
    wormhole_contracts, GuardianRpc, Network, Redacted, WormholeChainId, WormholeContracts,
};

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "WORM_ROUTER_CONFIG";

/// Fallback private key used for every chain
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    network: Network,
    #[serde(default = "default_artifacts_dir")]
    artifacts_dir: PathBuf,
    #[serde(default)]
    guardian_rpc: Option<Url>,
    chains: Vec<ChainEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainEntry {
    chain_id: WormholeChainId,
    description: String,
    rpc: String,
    wormhole: Option<Address>,
    token_bridge: Option<Address>,
    wormhole_relayer: Option<Address>,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("out")
}

/// A configured chain with every Wormhole address resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: WormholeChainId,
    pub description: String,
    pub rpc_url: Url,
    pub contracts: WormholeContracts,
}

/// Loaded configuration for one environment
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Environment name (`testnet`, `mainnet`, ...)
    pub env: String,
    pub network: Network,
    /// Directory holding compiled contract artifacts
    pub artifacts_dir: PathBuf,
    /// Guardian REST API; `None` means the network default
    pub guardian_rpc: Option<Url>,
    pub chains: Vec<ChainConfig>,
}

impl ScriptConfig {
    /// Default location of the config for `env`, honouring `WORM_ROUTER_CONFIG`
    pub fn path_for(env: &str) -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config").join(format!("{}.json", env)))
    }

    /// Load the config for `env`
    pub fn load(env: &str) -> Result<Self> {
        let path = Self::path_for(env);
        Self::load_from(env, &path)
    }

    pub fn load_from(env: &str, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(env, &content)
            .wrap_err_with(|| format!("Invalid config {}", path.display()))?;
        debug!(
            path = %path.display(),
            network = %config.network,
            chains = config.chains.len(),
            "Loaded config"
        );
        Ok(config)
    }

    pub fn from_json(env: &str, json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let network = file.network;

        let mut chains: Vec<ChainConfig> = Vec::with_capacity(file.chains.len());
        for entry in file.chains {
            if chains.iter().any(|c| c.chain_id == entry.chain_id) {
                return Err(eyre!("Chain {} is configured twice", entry.chain_id));
            }
            chains.push(resolve_chain(network, entry)?);
        }

        Ok(Self {
            env: env.to_string(),
            network,
            artifacts_dir: file.artifacts_dir,
            guardian_rpc: file.guardian_rpc,
            chains,
        })
    }

    /// Configured chain by Wormhole chain id
    pub fn chain(&self, chain_id: WormholeChainId) -> Result<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.chain_id == chain_id)
            .ok_or_else(|| eyre!("Chain {} is not configured for {}", chain_id, self.env))
    }

    /// Signing wallet for a configured chain
    pub fn wallet(&self, chain_id: WormholeChainId) -> Result<ChainWallet> {
        let chain = self.chain(chain_id)?;
        let key = private_key(chain_id)?;
        ChainWallet::connect(chain_id, chain.rpc_url.as_str(), key.expose())
    }

    /// Guardian API client: the configured URL, or the network default
    pub fn guardian(&self) -> Result<GuardianRpc> {
        match &self.guardian_rpc {
            Some(url) => Ok(GuardianRpc::new(url.clone())),
            None => GuardianRpc::for_network(self.network),
        }
    }
}

fn resolve_chain(network: Network, entry: ChainEntry) -> Result<ChainConfig> {
    let name = format!("rpc for chain {}", entry.chain_id);
    validate_rpc_url(&entry.rpc, &name)?;
    let rpc_url = Url::parse(&entry.rpc)?;

    let published = wormhole_contracts(network, entry.chain_id);
    let pick = |explicit: Option<Address>, field: &str, from_table: fn(&WormholeContracts) -> Address| {
        explicit
            .or_else(|| published.as_ref().map(from_table))
            .ok_or_else(|| {
                eyre!(
                    "Chain {} ({}) has no {} address and none is published for {}",
                    entry.chain_id,
                    entry.description,
                    field,
                    network
                )
            })
    };

    let contracts = WormholeContracts {
        core: pick(entry.wormhole, "wormhole", |c: &WormholeContracts| c.core)?,
        token_bridge: pick(entry.token_bridge, "tokenBridge", |c: &WormholeContracts| c.token_bridge)?,
        relayer: pick(entry.wormhole_relayer, "wormholeRelayer", |c: &WormholeContracts| c.relayer)?,
    };

    Ok(ChainConfig {
        chain_id: entry.chain_id,
        description: entry.description,
        rpc_url,
        contracts,
    })
}

/// Validate that an RPC URL is http(s) with a host, warning on plain http
pub fn validate_rpc_url(url_str: &str, name: &str) -> Result<()> {
    let parsed = Url::parse(url_str).map_err(|e| eyre!("{} must be a valid URL: {}", name, e))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(eyre!(
            "{} must use http:// or https:// scheme, got {}",
            name,
            scheme
        ));
    }

    if parsed.host_str().is_none() {
        return Err(eyre!("{} must have a host component", name));
    }

    if scheme == "http" {
        warn!("{} uses unencrypted http://", name);
    }

    Ok(())
}

/// Private key for `chain_id`: `PRIVATE_KEY_<id>` first, then `PRIVATE_KEY`
pub fn private_key(chain_id: WormholeChainId) -> Result<Redacted<String>> {
    private_key_from(chain_id, |name| std::env::var(name).ok())
}

fn private_key_from<F>(chain_id: WormholeChainId, lookup: F) -> Result<Redacted<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let per_chain = format!("{}_{}", PRIVATE_KEY_ENV, chain_id.to_u16());
    // An empty `PRIVATE_KEY_<id>=` line counts as unset
    let non_empty = |name: &str| lookup(name).map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
    non_empty(&per_chain)
        .or_else(|| non_empty(PRIVATE_KEY_ENV))
        .map(Redacted)
        .ok_or_else(|| eyre!("Set {} or {} to sign on chain {}", per_chain, PRIVATE_KEY_ENV, chain_id))
}
