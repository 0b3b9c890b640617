//! Deployed address book
//!
//! Contract addresses produced by the deploy commands, keyed by Wormhole chain
//! id and persisted as pretty JSON in `deployed/<env>.json`.

use alloy::primitives::Address;
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use worm_router_rs::WormholeChainId;

/// Overrides the address book location
pub const DEPLOYED_PATH_ENV: &str = "WORM_ROUTER_DEPLOYED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedAddresses {
    #[serde(default)]
    pub worm_router: BTreeMap<WormholeChainId, Address>,
    #[serde(default)]
    pub token_bridge_helpers: BTreeMap<WormholeChainId, Address>,
    #[serde(default)]
    pub erc20s: BTreeMap<WormholeChainId, Vec<Address>>,
}

impl DeployedAddresses {
    pub fn path_for(env: &str) -> PathBuf {
        std::env::var(DEPLOYED_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("deployed").join(format!("{}.json", env)))
    }

    /// Load the book, or an empty one if nothing has been deployed yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No deployed addresses yet");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid deployed addresses in {}", path.display()))
    }

    /// Write the book via a temp file and rename
    pub fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json + "\n")
            .wrap_err_with(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .wrap_err_with(|| format!("Failed to move {} into place", tmp.display()))?;
        info!(path = %path.display(), "Stored deployed addresses");
        Ok(())
    }

    pub fn worm_router(&self, chain: WormholeChainId) -> Result<Address> {
        self.worm_router
            .get(&chain)
            .copied()
            .ok_or_else(|| eyre!("No WormRouter deployed on chain {}", chain))
    }

    pub fn set_worm_router(&mut self, chain: WormholeChainId, address: Address) {
        self.worm_router.insert(chain, address);
    }

    pub fn set_token_bridge_helpers(&mut self, chain: WormholeChainId, address: Address) {
        self.token_bridge_helpers.insert(chain, address);
    }

    pub fn add_erc20(&mut self, chain: WormholeChainId, address: Address) {
        self.erc20s.entry(chain).or_default().push(address);
    }

    /// Test token the round trip sends: the first one deployed on `chain`
    pub fn first_erc20(&self, chain: WormholeChainId) -> Result<Address> {
        self.erc20s
            .get(&chain)
            .and_then(|tokens| tokens.first())
            .copied()
            .ok_or_else(|| eyre!("No test token deployed on chain {}", chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("worm-router-deployed-{}-{}", name, std::process::id()))
            .join("testnet.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let book = DeployedAddresses::load(&temp_path("missing")).unwrap();
        assert_eq!(book, DeployedAddresses::default());
        assert!(book.worm_router(WormholeChainId::AVALANCHE).is_err());
    }

    #[test]
    fn test_store_and_load() {
        let path = temp_path("store");
        let mut book = DeployedAddresses::default();
        book.set_worm_router(WormholeChainId::AVALANCHE, Address::repeat_byte(1));
        book.set_worm_router(WormholeChainId::AVALANCHE, Address::repeat_byte(2));
        book.set_token_bridge_helpers(WormholeChainId::CELO, Address::repeat_byte(3));
        book.add_erc20(WormholeChainId::AVALANCHE, Address::repeat_byte(4));
        book.add_erc20(WormholeChainId::AVALANCHE, Address::repeat_byte(5));
        book.store(&path).unwrap();

        let loaded = DeployedAddresses::load(&path).unwrap();
        assert_eq!(loaded, book);
        assert_eq!(
            loaded.worm_router(WormholeChainId::AVALANCHE).unwrap(),
            Address::repeat_byte(2)
        );
        assert!(!path.with_extension("json.tmp").exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["wormRouter"]["6"].is_string());
        assert_eq!(value["erc20s"]["6"].as_array().unwrap().len(), 2);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_round_trip_token_is_first_deployed() {
        let mut book = DeployedAddresses::default();
        assert!(book.first_erc20(WormholeChainId::AVALANCHE).is_err());

        book.add_erc20(WormholeChainId::AVALANCHE, Address::repeat_byte(0xaa));
        book.add_erc20(WormholeChainId::AVALANCHE, Address::repeat_byte(0xbb));
        assert_eq!(
            book.first_erc20(WormholeChainId::AVALANCHE).unwrap(),
            Address::repeat_byte(0xaa)
        );
        assert!(book.first_erc20(WormholeChainId::CELO).is_err());
    }
}
