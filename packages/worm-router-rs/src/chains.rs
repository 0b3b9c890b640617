//! Wormhole chain identifiers and published contract addresses
//!
//! Wormhole numbers chains with its own 2-byte ids, independent of the
//! native EVM chain id. Avalanche is `6` on every network, Fuji included.
//!
//! ## Published Contracts
//!
//! The core bridge, Token Bridge and Wormhole Relayer addresses below are the
//! ones published by the guardian network for mainnet and testnet. Devnet
//! deployments are local and have no published table.

use alloy::primitives::{address, Address};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Chain ID
// ============================================================================

/// Wormhole chain id (2 bytes, `uint16` on-chain)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WormholeChainId(pub u16);

impl WormholeChainId {
    pub const ETHEREUM: Self = Self(2);
    pub const BSC: Self = Self(4);
    pub const POLYGON: Self = Self(5);
    pub const AVALANCHE: Self = Self(6);
    pub const OASIS: Self = Self(7);
    pub const FANTOM: Self = Self(10);
    pub const KLAYTN: Self = Self(13);
    pub const CELO: Self = Self(14);
    pub const MOONBEAM: Self = Self(16);
    pub const ARBITRUM: Self = Self(23);
    pub const OPTIMISM: Self = Self(24);
    pub const BASE: Self = Self(30);
    pub const SEPOLIA: Self = Self(10002);

    /// Raw `u16` value
    pub fn to_u16(&self) -> u16 {
        self.0
    }

    /// Known chain name, if any
    pub fn name(&self) -> Option<&'static str> {
        chain_name(*self)
    }
}

impl fmt::Display for WormholeChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for WormholeChainId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<WormholeChainId> for u16 {
    fn from(id: WormholeChainId) -> Self {
        id.0
    }
}

impl FromStr for WormholeChainId {
    type Err = eyre::Error;

    /// Accepts either a numeric id (`"6"`) or a known name (`"avalanche"`)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u16>() {
            return Ok(Self(id));
        }
        chain_id_from_name(trimmed).ok_or_else(|| eyre!("Unknown Wormhole chain: {}", trimmed))
    }
}

/// Name ↔ id table of the EVM chains these scripts know about
const KNOWN_CHAINS: &[(&str, WormholeChainId)] = &[
    ("ethereum", WormholeChainId::ETHEREUM),
    ("bsc", WormholeChainId::BSC),
    ("polygon", WormholeChainId::POLYGON),
    ("avalanche", WormholeChainId::AVALANCHE),
    ("oasis", WormholeChainId::OASIS),
    ("fantom", WormholeChainId::FANTOM),
    ("klaytn", WormholeChainId::KLAYTN),
    ("celo", WormholeChainId::CELO),
    ("moonbeam", WormholeChainId::MOONBEAM),
    ("arbitrum", WormholeChainId::ARBITRUM),
    ("optimism", WormholeChainId::OPTIMISM),
    ("base", WormholeChainId::BASE),
    ("sepolia", WormholeChainId::SEPOLIA),
];

/// Look up the canonical name of a chain
pub fn chain_name(id: WormholeChainId) -> Option<&'static str> {
    KNOWN_CHAINS
        .iter()
        .find(|(_, known)| *known == id)
        .map(|(name, _)| *name)
}

/// Look up a chain id by name (case-insensitive)
pub fn chain_id_from_name(name: &str) -> Option<WormholeChainId> {
    KNOWN_CHAINS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

// ============================================================================
// Network
// ============================================================================

/// Guardian network environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "MAINNET",
            Network::Testnet => "TESTNET",
            Network::Devnet => "DEVNET",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAINNET" => Ok(Network::Mainnet),
            "TESTNET" => Ok(Network::Testnet),
            "DEVNET" => Ok(Network::Devnet),
            other => Err(eyre!(
                "Unknown network '{}' (expected MAINNET, TESTNET or DEVNET)",
                other
            )),
        }
    }
}

// ============================================================================
// Published Contracts
// ============================================================================

/// Wormhole contracts deployed on a single chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WormholeContracts {
    /// Core bridge (emits `LogMessagePublished`)
    pub core: Address,
    /// Token Bridge
    pub token_bridge: Address,
    /// Wormhole Relayer (automatic delivery)
    pub relayer: Address,
}

/// Same relayer address on every mainnet EVM chain
const MAINNET_RELAYER: Address = address!("27428DD2d3DD32A4D7f7C497eAaa23130d894911");

/// Published Wormhole contracts for a chain on a network
pub fn wormhole_contracts(network: Network, chain: WormholeChainId) -> Option<WormholeContracts> {
    match (network, chain) {
        (Network::Mainnet, WormholeChainId::ETHEREUM) => Some(WormholeContracts {
            core: address!("98f3c9e6E3fAce36bAAd05FE09d375Ef1464288B"),
            token_bridge: address!("3ee18B2214AFF97000D974cf647E7C347E8fa585"),
            relayer: MAINNET_RELAYER,
        }),
        (Network::Mainnet, WormholeChainId::AVALANCHE) => Some(WormholeContracts {
            core: address!("54a8e5f9c4CbA08F9943965859F6c34eAF03E26c"),
            token_bridge: address!("0e082F06FF657D94310cB8cE8B0D9a04541d8052"),
            relayer: MAINNET_RELAYER,
        }),
        (Network::Mainnet, WormholeChainId::CELO) => Some(WormholeContracts {
            core: address!("a321448d90d4e5b0A732867c18eA198e75CAC48E"),
            token_bridge: address!("796Dff6D74F3E27060B71255Fe517BFb23C93eed"),
            relayer: MAINNET_RELAYER,
        }),
        (Network::Testnet, WormholeChainId::BSC) => Some(WormholeContracts {
            core: address!("68605AD7b15c732a30b1BbC62BE8F2A509D74b4D"),
            token_bridge: address!("9dcF9D205C9De35334D646BeE44b2D2859712A09"),
            relayer: address!("80aC94316391752A193C1c47E27D382b507c93F3"),
        }),
        (Network::Testnet, WormholeChainId::POLYGON) => Some(WormholeContracts {
            core: address!("0CBE91CF822c73C2315FB05100C2F714765d5c20"),
            token_bridge: address!("377D55a7928c046E18eEbb61977e714d2a76472a"),
            relayer: address!("0591C25ebd0580E0d4F27A82Fc2e24E7489CB5e0"),
        }),
        (Network::Testnet, WormholeChainId::AVALANCHE) => Some(WormholeContracts {
            core: address!("7bbcE28e64B3F8b84d876Ab298393c38ad7aac4C"),
            token_bridge: address!("61E44E506Ca5659E6c0bba9b678586fA2d729756"),
            relayer: address!("A3cF45939bD6260bcFe3D66bc73d60f19e49a8BB"),
        }),
        (Network::Testnet, WormholeChainId::CELO) => Some(WormholeContracts {
            core: address!("88505117CA88e7dd2eC6EA1E13f0948db2D50D56"),
            token_bridge: address!("05ca6037eC51F8b712eD2E6Fa72219FEaE74E153"),
            relayer: address!("306B68267Deb7c5DfCDa3619E22E9Ca39C374f84"),
        }),
        (Network::Testnet, WormholeChainId::MOONBEAM) => Some(WormholeContracts {
            core: address!("a5B7D85a8f27dd7907dc8FdC21FA5657D5E2F901"),
            token_bridge: address!("bc976D4b9D57E57c3cA52e1Fd136C45FF7955A96"),
            relayer: address!("0591C25ebd0580E0d4F27A82Fc2e24E7489CB5e0"),
        }),
        (Network::Testnet, WormholeChainId::SEPOLIA) => Some(WormholeContracts {
            core: address!("4a8bc80Ed5a4067f1CCf107057b8270E0cC11A78"),
            token_bridge: address!("DB5492265f6038831E89f495670FF909aDe94bd9"),
            relayer: address!("7B1bD7a6b4E61c2a123AC6BC2cbfC614437D0470"),
        }),
        _ => None,
    }
}

/// Block explorer link for a transaction, for the chains the live tests use
pub fn explorer_tx_url(network: Network, chain: WormholeChainId, tx_hash: &str) -> Option<String> {
    let base = match (network, chain) {
        (Network::Mainnet, WormholeChainId::ETHEREUM) => "https://etherscan.io",
        (Network::Mainnet, WormholeChainId::AVALANCHE) => "https://snowtrace.io",
        (Network::Mainnet, WormholeChainId::CELO) => "https://celoscan.io",
        (Network::Testnet, WormholeChainId::AVALANCHE) => "https://testnet.snowtrace.io",
        (Network::Testnet, WormholeChainId::CELO) => "https://alfajores.celoscan.io",
        (Network::Testnet, WormholeChainId::SEPOLIA) => "https://sepolia.etherscan.io",
        _ => return None,
    };
    Some(format!("{}/tx/{}", base, tx_hash))
}
