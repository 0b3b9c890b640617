//! Per-chain signing wallet
//!
//! Every configured chain gets its own provider with the deployer key
//! attached. The provider type is erased so wallets for different chains
//! can live in the same collection.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use eyre::{eyre, Result};
use std::fmt;
use tracing::info;

use crate::chains::WormholeChainId;

/// A signing wallet connected to one chain
#[derive(Clone)]
pub struct ChainWallet {
    chain: WormholeChainId,
    address: Address,
    provider: DynProvider,
}

impl fmt::Debug for ChainWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainWallet")
            .field("chain", &self.chain)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl ChainWallet {
    /// Connect a wallet for `chain` through `rpc_url`
    pub fn connect(chain: WormholeChainId, rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| eyre!("Invalid private key for chain {}: {}", chain, e))?;
        let address = signer.address();

        let url = rpc_url
            .parse()
            .map_err(|e| eyre!("Invalid RPC URL for chain {}: {}", chain, e))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        info!(
            chain = %chain,
            rpc_url = %rpc_url,
            address = %address,
            "Connected chain wallet"
        );

        Ok(Self::from_provider(chain, address, provider))
    }

    /// Wrap a provider that already signs as `address`
    pub fn from_provider(chain: WormholeChainId, address: Address, provider: DynProvider) -> Self {
        Self {
            chain,
            address,
            provider,
        }
    }

    /// Wormhole chain id this wallet is connected to
    pub fn chain(&self) -> WormholeChainId {
        self.chain
    }

    /// Signer address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Provider with the signer attached (for contract instances)
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Native EVM chain id reported by the RPC
    pub async fn evm_chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    /// Native token balance of the signer
    pub async fn native_balance(&self) -> Result<U256> {
        Ok(self.provider.get_balance(self.address).await?)
    }

    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Whether any contract code is deployed at `address`
    pub async fn has_code(&self, address: Address) -> Result<bool> {
        let code = self.provider.get_code_at(address).await?;
        Ok(!code.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first default account
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_connect_derives_signer_address() {
        let wallet =
            ChainWallet::connect(WormholeChainId::AVALANCHE, "http://localhost:8545", TEST_KEY)
                .unwrap();
        assert_eq!(
            wallet.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(wallet.chain(), WormholeChainId::AVALANCHE);
    }

    #[test]
    fn test_connect_rejects_bad_inputs() {
        assert!(ChainWallet::connect(WormholeChainId::CELO, "http://localhost:8545", "0x12").is_err());
        assert!(ChainWallet::connect(WormholeChainId::CELO, "not a url", TEST_KEY).is_err());
    }

    #[test]
    fn test_debug_hides_provider_and_key() {
        let wallet =
            ChainWallet::connect(WormholeChainId::CELO, "http://localhost:8545", TEST_KEY).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("ChainWallet"));
        assert!(!debug.contains("ac0974bec"));
    }

    #[tokio::test]
    async fn test_from_provider_uses_given_transport() {
        use alloy::primitives::U64;
        use alloy::transports::mock::Asserter;

        let asserter = Asserter::new();
        asserter.push_success(&U64::from(0x10));
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter)
            .erased();

        let wallet =
            ChainWallet::from_provider(WormholeChainId::CELO, Address::repeat_byte(0x42), provider);
        assert_eq!(wallet.address(), Address::repeat_byte(0x42));
        assert_eq!(wallet.block_number().await.unwrap(), 16);
    }
}
