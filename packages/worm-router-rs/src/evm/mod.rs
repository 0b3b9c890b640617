//! EVM Chain Support Module
//!
//! Everything that talks to an EVM chain through alloy.
//!
//! ## Submodules
//!
//! - `artifact` - Compiled contract artifacts (Foundry/Hardhat JSON)
//! - `client` - Per-chain signing wallet
//! - `contracts` - Wormhole contract bindings using alloy sol! macro
//! - `deploy` - CREATE transactions from artifacts
//! - `events` - `LogMessagePublished` parsing
//! - `tokens` - ERC20 approve/balance helpers

pub mod artifact;
pub mod client;
pub mod contracts;
pub mod deploy;
pub mod events;
pub mod tokens;

// Re-export commonly used items
pub use artifact::ContractArtifact;
pub use client::ChainWallet;
pub use contracts::{ERC20Mock, IERC20, ITokenBridge, IWormhole, IWormholeRelayer};
pub use deploy::{deploy_contract, DeployedContract};
pub use events::{parse_published_messages, parse_sequence_from_logs, PublishedMessage};
