//! WormRouter-RS: Shared Library for WormRouter Tooling
//!
//! This crate provides the pieces the deploy scripts and live tests share:
//!
//! - **Chains** - Wormhole chain ids, networks and published contract addresses
//! - **Addresses** - 32-byte universal address conversion
//! - **EVM Module** - Wallet, contract bindings, artifacts, deployment, event parsing
//! - **VAA** - VAA parsing and signed VAA retrieval from the guardian API
//! - **Relay** - Token Bridge transfer + Wormhole Relayer delivery to a WormRouter
//! - **Testing Module** - Assertions and an in-memory VAA source
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! worm-router-rs = { path = "../worm-router-rs" }
//! ```
//!
//! ## Feature Flags
//!
//! - `evm` - Enable EVM chain support and relaying (default)
//! - `testing` - Enable testing utilities for live tests
//! - `full` - Enable all features

// Core modules (always available)
pub mod address;
pub mod chains;
pub mod redact;
pub mod vaa;

// Chain-specific modules (feature-gated)
#[cfg(feature = "evm")]
pub mod evm;

#[cfg(feature = "evm")]
pub mod relay;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used items at the crate root
pub use address::{
    evm_to_bytes32, evm_to_universal, native_to_hex_string, parse_universal_hex,
    universal_to_evm,
};
pub use chains::{
    chain_id_from_name, chain_name, explorer_tx_url, wormhole_contracts, Network,
    WormholeChainId, WormholeContracts,
};
pub use redact::Redacted;
pub use vaa::{fetch_signed_vaa_with_retry, GuardianRpc, Vaa, VaaId, VaaSource};

#[cfg(feature = "evm")]
pub use relay::{
    transfer_token, transfer_token_cost, RelayError, RouterPayload, TransferReceipt,
    TransferRequest,
};
