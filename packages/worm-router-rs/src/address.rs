//! Wormhole universal addresses
//!
//! Wormhole carries every emitter and recipient as 32 bytes. EVM addresses
//! are left-padded with 12 zero bytes:
//!
//! ```text
//! | zero padding (12 bytes) | EVM address (20 bytes) |
//! ```

use alloy::primitives::{Address, FixedBytes};
use eyre::{eyre, Result};

/// Left-pad an EVM address to a 32-byte Wormhole address
pub fn evm_to_universal(address: Address) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(address.as_slice());
    bytes
}

/// Same as [`evm_to_universal`], typed as `bytes32`
pub fn evm_to_bytes32(address: Address) -> FixedBytes<32> {
    FixedBytes(evm_to_universal(address))
}

/// Recover an EVM address from a 32-byte Wormhole address
///
/// Fails if the 12 padding bytes are not zero, which means the address
/// belongs to a non-EVM chain.
pub fn universal_to_evm(bytes: &[u8; 32]) -> Result<Address> {
    if bytes[..12].iter().any(|&b| b != 0) {
        return Err(eyre!(
            "Not an EVM address: padding bytes are non-zero (0x{})",
            hex::encode(bytes)
        ));
    }
    Ok(Address::from_slice(&bytes[12..]))
}

/// 64-character lowercase hex of the universal address, no `0x` prefix
pub fn native_to_hex_string(address: Address) -> String {
    hex::encode(evm_to_universal(address))
}

/// Parse a universal address from hex (with or without `0x`)
///
/// Accepts a 20-byte EVM address as well, which is padded.
pub fn parse_universal_hex(s: &str) -> Result<[u8; 32]> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let raw = hex::decode(stripped).map_err(|e| eyre!("Invalid hex address '{}': {}", s, e))?;
    match raw.len() {
        32 => {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&raw);
            Ok(bytes)
        }
        20 => Ok(evm_to_universal(Address::from_slice(&raw))),
        n => Err(eyre!("Address must be 20 or 32 bytes, got {}", n)),
    }
}
