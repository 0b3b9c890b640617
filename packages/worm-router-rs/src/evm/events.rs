//! Core bridge event parsing
//!
//! A Token Bridge transfer or attestation is identified downstream by the
//! `sequence` the core bridge assigns in `LogMessagePublished`.

use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::Log;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

use crate::evm::contracts::IWormhole;

/// A message published through the core bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedMessage {
    /// Contract that published the message (the emitter)
    pub sender: Address,
    pub sequence: u64,
    pub nonce: u32,
    pub payload: Bytes,
    pub consistency_level: u8,
}

/// Decode every `LogMessagePublished` emitted by `core` in a receipt's logs
///
/// Logs from other contracts, and logs that fail to decode, are skipped.
pub fn parse_published_messages(logs: &[Log], core: Address) -> Vec<PublishedMessage> {
    logs.iter()
        .filter(|log| log.address() == core)
        .filter_map(|log| log.log_decode::<IWormhole::LogMessagePublished>().ok())
        .map(|decoded| {
            let event = decoded.inner.data;
            PublishedMessage {
                sender: event.sender,
                sequence: event.sequence,
                nonce: event.nonce,
                payload: event.payload,
                consistency_level: event.consistencyLevel,
            }
        })
        .collect()
}

/// Sequence of the first message `core` published in these logs
pub fn parse_sequence_from_logs(logs: &[Log], core: Address) -> Result<u64> {
    parse_published_messages(logs, core)
        .first()
        .map(|message| message.sequence)
        .ok_or_else(|| eyre!("No LogMessagePublished from core bridge {} in receipt", core))
}
