//! In-memory VAA source and VAA builders for tests

use alloy::primitives::Bytes;
use async_trait::async_trait;
use eyre::Result;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::vaa::{VaaId, VaaSource};

/// Serves preloaded VAAs, optionally only after a number of "not signed yet" polls
#[derive(Debug, Default)]
pub struct InMemoryVaaSource {
    vaas: Mutex<HashMap<VaaId, (Bytes, u32)>>,
    calls: Mutex<u32>,
}

impl InMemoryVaaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `None` for the first `pending_polls` lookups of `id`
    pub fn with_vaa_after(self, id: VaaId, vaa: Bytes, pending_polls: u32) -> Self {
        if let Ok(mut vaas) = self.vaas.lock() {
            vaas.insert(id, (vaa, pending_polls));
        }
        self
    }

    /// Total number of fetches served
    pub fn calls(&self) -> u32 {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl VaaSource for InMemoryVaaSource {
    async fn fetch_signed_vaa(&self, id: &VaaId) -> Result<Option<Bytes>> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        let mut vaas = self
            .vaas
            .lock()
            .map_err(|_| eyre::eyre!("VAA store poisoned"))?;
        match vaas.get_mut(id) {
            Some((_, pending)) if *pending > 0 => {
                *pending -= 1;
                Ok(None)
            }
            Some((vaa, _)) => Ok(Some(vaa.clone())),
            None => Ok(None),
        }
    }
}

/// Build a version-1 VAA for `id` with `signatures` dummy guardian signatures
pub fn sample_vaa_bytes(id: &VaaId, signatures: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![1u8];
    out.extend_from_slice(&3u32.to_be_bytes());
    out.push(signatures);
    for index in 0..signatures {
        out.push(index);
        out.extend_from_slice(&[index.wrapping_add(0xA0); 65]);
    }
    out.extend_from_slice(&1_700_000_000u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&id.emitter_chain.0.to_be_bytes());
    out.extend_from_slice(&id.emitter_address);
    out.extend_from_slice(&id.sequence.to_be_bytes());
    out.push(15);
    out.extend_from_slice(payload);
    out
}
