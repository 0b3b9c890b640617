//! Verified Action Approvals
//!
//! A VAA is the guardian-signed envelope around a message published through
//! the core bridge. The scripts never verify signatures (the destination
//! contracts do); they only need to fetch signed VAAs by id and read their
//! body fields.
//!
//! ## Wire Format (version 1)
//!
//! ```text
//! header: version u8 | guardian_set_index u32 | n u8 | n × (index u8, signature [u8; 65])
//! body:   timestamp u32 | nonce u32 | emitter_chain u16 | emitter_address [u8; 32]
//!         | sequence u64 | consistency_level u8 | payload ..
//! ```
//!
//! All integers are big-endian.

use alloy::primitives::{keccak256, Bytes, B256};
use async_trait::async_trait;
use base64::Engine;
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::chains::{Network, WormholeChainId};

const SIGNATURE_LEN: usize = 65;
const BODY_FIXED_LEN: usize = 4 + 4 + 2 + 32 + 8 + 1;

// ============================================================================
// VAA Identity
// ============================================================================

/// Emitter chain, emitter address and sequence: enough to look a VAA up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VaaId {
    pub emitter_chain: WormholeChainId,
    pub emitter_address: [u8; 32],
    pub sequence: u64,
}

impl VaaId {
    pub fn new(emitter_chain: WormholeChainId, emitter_address: [u8; 32], sequence: u64) -> Self {
        Self {
            emitter_chain,
            emitter_address,
            sequence,
        }
    }
}

impl fmt::Display for VaaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.emitter_chain,
            hex::encode(self.emitter_address),
            self.sequence
        )
    }
}

// ============================================================================
// Parsed VAA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianSignature {
    pub index: u8,
    pub signature: [u8; SIGNATURE_LEN],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vaa {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<GuardianSignature>,
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: WormholeChainId,
    pub emitter_address: [u8; 32],
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Bytes,
    body_offset: usize,
    raw: Bytes,
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(eyre!(
                "VAA truncated reading {} (need {} bytes at offset {}, have {})",
                what,
                n,
                self.pos,
                self.data.len()
            ));
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        let b = self.take(2, what)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self, what: &str) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, what)?);
        Ok(u64::from_be_bytes(buf))
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, what)?);
        Ok(buf)
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}

impl Vaa {
    /// Parse a signed VAA
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);

        let version = r.u8("version")?;
        if version != 1 {
            return Err(eyre!("Unsupported VAA version {}", version));
        }
        let guardian_set_index = r.u32("guardian set index")?;
        let count = r.u8("signature count")? as usize;

        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            let index = r.u8("signature index")?;
            let signature = r.array::<SIGNATURE_LEN>("signature")?;
            signatures.push(GuardianSignature { index, signature });
        }

        let body_offset = r.pos;
        if bytes.len() - body_offset < BODY_FIXED_LEN {
            return Err(eyre!(
                "VAA body too short: {} bytes, need at least {}",
                bytes.len() - body_offset,
                BODY_FIXED_LEN
            ));
        }

        let timestamp = r.u32("timestamp")?;
        let nonce = r.u32("nonce")?;
        let emitter_chain = WormholeChainId(r.u16("emitter chain")?);
        let emitter_address = r.array::<32>("emitter address")?;
        let sequence = r.u64("sequence")?;
        let consistency_level = r.u8("consistency level")?;
        let payload = Bytes::copy_from_slice(r.rest());

        Ok(Self {
            version,
            guardian_set_index,
            signatures,
            timestamp,
            nonce,
            emitter_chain,
            emitter_address,
            sequence,
            consistency_level,
            payload,
            body_offset,
            raw: Bytes::copy_from_slice(bytes),
        })
    }

    /// Id under which the guardian API serves this VAA
    pub fn id(&self) -> VaaId {
        VaaId::new(self.emitter_chain, self.emitter_address, self.sequence)
    }

    /// Raw body bytes (everything after the signatures)
    pub fn body(&self) -> &[u8] {
        &self.raw[self.body_offset..]
    }

    /// Double keccak of the body: the value guardians sign and contracts key replay protection on
    pub fn digest(&self) -> B256 {
        keccak256(keccak256(self.body()))
    }

    /// The signed VAA exactly as received
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }
}

// ============================================================================
// Fetching Signed VAAs
// ============================================================================

/// Somewhere signed VAAs can be fetched from
#[async_trait]
pub trait VaaSource: Send + Sync {
    /// `Ok(None)` while the guardians have not signed the VAA yet
    async fn fetch_signed_vaa(&self, id: &VaaId) -> Result<Option<Bytes>>;
}

#[derive(Debug, Deserialize)]
struct SignedVaaResponse {
    #[serde(rename = "vaaBytes")]
    vaa_bytes: String,
}

/// Guardian REST API client (Wormholescan-compatible `signed_vaa` endpoint)
#[derive(Debug, Clone)]
pub struct GuardianRpc {
    base_url: Url,
    client: reqwest::Client,
}

impl GuardianRpc {
    /// API rooted at `base_url`; a path prefix such as `/proxy` is kept
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Public API host for a network
    pub fn default_url(network: Network) -> &'static str {
        match network {
            Network::Mainnet => "https://api.wormholescan.io",
            Network::Testnet => "https://api.testnet.wormholescan.io",
            Network::Devnet => "http://localhost:7071",
        }
    }

    pub fn for_network(network: Network) -> Result<Self> {
        Ok(Self::new(Url::parse(Self::default_url(network))?))
    }

    /// Endpoint URL for a VAA id
    pub fn signed_vaa_url(&self, id: &VaaId) -> Result<Url> {
        let path = format!(
            "v1/signed_vaa/{}/{}/{}",
            id.emitter_chain,
            hex::encode(id.emitter_address),
            id.sequence
        );
        self.base_url
            .join(&path)
            .wrap_err_with(|| format!("Invalid guardian RPC URL {}", self.base_url))
    }
}

#[async_trait]
impl VaaSource for GuardianRpc {
    async fn fetch_signed_vaa(&self, id: &VaaId) -> Result<Option<Bytes>> {
        let url = self.signed_vaa_url(id)?;
        let response = self.client.get(url.clone()).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(eyre!(
                "Guardian RPC returned {} for {}",
                response.status(),
                url
            ));
        }

        let body: SignedVaaResponse = response.json().await?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body.vaa_bytes)
            .wrap_err("Guardian RPC returned invalid base64")?;
        Ok(Some(bytes.into()))
    }
}

/// Poll `source` until the VAA is signed, up to `attempts` times
pub async fn fetch_signed_vaa_with_retry<S>(
    source: &S,
    id: &VaaId,
    attempts: u32,
    interval: Duration,
) -> Result<Bytes>
where
    S: VaaSource + ?Sized,
{
    for attempt in 1..=attempts {
        match source.fetch_signed_vaa(id).await {
            Ok(Some(vaa)) => {
                info!(vaa = %id, attempt, "Fetched signed VAA");
                return Ok(vaa);
            }
            Ok(None) => debug!(vaa = %id, attempt, "VAA not signed yet"),
            Err(e) => debug!(vaa = %id, attempt, error = %e, "VAA fetch failed"),
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(eyre!(
        "Signed VAA {} not available after {} attempts",
        id,
        attempts
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_vaa_bytes, InMemoryVaaSource};

    fn sample_id() -> VaaId {
        VaaId::new(WormholeChainId::AVALANCHE, [0x11; 32], 77)
    }

    #[test]
    fn test_parse_round_trip_fields() {
        let bytes = sample_vaa_bytes(&sample_id(), 2, b"hello");
        let vaa = Vaa::parse(&bytes).unwrap();

        assert_eq!(vaa.version, 1);
        assert_eq!(vaa.signatures.len(), 2);
        assert_eq!(vaa.signatures[1].index, 1);
        assert_eq!(vaa.emitter_chain, WormholeChainId::AVALANCHE);
        assert_eq!(vaa.sequence, 77);
        assert_eq!(vaa.payload.as_ref(), b"hello");
        assert_eq!(vaa.id(), sample_id());
        assert_eq!(vaa.body().len(), BODY_FIXED_LEN + 5);
    }

    #[test]
    fn test_digest_is_double_keccak_of_body() {
        let bytes = sample_vaa_bytes(&sample_id(), 1, b"");
        let vaa = Vaa::parse(&bytes).unwrap();
        assert_eq!(vaa.digest(), keccak256(keccak256(vaa.body())));
    }

    #[test]
    fn test_truncated_vaa_rejected() {
        let bytes = sample_vaa_bytes(&sample_id(), 1, b"payload");
        assert!(Vaa::parse(&bytes[..10]).is_err());
        assert!(Vaa::parse(&bytes[..1 + 4 + 1 + 66 + 20]).is_err());
        assert!(Vaa::parse(&[]).is_err());
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut bytes = sample_vaa_bytes(&sample_id(), 0, b"");
        bytes[0] = 2;
        let err = Vaa::parse(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_vaa_id_display() {
        let id = VaaId::new(WormholeChainId(6), [0u8; 32], 12);
        assert_eq!(id.to_string(), format!("6/{}/12", "0".repeat(64)));
    }

    #[test]
    fn test_signed_vaa_url() {
        let rpc = GuardianRpc::for_network(Network::Testnet).unwrap();
        let url = rpc.signed_vaa_url(&sample_id()).unwrap();
        assert_eq!(
            url.as_str(),
            format!(
                "https://api.testnet.wormholescan.io/v1/signed_vaa/6/{}/77",
                "11".repeat(32)
            )
        );
    }

    #[test]
    fn test_signed_vaa_url_keeps_base_path() {
        let expected = format!(
            "https://guardian.example/proxy/v1/signed_vaa/6/{}/77",
            "11".repeat(32)
        );
        for base in ["https://guardian.example/proxy", "https://guardian.example/proxy/"] {
            let rpc = GuardianRpc::new(Url::parse(base).unwrap());
            assert_eq!(rpc.signed_vaa_url(&sample_id()).unwrap().as_str(), expected);
        }
    }

    #[tokio::test]
    async fn test_retry_waits_until_signed() {
        let id = sample_id();
        let vaa = sample_vaa_bytes(&id, 1, b"x");
        let source = InMemoryVaaSource::new().with_vaa_after(id, vaa.clone().into(), 2);

        let fetched = fetch_signed_vaa_with_retry(&source, &id, 5, Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(fetched.as_ref(), vaa.as_slice());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let source = InMemoryVaaSource::new();
        let result =
            fetch_signed_vaa_with_retry(&source, &sample_id(), 3, Duration::from_millis(1)).await;
        assert!(result.is_err());
        assert_eq!(source.calls(), 3);
    }
}
