//! Relayed Token Transfers
//!
//! A WormRouter transfer is two transactions on the source chain:
//!
//! 1. `transferTokens` on the Token Bridge, which publishes a transfer VAA
//! 2. `sendVaasToEvm` on the Wormhole Relayer, asking it to deliver that VAA
//!    to the target chain's WormRouter together with a [`RouterPayload`]
//!    telling the router to call `completeTransfer` on the target Token Bridge
//!
//! This module also covers token attestation, which has to happen once per
//! token before the target chain has a wrapped asset to receive into.

use alloy::{
    primitives::{Address, Bytes, FixedBytes, B256, U256},
    sol_types::{sol_data, SolCall, SolType},
};
use eyre::{eyre, Result, WrapErr};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::address::{evm_to_bytes32, evm_to_universal};
use crate::chains::{WormholeChainId, WormholeContracts};
use crate::evm::client::ChainWallet;
use crate::evm::contracts::{ITokenBridge, IWormhole, IWormholeRelayer};
use crate::evm::events::parse_sequence_from_logs;
use crate::vaa::{fetch_signed_vaa_with_retry, VaaId, VaaSource};

/// Gas forwarded to the WormRouter on delivery
pub const RELAY_GAS_LIMIT: u64 = 150_000;

/// Native value forwarded to the WormRouter on delivery
pub const RECEIVER_VALUE: u64 = 0;

/// WormRouter action: call `target` with the delivered VAA
pub const COMPLETE_TRANSFER_ACTION: u8 = 1;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("payment {payment} does not cover relay cost {cost}")]
    InsufficientPayment { payment: U256, cost: U256 },

    #[error("transfer amount is zero")]
    ZeroAmount,

    #[error("{action} reverted (tx {tx})")]
    Reverted { action: &'static str, tx: B256 },
}

/// Refuse a transfer whose payment is below the relay quote
pub fn ensure_payment_covers(payment: U256, cost: U256) -> Result<(), RelayError> {
    if payment < cost {
        return Err(RelayError::InsufficientPayment { payment, cost });
    }
    Ok(())
}

// ============================================================================
// Router Payload
// ============================================================================

/// `(uint8 action, address target, bytes4 selector)`
type RouterPayloadParams = (sol_data::Uint<8>, sol_data::Address, sol_data::FixedBytes<4>);

/// Instruction delivered to the WormRouter with the Token Bridge VAA
///
/// Encoded as `abi.encode(uint8 action, address target, bytes4 selector)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterPayload {
    pub action: u8,
    pub target: Address,
    pub selector: [u8; 4],
}

impl RouterPayload {
    /// Redeem the delivered VAA on `token_bridge`
    pub fn complete_transfer(token_bridge: Address) -> Self {
        Self {
            action: COMPLETE_TRANSFER_ACTION,
            target: token_bridge,
            selector: ITokenBridge::completeTransferCall::SELECTOR,
        }
    }

    pub fn abi_encode(&self) -> Bytes {
        RouterPayloadParams::abi_encode_params(&(
            self.action,
            self.target,
            FixedBytes::<4>::from(self.selector),
        ))
        .into()
    }

    pub fn abi_decode(data: &[u8]) -> Result<Self> {
        let (action, target, selector) = RouterPayloadParams::abi_decode_params(data)
            .map_err(|e| eyre!("Invalid router payload: {}", e))?;
        Ok(Self {
            action,
            target,
            selector: selector.0,
        })
    }
}

// ============================================================================
// Amounts
// ============================================================================

/// Pseudo-random transfer amount derived from a millisecond timestamp
///
/// Always a multiple of 10^10, so an 18-decimal token survives the Token
/// Bridge's truncation to 8 decimals unchanged.
pub fn transfer_amount_from_millis(now_ms: u64) -> U256 {
    U256::from(now_ms % 10_000_000) * U256::from(10_000_000_000u64)
}

// ============================================================================
// Transfers
// ============================================================================

/// Relay quote for delivering a transfer VAA to `target_chain`
pub async fn transfer_token_cost(
    wallet: &ChainWallet,
    relayer: Address,
    target_chain: WormholeChainId,
) -> Result<U256> {
    let quote = IWormholeRelayer::new(relayer, wallet.provider())
        .quoteEVMDeliveryPrice(
            target_chain.to_u16(),
            U256::from(RECEIVER_VALUE),
            U256::from(RELAY_GAS_LIMIT),
        )
        .call()
        .await
        .wrap_err_with(|| format!("Failed to quote delivery to chain {}", target_chain))?;

    debug!(
        source = %wallet.chain(),
        target = %target_chain,
        price = %quote.nativePriceQuote,
        "Quoted delivery price"
    );
    Ok(quote.nativePriceQuote)
}

/// Everything needed to move `amount` of `token` to `recipient` on `target_chain`
#[derive(Debug, Clone)]
pub struct TransferRequest<'a> {
    pub wallet: &'a ChainWallet,
    /// Wormhole contracts on the source chain
    pub source: WormholeContracts,
    pub target_chain: WormholeChainId,
    pub target_token_bridge: Address,
    pub target_worm_router: Address,
    pub token: Address,
    pub amount: U256,
    pub recipient: Address,
    /// Native value the caller is willing to pay for delivery
    pub payment: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub bridge_tx: B256,
    pub relay_tx: B256,
    /// Sequence of the Token Bridge VAA
    pub sequence: u64,
    /// Price actually paid to the relayer
    pub price: U256,
}

/// A `sendVaasToEvm` call and the native value sent with it
pub struct RelayCall {
    pub call: IWormholeRelayer::sendVaasToEvmCall,
    pub value: U256,
}

/// Relay request for the Token Bridge VAA `sequence` published by `request`
///
/// The VAA is keyed by the source chain and the source Token Bridge. It is
/// delivered to the target WormRouter, which redeems it on the target Token
/// Bridge. `price` is attached as value, whatever the caller offered.
pub fn relay_call(request: &TransferRequest<'_>, sequence: u64, price: U256) -> RelayCall {
    let vaa_key = IWormholeRelayer::VaaKey {
        chainId: request.wallet.chain().to_u16(),
        emitterAddress: evm_to_bytes32(request.source.token_bridge),
        sequence,
    };
    RelayCall {
        call: IWormholeRelayer::sendVaasToEvmCall {
            targetChain: request.target_chain.to_u16(),
            targetAddress: request.target_worm_router,
            payload: RouterPayload::complete_transfer(request.target_token_bridge).abi_encode(),
            receiverValue: U256::from(RECEIVER_VALUE),
            gasLimit: U256::from(RELAY_GAS_LIMIT),
            vaaKeys: vec![vaa_key],
        },
        value: price,
    }
}

/// Send a relayed token transfer
///
/// The source Token Bridge must already be approved for `amount`.
pub async fn transfer_token(request: &TransferRequest<'_>) -> Result<TransferReceipt> {
    let wallet = request.wallet;
    if request.amount.is_zero() {
        return Err(RelayError::ZeroAmount.into());
    }

    let cost = transfer_token_cost(wallet, request.source.relayer, request.target_chain).await?;
    ensure_payment_covers(request.payment, cost)?;

    let message_fee = IWormhole::new(request.source.core, wallet.provider())
        .messageFee()
        .call()
        .await
        .wrap_err("Failed to read core bridge message fee")?;

    let receipt = ITokenBridge::new(request.source.token_bridge, wallet.provider())
        .transferTokens(
            request.token,
            request.amount,
            request.target_chain.to_u16(),
            evm_to_bytes32(request.recipient),
            U256::ZERO,
            0,
        )
        .value(message_fee)
        .send()
        .await
        .wrap_err("Failed to send transferTokens")?
        .get_receipt()
        .await
        .wrap_err("Failed to get transferTokens receipt")?;

    if !receipt.status() {
        return Err(RelayError::Reverted {
            action: "transferTokens",
            tx: receipt.transaction_hash,
        }
        .into());
    }

    let sequence = parse_sequence_from_logs(receipt.inner.logs(), request.source.core)?;
    info!(
        chain = %wallet.chain(),
        tx = %receipt.transaction_hash,
        "Sequence number of Token Bridge VAA: {}",
        sequence
    );

    // Re-quote once the bridge tx is mined
    let price = transfer_token_cost(wallet, request.source.relayer, request.target_chain).await?;
    let RelayCall { call, value } = relay_call(request, sequence, price);

    let relay = IWormholeRelayer::new(request.source.relayer, wallet.provider())
        .sendVaasToEvm(
            call.targetChain,
            call.targetAddress,
            call.payload,
            call.receiverValue,
            call.gasLimit,
            call.vaaKeys,
        )
        .value(value)
        .send()
        .await
        .wrap_err("Failed to send sendVaasToEvm")?
        .get_receipt()
        .await
        .wrap_err("Failed to get sendVaasToEvm receipt")?;

    if !relay.status() {
        return Err(RelayError::Reverted {
            action: "sendVaasToEvm",
            tx: relay.transaction_hash,
        }
        .into());
    }

    info!(
        source = %wallet.chain(),
        target = %request.target_chain,
        router = %request.target_worm_router,
        relay_tx = %relay.transaction_hash,
        price = %price,
        "Requested relay of Token Bridge VAA"
    );

    Ok(TransferReceipt {
        bridge_tx: receipt.transaction_hash,
        relay_tx: relay.transaction_hash,
        sequence,
        price,
    })
}

// ============================================================================
// Attestation
// ============================================================================

/// An `attestToken` call whose AssetMeta VAA can be redeemed on other chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAttestation {
    pub token: Address,
    pub tx_hash: B256,
    pub vaa_id: VaaId,
}

impl TokenAttestation {
    /// Wait for the guardians to sign the AssetMeta VAA
    pub async fn fetch_vaa<S>(&self, source: &S, attempts: u32, interval: Duration) -> Result<Bytes>
    where
        S: VaaSource + ?Sized,
    {
        fetch_signed_vaa_with_retry(source, &self.vaa_id, attempts, interval).await
    }
}

/// Publish an AssetMeta VAA for `token` from the wallet's chain
pub async fn attest_token(
    wallet: &ChainWallet,
    contracts: &WormholeContracts,
    token: Address,
) -> Result<TokenAttestation> {
    let message_fee = IWormhole::new(contracts.core, wallet.provider())
        .messageFee()
        .call()
        .await
        .wrap_err("Failed to read core bridge message fee")?;

    let receipt = ITokenBridge::new(contracts.token_bridge, wallet.provider())
        .attestToken(token, 0)
        .value(message_fee)
        .send()
        .await
        .wrap_err("Failed to send attestToken")?
        .get_receipt()
        .await
        .wrap_err("Failed to get attestToken receipt")?;

    if !receipt.status() {
        return Err(RelayError::Reverted {
            action: "attestToken",
            tx: receipt.transaction_hash,
        }
        .into());
    }

    let sequence = parse_sequence_from_logs(receipt.inner.logs(), contracts.core)?;
    let vaa_id = VaaId::new(
        wallet.chain(),
        evm_to_universal(contracts.token_bridge),
        sequence,
    );
    info!(chain = %wallet.chain(), token = %token, vaa = %vaa_id, "Attested token");

    Ok(TokenAttestation {
        token,
        tx_hash: receipt.transaction_hash,
        vaa_id,
    })
}

/// Wrapped address of a foreign token on the wallet's chain, if attested
pub async fn wrapped_asset(
    wallet: &ChainWallet,
    token_bridge: Address,
    origin_chain: WormholeChainId,
    origin_token: Address,
) -> Result<Option<Address>> {
    let wrapped = ITokenBridge::new(token_bridge, wallet.provider())
        .wrappedAsset(origin_chain.to_u16(), evm_to_bytes32(origin_token))
        .call()
        .await
        .wrap_err("Failed to query wrappedAsset")?;
    Ok((!wrapped.is_zero()).then_some(wrapped))
}

/// Redeem an AssetMeta VAA on the wallet's chain and return the wrapped token
///
/// Uses `updateWrapped` when the asset already exists there.
pub async fn create_or_update_wrapped(
    wallet: &ChainWallet,
    token_bridge: Address,
    attestation: &TokenAttestation,
    vaa: Bytes,
) -> Result<Address> {
    let origin = attestation.vaa_id.emitter_chain;
    let existing = wrapped_asset(wallet, token_bridge, origin, attestation.token).await?;
    let bridge = ITokenBridge::new(token_bridge, wallet.provider());

    let (action, pending) = if existing.is_some() {
        ("updateWrapped", bridge.updateWrapped(vaa).send().await)
    } else {
        ("createWrapped", bridge.createWrapped(vaa).send().await)
    };
    let receipt = pending
        .wrap_err_with(|| format!("Failed to send {}", action))?
        .get_receipt()
        .await
        .wrap_err_with(|| format!("Failed to get {} receipt", action))?;

    if !receipt.status() {
        return Err(RelayError::Reverted {
            action,
            tx: receipt.transaction_hash,
        }
        .into());
    }

    let wrapped = wrapped_asset(wallet, token_bridge, origin, attestation.token)
        .await?
        .ok_or_else(|| eyre!("{} succeeded but no wrapped asset is registered", action))?;
    info!(
        chain = %wallet.chain(),
        origin = %origin,
        token = %attestation.token,
        wrapped = %wrapped,
        "{} complete",
        action
    );
    Ok(wrapped)
}
