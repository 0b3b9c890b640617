//! ERC20 Token Helpers
//!
//! Balance queries, approvals and human-readable formatting for the test token.

use alloy::primitives::{utils::format_units, Address, B256, U256};
use eyre::{eyre, Result};
use tracing::info;

use crate::evm::client::ChainWallet;
use crate::evm::contracts::{ERC20Mock, IERC20};

/// ERC20 balance of `account`
pub async fn balance_of(wallet: &ChainWallet, token: Address, account: Address) -> Result<U256> {
    IERC20::new(token, wallet.provider())
        .balanceOf(account)
        .call()
        .await
        .map_err(|e| eyre!("Failed to get balance of {} on {}: {}", account, token, e))
}

pub async fn decimals(wallet: &ChainWallet, token: Address) -> Result<u8> {
    IERC20::new(token, wallet.provider())
        .decimals()
        .call()
        .await
        .map_err(|e| eyre!("Failed to get decimals of {}: {}", token, e))
}

/// Approve `spender` and wait for the receipt
pub async fn approve(
    wallet: &ChainWallet,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<B256> {
    let receipt = IERC20::new(token, wallet.provider())
        .approve(spender, amount)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send approve: {}", e))?
        .get_receipt()
        .await
        .map_err(|e| eyre!("Failed to get approve receipt: {}", e))?;

    if !receipt.status() {
        return Err(eyre!("ERC20 approve transaction reverted"));
    }

    info!(
        chain = %wallet.chain(),
        token = %token,
        spender = %spender,
        amount = %amount,
        "Approved token spend"
    );
    Ok(receipt.transaction_hash)
}

/// Mint mock tokens to `to` and wait for the receipt
pub async fn mint(wallet: &ChainWallet, token: Address, to: Address, amount: U256) -> Result<B256> {
    let receipt = ERC20Mock::new(token, wallet.provider())
        .mint(to, amount)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send mint: {}", e))?
        .get_receipt()
        .await
        .map_err(|e| eyre!("Failed to get mint receipt: {}", e))?;

    if !receipt.status() {
        return Err(eyre!("ERC20Mock mint transaction reverted"));
    }
    Ok(receipt.transaction_hash)
}

/// Format a raw token amount with `decimals` places
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}

/// Format wei as ether (18 decimals)
pub fn format_ether(amount: U256) -> String {
    format_token_amount(amount, 18)
}
