//! Connectivity tests
//!
//! Every configured chain must answer RPC calls with the signing wallet.

use eyre::{eyre, Result};
use std::time::{Duration, Instant};

use worm_router_rs::evm::tokens::format_ether;

use super::TestContext;
use crate::config::ChainConfig;
use crate::utils::retry_rpc;
use crate::TestResult;

const RPC_ATTEMPTS: u32 = 3;
const RPC_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Test that every configured RPC answers and its wallet can pay gas
///
/// A zero native balance only warns; deployments and transfers will fail
/// later with a clearer error.
pub async fn test_chain_connectivity(ctx: &TestContext) -> TestResult {
    let start = Instant::now();
    let name = "chain_connectivity";

    if ctx.config.chains.is_empty() {
        return TestResult::skip(name, "no chains configured");
    }

    for chain in &ctx.config.chains {
        if let Err(e) = check_chain(ctx, chain).await {
            return TestResult::fail(name, format!("{}: {:#}", chain.description, e), start.elapsed())
                .on_chain(chain.chain_id);
        }
    }
    TestResult::pass(name, start.elapsed())
}

async fn check_chain(ctx: &TestContext, chain: &ChainConfig) -> Result<()> {
    let wallet = ctx.config.wallet(chain.chain_id)?;

    let block = retry_rpc(chain.chain_id, "eth_blockNumber", RPC_ATTEMPTS, RPC_RETRY_DELAY, || {
        wallet.block_number()
    })
    .await?;
    let balance = retry_rpc(chain.chain_id, "eth_getBalance", RPC_ATTEMPTS, RPC_RETRY_DELAY, || {
        wallet.native_balance()
    })
    .await?;

    if !wallet.has_code(chain.contracts.token_bridge).await? {
        return Err(eyre!(
            "no Token Bridge code at {}",
            chain.contracts.token_bridge
        ));
    }

    if balance.is_zero() {
        tracing::warn!(
            chain = %chain.chain_id,
            wallet = %wallet.address(),
            "Wallet has no native balance"
        );
    }
    tracing::info!(
        chain = %chain.chain_id,
        block,
        balance = %format_ether(balance),
        "{} connected",
        chain.description
    );
    Ok(())
}
