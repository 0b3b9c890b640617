//! RPC retry helper
//!
//! Public testnet endpoints drop requests now and then. Read-only calls are
//! retried a few times before a live test gives up on a chain.

use eyre::{eyre, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use worm_router_rs::WormholeChainId;

/// Longest pause between two attempts
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Pause before retry number `retry` (0-based): doubles from `first`, capped
pub fn retry_delay(first: Duration, retry: u32) -> Duration {
    first
        .saturating_mul(2u32.saturating_pow(retry))
        .min(MAX_RETRY_DELAY)
}

/// Run a read-only RPC call against `chain` up to `attempts` times
pub async fn retry_rpc<F, Fut, T>(
    chain: WormholeChainId,
    call: &str,
    attempts: u32,
    first_delay: Duration,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut retry = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if retry + 1 >= attempts => {
                return Err(eyre!(
                    "{} on chain {} failed after {} attempts: {}",
                    call,
                    chain,
                    attempts,
                    e
                ));
            }
            Err(e) => {
                let delay = retry_delay(first_delay, retry);
                warn!(chain = %chain, error = %e, "{} failed, retrying in {:?}", call, delay);
                tokio::time::sleep(delay).await;
                retry += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retry_delay_doubles_up_to_cap() {
        let first = Duration::from_millis(500);
        assert_eq!(retry_delay(first, 0), first);
        assert_eq!(retry_delay(first, 2), Duration::from_secs(2));
        assert_eq!(retry_delay(first, 5), MAX_RETRY_DELAY);
        assert_eq!(retry_delay(first, u32::MAX), MAX_RETRY_DELAY);
    }

    #[tokio::test]
    async fn test_retry_rpc_succeeds_after_dropped_requests() {
        let calls = AtomicU32::new(0);
        let block = retry_rpc(WormholeChainId::CELO, "eth_blockNumber", 5, Duration::from_millis(1), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                eyre::bail!("connection reset")
            }
            Ok(7u64)
        })
        .await
        .unwrap();
        assert_eq!(block, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_rpc_names_chain_when_giving_up() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_rpc(WormholeChainId::AVALANCHE, "eth_getBalance", 3, Duration::from_millis(1), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            eyre::bail!("503")
        })
        .await;
        let err = result.unwrap_err().to_string();
        assert_eq!(err, "eth_getBalance on chain 6 failed after 3 attempts: 503");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
