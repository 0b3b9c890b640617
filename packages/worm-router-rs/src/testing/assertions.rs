//! Common Test Assertions
//!
//! Assertion helpers for live relay tests. They return `Result` so a failed
//! check becomes a `TestResult::Fail` instead of a panic.

use alloy::primitives::U256;
use eyre::{eyre, Result};

/// Assert that a balance grew by exactly `expected`
///
/// The Token Bridge truncates to 8 decimals, so a round trip of an amount
/// that is a multiple of the truncation unit must arrive unchanged.
pub fn assert_balance_increased_by(before: U256, after: U256, expected: U256) -> Result<()> {
    if after < before {
        return Err(eyre!(
            "Balance decreased: before {}, after {} (expected +{})",
            before,
            after,
            expected
        ));
    }
    let delta = after - before;
    if delta != expected {
        return Err(eyre!(
            "Balance increase mismatch: expected {}, got {} (before: {}, after: {})",
            expected,
            delta,
            before,
            after
        ));
    }
    Ok(())
}

/// Wait for a condition to be true, with timeout and polling
pub async fn wait_for_condition<F, Fut>(
    condition_name: &str,
    check_fn: F,
    timeout: std::time::Duration,
    poll_interval: std::time::Duration,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<bool>>,
{
    let start = std::time::Instant::now();

    loop {
        match check_fn().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Error checking condition {}", condition_name);
            }
        }

        if start.elapsed() >= timeout {
            return Err(eyre!(
                "Timeout waiting for condition '{}' after {:?}",
                condition_name,
                timeout
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[test]
    fn test_assert_balance_increased_by() {
        let before = U256::from(1_000u64);
        assert!(assert_balance_increased_by(before, U256::from(2_000u64), U256::from(1_000u64)).is_ok());
        assert!(assert_balance_increased_by(before, U256::from(1_999u64), U256::from(1_000u64)).is_err());
        assert!(assert_balance_increased_by(before, U256::from(500u64), U256::from(1_000u64)).is_err());
    }

    #[tokio::test]
    async fn test_wait_for_condition_eventually_true() {
        let polls = AtomicU32::new(0);
        let result = wait_for_condition(
            "third poll",
            || async { Ok(polls.fetch_add(1, Ordering::SeqCst) >= 2) },
            Duration::from_secs(1),
            Duration::from_millis(1),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_for_condition_times_out() {
        let result = wait_for_condition(
            "never",
            || async { Ok(false) },
            Duration::from_millis(5),
            Duration::from_millis(1),
        )
        .await;
        assert!(result.is_err());
    }
}
