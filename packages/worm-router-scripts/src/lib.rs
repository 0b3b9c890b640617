//! WormRouter deployment scripts and live tests
//!
//! The `worm-router` binary wraps these modules; they are also usable from
//! other tooling that wants to deploy or exercise WormRouter contracts.

use alloy::primitives::B256;
use std::fmt;
use std::time::{Duration, Instant};

use worm_router_rs::WormholeChainId;

pub mod config;
pub mod deploy;
pub mod deployed;
pub mod tests;
pub mod utils;

pub use config::{ChainConfig, ScriptConfig};
pub use deploy::{deploy_mock_token, deploy_token_bridge_helpers, deploy_worm_router};
pub use deployed::DeployedAddresses;
pub use tests::{run_all_tests, run_quick_tests, run_single_test, LiveTestOptions, TestContext};

/// Outcome of one live test
#[derive(Debug, Clone)]
pub enum TestResult {
    Pass {
        name: String,
        duration: Duration,
    },
    Fail {
        name: String,
        error: String,
        /// Chain the failing call went to, when known
        chain: Option<WormholeChainId>,
        /// Last transaction sent before the failure
        tx: Option<B256>,
        duration: Duration,
    },
    Skip {
        name: String,
        reason: String,
    },
}

impl TestResult {
    pub fn pass(name: impl Into<String>, duration: Duration) -> Self {
        Self::Pass {
            name: name.into(),
            duration,
        }
    }

    pub fn fail(name: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self::Fail {
            name: name.into(),
            error: error.into(),
            chain: None,
            tx: None,
            duration,
        }
    }

    pub fn skip(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Skip {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Attach the chain a failure happened on; no-op for other outcomes
    pub fn on_chain(mut self, chain_id: WormholeChainId) -> Self {
        if let Self::Fail { chain, .. } = &mut self {
            *chain = Some(chain_id);
        }
        self
    }

    /// Attach the transaction a failure followed; no-op for other outcomes
    pub fn with_tx(mut self, hash: B256) -> Self {
        if let Self::Fail { tx, .. } = &mut self {
            *tx = Some(hash);
        }
        self
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass { name, duration } => {
                write!(f, "\x1b[32mPASS\x1b[0m: {} ({:.2?})", name, duration)
            }
            Self::Fail {
                name,
                error,
                chain,
                tx,
                duration,
            } => {
                write!(f, "\x1b[31mFAIL\x1b[0m: {}", name)?;
                if let Some(chain) = chain {
                    write!(f, " [chain {}]", chain)?;
                }
                write!(f, " - {}", error)?;
                if let Some(tx) = tx {
                    write!(f, "\n    last tx {}", tx)?;
                }
                write!(f, "\n    ({:.2?})", duration)
            }
            Self::Skip { name, reason } => {
                write!(f, "\x1b[33mSKIP\x1b[0m: {} - {}", name, reason)
            }
        }
    }
}

/// Collects the results of one `run` and prints the summary
#[derive(Debug, Clone)]
pub struct TestSuite {
    name: String,
    results: Vec<TestResult>,
    started: Instant,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn add_result(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_fail()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.len() - self.passed() - self.failed()
    }

    pub fn print_summary(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Test Suite: {}", self.name)?;
        writeln!(f, "----------------------------------------")?;
        for result in &self.results {
            writeln!(f, "  {}", result)?;
        }
        writeln!(f, "----------------------------------------")?;
        writeln!(
            f,
            "Passed: \x1b[32m{}\x1b[0m  Failed: \x1b[31m{}\x1b[0m  Skipped: \x1b[33m{}\x1b[0m  ({:.2?})",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.started.elapsed()
        )
    }
}

#[cfg(test)]
mod test_result_tests {
    use super::*;

    #[test]
    fn test_suite_counts() {
        let mut suite = TestSuite::new("WormRouter");
        suite.add_result(TestResult::pass("a", Duration::from_millis(5)));
        suite.add_result(TestResult::fail("b", "boom", Duration::from_millis(5)));
        suite.add_result(TestResult::skip("c", "not deployed"));

        assert_eq!(suite.passed(), 1);
        assert_eq!(suite.failed(), 1);
        assert_eq!(suite.skipped(), 1);

        let summary = suite.to_string();
        assert!(summary.contains("Test Suite: WormRouter"));
        assert!(summary.contains("SKIP\x1b[0m: c - not deployed"));
    }

    #[test]
    fn test_failure_carries_chain_and_tx() {
        let tx = B256::repeat_byte(0xab);
        let fail = TestResult::fail("token_transfer_round_trip", "delivery timed out", Duration::ZERO)
            .on_chain(WormholeChainId::CELO)
            .with_tx(tx);

        let shown = fail.to_string();
        assert!(shown.contains("token_transfer_round_trip [chain 14] - delivery timed out"));
        assert!(shown.contains(&format!("last tx {}", tx)));
    }

    #[test]
    fn test_chain_and_tx_ignored_on_pass() {
        let pass = TestResult::pass("chain_connectivity", Duration::from_millis(1500))
            .on_chain(WormholeChainId::AVALANCHE)
            .with_tx(B256::ZERO);
        assert!(pass.is_pass());
        assert_eq!(pass.to_string(), "\x1b[32mPASS\x1b[0m: chain_connectivity (1.50s)");
    }
}
