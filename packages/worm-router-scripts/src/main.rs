//! WormRouter CLI
//!
//! - `worm-router deploy-worm-router`          -> WormRouter on every configured chain
//! - `worm-router deploy-token-bridge-helpers` -> TokenBridgeHelpers on every configured chain
//! - `worm-router deploy-mock-token`           -> test ERC20, minted and attested everywhere
//! - `worm-router run`                         -> live tests

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use worm_router_rs::evm::tokens::format_ether;
use worm_router_rs::WormholeChainId;
use worm_router_scripts::{
    deploy_mock_token, deploy_token_bridge_helpers, deploy_worm_router, run_all_tests,
    run_quick_tests, run_single_test, DeployedAddresses, LiveTestOptions, ScriptConfig,
    TestContext, TestSuite,
};

#[derive(Parser)]
#[command(name = "worm-router")]
#[command(about = "Deploy and test WormRouter contracts on Wormhole chains", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Environment name; selects config/<env>.json and deployed/<env>.json
    #[arg(short, long, global = true, default_value = "testnet")]
    env: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy WormRouter to every configured chain
    #[command(alias = "deployWormRouter")]
    DeployWormRouter,

    /// Deploy TokenBridgeHelpers to every configured chain
    DeployTokenBridgeHelpers,

    /// Deploy a mock ERC20 on every chain and attest it to the others
    #[command(alias = "deployMockToken")]
    DeployMockToken,

    /// Run live tests
    Run {
        /// Run only a specific test
        #[arg(short, long)]
        test: Option<String>,

        /// Quick mode (connectivity tests only)
        #[arg(long)]
        quick: bool,

        /// Source Wormhole chain (id or name)
        #[arg(long, default_value = "6")]
        source: WormholeChainId,

        /// Target Wormhole chain (id or name)
        #[arg(long, default_value = "14")]
        target: WormholeChainId,

        /// Seconds to wait after the relay request before polling
        #[arg(long, default_value_t = 15)]
        wait_secs: u64,

        /// Seconds to wait for delivery
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },

    /// Show configured chains and deployed contracts
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ScriptConfig::load(&cli.env)?;
    let book_path = DeployedAddresses::path_for(&cli.env);

    match cli.command {
        Commands::DeployWormRouter => {
            tracing::info!("Deploying WormRouter to {} chains...", config.chains.len());
            deploy_worm_router(&config, &book_path).await?;
        }

        Commands::DeployTokenBridgeHelpers => {
            tracing::info!(
                "Deploying TokenBridgeHelpers to {} chains...",
                config.chains.len()
            );
            deploy_token_bridge_helpers(&config, &book_path).await?;
        }

        Commands::DeployMockToken => {
            tracing::info!("Deploying mock token to {} chains...", config.chains.len());
            let guardian = config.guardian()?;
            deploy_mock_token(&config, &book_path, &guardian).await?;
        }

        Commands::Run {
            test,
            quick,
            source,
            target,
            wait_secs,
            timeout_secs,
        } => {
            tracing::info!("Running live tests on {}...", config.env);

            let ctx = TestContext {
                deployed: DeployedAddresses::load(&book_path)?,
                config,
                options: LiveTestOptions {
                    source,
                    target,
                    initial_wait: Duration::from_secs(wait_secs),
                    delivery_timeout: Duration::from_secs(timeout_secs),
                    ..LiveTestOptions::default()
                },
            };

            let results = if quick {
                tracing::info!("Quick mode: connectivity tests only");
                run_quick_tests(&ctx).await
            } else if let Some(ref test_name) = test {
                tracing::info!("Running single test: {}", test_name);
                run_single_test(&ctx, test_name).await
            } else {
                run_all_tests(&ctx).await
            };

            let mut suite = TestSuite::new("WormRouter Live Tests");
            for result in results {
                suite.add_result(result);
            }

            suite.print_summary();

            if suite.failed() > 0 {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let deployed = DeployedAddresses::load(&book_path)?;
            println!();
            println!("Environment: {} ({})", config.env, config.network);
            println!("Artifacts:   {}", config.artifacts_dir.display());
            println!("Deployed:    {}", book_path.display());
            println!();

            for chain in &config.chains {
                println!("{} (chain {})", chain.description, chain.chain_id);
                println!("  RPC:          {}", chain.rpc_url);
                println!("  Core:         {}", chain.contracts.core);
                println!("  Token Bridge: {}", chain.contracts.token_bridge);
                println!("  Relayer:      {}", chain.contracts.relayer);

                match config.wallet(chain.chain_id) {
                    Ok(wallet) => match (wallet.block_number().await, wallet.native_balance().await) {
                        (Ok(block), Ok(balance)) => println!(
                            "  \x1b[32m●\x1b[0m block {}, wallet {} holds {}",
                            block,
                            wallet.address(),
                            format_ether(balance)
                        ),
                        _ => println!("  \x1b[31m●\x1b[0m RPC not responding"),
                    },
                    Err(e) => println!("  \x1b[33m●\x1b[0m no wallet: {}", e),
                }

                let show = |label: &str, value: Option<String>| {
                    println!("  {:<13} {}", label, value.unwrap_or_else(|| "-".to_string()));
                };
                show(
                    "WormRouter:",
                    deployed.worm_router.get(&chain.chain_id).map(|a| a.to_string()),
                );
                show(
                    "Helpers:",
                    deployed
                        .token_bridge_helpers
                        .get(&chain.chain_id)
                        .map(|a| a.to_string()),
                );
                show(
                    "Test tokens:",
                    deployed.erc20s.get(&chain.chain_id).map(|tokens| {
                        tokens
                            .iter()
                            .map(|a| a.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    }),
                );
                println!();
            }
        }
    }

    Ok(())
}
