//! Contract deployment from compiled artifacts

use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use eyre::{eyre, Result, WrapErr};
use tracing::{debug, info};

use crate::evm::artifact::ContractArtifact;
use crate::evm::client::ChainWallet;

/// Result of a single contract deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedContract {
    pub address: Address,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

/// Deploy `artifact` with `args` and wait until the CREATE transaction is mined
pub async fn deploy_contract(
    wallet: &ChainWallet,
    artifact: &ContractArtifact,
    args: &[DynSolValue],
) -> Result<DeployedContract> {
    let code = artifact.deploy_code(args)?;
    debug!(
        contract = %artifact.name,
        chain = %wallet.chain(),
        code_len = code.len(),
        "Sending deployment transaction"
    );

    let tx = TransactionRequest::default().with_deploy_code(code);
    let receipt = wallet
        .provider()
        .send_transaction(tx)
        .await
        .wrap_err_with(|| format!("Failed to send {} deployment", artifact.name))?
        .get_receipt()
        .await
        .wrap_err_with(|| format!("Failed to get {} deployment receipt", artifact.name))?;

    if !receipt.status() {
        return Err(eyre!(
            "{} deployment reverted (tx {})",
            artifact.name,
            receipt.transaction_hash
        ));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        eyre!(
            "{} deployment receipt has no contract address (tx {})",
            artifact.name,
            receipt.transaction_hash
        )
    })?;

    info!(
        contract = %artifact.name,
        chain = %wallet.chain(),
        address = %address,
        tx = %receipt.transaction_hash,
        "Contract deployed"
    );

    Ok(DeployedContract {
        address,
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
    })
}
