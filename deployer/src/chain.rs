use alloy::{
    network::TransactionBuilder,
    primitives::{Address, B256, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use blockchain::ChainClient;
use crypto::Identity;
use log::info;

use crate::error::TxError;

/// The two chain operations provisioning needs. Both wait for the receipt
/// and fail on revert.
#[async_trait]
pub trait DeployChain: Send + Sync {
    async fn deploy(&self, label: &str, creation_code: Bytes) -> Result<Address, TxError>;

    async fn send(&self, label: &str, to: Address, calldata: Bytes) -> Result<B256, TxError>;
}

pub struct ProviderChain {
    provider: DynProvider,
}

impl ProviderChain {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// Signing provider for the endpoint of an already probed client.
    pub async fn connect(client: &ChainClient, identity: &Identity) -> Result<Self, TxError> {
        let provider = ProviderBuilder::new()
            .wallet(identity.wallet())
            .connect(client.endpoint().as_str())
            .await?
            .erased();
        Ok(Self::new(provider))
    }

    async fn submit(&self, label: &str, tx: TransactionRequest) -> Result<(B256, Option<Address>), TxError> {
        let receipt = self.provider.send_transaction(tx).await?.get_receipt().await?;
        if !receipt.status() {
            return Err(TxError::Reverted(receipt.transaction_hash));
        }
        info!(
            "{label} confirmed in tx {:?} (block {:?})",
            receipt.transaction_hash, receipt.block_number
        );
        Ok((receipt.transaction_hash, receipt.contract_address))
    }
}

#[async_trait]
impl DeployChain for ProviderChain {
    async fn deploy(&self, label: &str, creation_code: Bytes) -> Result<Address, TxError> {
        let tx = TransactionRequest::default().with_deploy_code(creation_code);
        let (tx_hash, address) = self.submit(label, tx).await?;
        address.ok_or(TxError::NoContractAddress(tx_hash))
    }

    async fn send(&self, label: &str, to: Address, calldata: Bytes) -> Result<B256, TxError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        let (tx_hash, _) = self.submit(label, tx).await?;
        Ok(tx_hash)
    }
}
