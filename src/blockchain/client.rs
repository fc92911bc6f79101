//! Blockchain client module for EVM-compatible networks.
//!
//! `ChainRpc` is the seam between the action layer and the node: reads,
//! simulation, signing and broadcast, and receipt lookup. `EvmClient` is the
//! JSON-RPC implementation; tests substitute an in-memory one.

use async_trait::async_trait;
use ethers::signers::LocalWallet;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U256};

pub use super::evm_client::EvmClient;
use crate::blockchain::{models::ChainError, registry::ChainDescriptor};

#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Native balance in wei.
    async fn balance(&self, chain: &ChainDescriptor, address: Address) -> Result<U256, ChainError>;

    /// `eth_call` against the latest block. Also used to simulate writes.
    async fn call(&self, chain: &ChainDescriptor, tx: &TransactionRequest) -> Result<Bytes, ChainError>;

    async fn estimate_gas(
        &self,
        chain: &ChainDescriptor,
        tx: &TransactionRequest,
    ) -> Result<U256, ChainError>;

    async fn gas_price(&self, chain: &ChainDescriptor) -> Result<U256, ChainError>;

    /// Fills nonce/gas/chain id, signs with `wallet` and broadcasts.
    async fn send_transaction(
        &self,
        chain: &ChainDescriptor,
        wallet: &LocalWallet,
        tx: TransactionRequest,
    ) -> Result<H256, ChainError>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(
        &self,
        chain: &ChainDescriptor,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, ChainError>;
}
