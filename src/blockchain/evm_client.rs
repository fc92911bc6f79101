// src/blockchain/evm_client.rs

use crate::blockchain::{
    client::ChainRpc,
    models::ChainError,
    nonce_manager::NonceManager,
    registry::ChainDescriptor,
    services::transactions::{parse_quantity, rpc_request, send_evm_transaction},
};
use async_trait::async_trait;
use ethers::{
    signers::LocalWallet,
    types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U256},
};
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;

/// JSON-RPC client for EVM-compatible chains. The RPC endpoint comes from the
/// chain descriptor on every call, so one client serves every registered chain.
#[derive(Clone, Debug)]
pub struct EvmClient {
    http: reqwest::Client,
    nonce_manager: NonceManager,
}

impl Default for EvmClient {
    fn default() -> Self {
        Self::new(NonceManager::new())
    }
}

impl EvmClient {
    pub fn new(nonce_manager: NonceManager) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http,
            nonce_manager,
        }
    }

    fn call_object(tx: &TransactionRequest) -> Result<Value, ChainError> {
        Ok(serde_json::to_value(tx)?)
    }
}

#[async_trait]
impl ChainRpc for EvmClient {
    async fn balance(&self, chain: &ChainDescriptor, address: Address) -> Result<U256, ChainError> {
        let result = rpc_request(
            &self.http,
            &chain.rpc_url,
            "eth_getBalance",
            json!([format!("{:?}", address), "latest"]),
        )
        .await?;
        parse_quantity(&result, "balance")
    }

    async fn call(&self, chain: &ChainDescriptor, tx: &TransactionRequest) -> Result<Bytes, ChainError> {
        let result = rpc_request(
            &self.http,
            &chain.rpc_url,
            "eth_call",
            json!([Self::call_object(tx)?, "latest"]),
        )
        .await?;
        let hex_data = result
            .as_str()
            .ok_or_else(|| ChainError::Rpc("eth_call result not string".to_string()))?;
        Bytes::from_str(hex_data)
            .map_err(|e| ChainError::Rpc(format!("eth_call returned invalid hex: {}", e)))
    }

    async fn estimate_gas(
        &self,
        chain: &ChainDescriptor,
        tx: &TransactionRequest,
    ) -> Result<U256, ChainError> {
        let result = rpc_request(
            &self.http,
            &chain.rpc_url,
            "eth_estimateGas",
            json!([Self::call_object(tx)?]),
        )
        .await?;
        parse_quantity(&result, "gas estimate")
    }

    async fn gas_price(&self, chain: &ChainDescriptor) -> Result<U256, ChainError> {
        let result = rpc_request(&self.http, &chain.rpc_url, "eth_gasPrice", json!([])).await?;
        parse_quantity(&result, "gasPrice")
    }

    async fn send_transaction(
        &self,
        chain: &ChainDescriptor,
        wallet: &LocalWallet,
        tx: TransactionRequest,
    ) -> Result<H256, ChainError> {
        send_evm_transaction(
            &self.http,
            &chain.rpc_url,
            chain.id,
            wallet,
            tx,
            &self.nonce_manager,
        )
        .await
    }

    async fn transaction_receipt(
        &self,
        chain: &ChainDescriptor,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        let result = rpc_request(
            &self.http,
            &chain.rpc_url,
            "eth_getTransactionReceipt",
            json!([format!("{:?}", hash)]),
        )
        .await?;
        if result.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(result)?))
    }
}
