// src/blockchain/services/transactions.rs

use crate::blockchain::{models::ChainError, nonce_manager::NonceManager};
use ethers_core::types::{TransactionRequest, H256, U256};
use ethers_signers::{LocalWallet, Signer};
use reqwest::Client;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::debug;

/// Posts one JSON-RPC request and returns its `result`, mapping any `error`
/// object through the node-message classifier.
pub async fn rpc_request(
    client: &Client,
    rpc_url: &str,
    method: &str,
    params: Value,
) -> Result<Value, ChainError> {
    debug!("rpc {} -> {}", method, rpc_url);
    let payload = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1,
    });

    let response: Value = client
        .post(rpc_url)
        .json(&payload)
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| match error.get("data").and_then(|d| d.as_str()) {
                Some(data) => format!("{} ({})", m, data),
                None => m.to_string(),
            })
            .unwrap_or_else(|| error.to_string());
        return Err(ChainError::from_rpc_message(message));
    }

    Ok(response.get("result").cloned().unwrap_or(Value::Null))
}

pub fn parse_quantity(value: &Value, what: &str) -> Result<U256, ChainError> {
    let hex = value
        .as_str()
        .ok_or_else(|| ChainError::Rpc(format!("missing {} in rpc response", what)))?;
    U256::from_str_radix(hex.trim_start_matches("0x"), 16)
        .map_err(|e| ChainError::Rpc(format!("invalid {} '{}': {}", what, hex, e)))
}

/// Fills gas, gas price and chain id, signs with `wallet` and broadcasts.
///
/// The nonce comes from the shared [`NonceManager`]; if anything fails before
/// the node accepts the raw transaction, the reservation is released.
pub async fn send_evm_transaction(
    client: &Client,
    rpc_url: &str,
    chain_id: u64,
    wallet: &LocalWallet,
    tx_request: TransactionRequest,
    nonce_manager: &NonceManager,
) -> Result<H256, ChainError> {
    let from = wallet.address();
    let nonce = nonce_manager
        .get_next_nonce(client, rpc_url, chain_id, from)
        .await?;

    let tx = tx_request.from(from).nonce(nonce).chain_id(chain_id);
    let sent = sign_and_broadcast(client, rpc_url, wallet, tx).await;
    if sent.is_err() {
        nonce_manager.reset(chain_id, from).await;
    }
    sent
}

async fn sign_and_broadcast(
    client: &Client,
    rpc_url: &str,
    wallet: &LocalWallet,
    mut tx: TransactionRequest,
) -> Result<H256, ChainError> {
    if tx.gas.is_none() {
        let call = serde_json::to_value(&tx)?;
        let gas = rpc_request(client, rpc_url, "eth_estimateGas", json!([call])).await?;
        tx = tx.gas(parse_quantity(&gas, "gas estimate")?);
    }
    if tx.gas_price.is_none() {
        let price = rpc_request(client, rpc_url, "eth_gasPrice", json!([])).await?;
        tx = tx.gas_price(parse_quantity(&price, "gasPrice")?);
    }

    let signature = wallet
        .sign_transaction(&tx.clone().into())
        .await
        .map_err(|e| ChainError::Rejected(format!("signing failed: {}", e)))?;
    let raw = tx.rlp_signed(&signature);

    let result = rpc_request(
        client,
        rpc_url,
        "eth_sendRawTransaction",
        json!([format!("0x{}", hex::encode(raw))]),
    )
    .await?;
    let hash = result
        .as_str()
        .ok_or_else(|| ChainError::Rpc("eth_sendRawTransaction returned no hash".into()))?;
    H256::from_str(hash).map_err(|e| ChainError::Rpc(format!("invalid tx hash '{}': {}", hash, e)))
}
