// src/blockchain/models.rs
use ethers_core::abi::Abi;
use ethers_core::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

// --- Error types for chain operations ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("execution reverted: {0}")]
    Reverted(String),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ChainError {
    /// Classifies a node or wallet error message by the substrings clients report.
    pub fn from_rpc_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("insufficient funds")
            || lower.contains("insufficient balance")
            || lower.contains("exceeds balance")
        {
            ChainError::InsufficientFunds(message)
        } else if lower.contains("user rejected")
            || lower.contains("user denied")
            || lower.contains("rejected")
        {
            ChainError::Rejected(message)
        } else if lower.contains("revert") {
            ChainError::Reverted(message)
        } else {
            ChainError::Rpc(message)
        }
    }
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Rpc(format!("malformed rpc payload: {}", err))
    }
}

// --- Token Models ---

/// Token metadata as returned by the LI.FI token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    pub chain_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
}

// --- Transaction Models ---

/// Gas and payload overrides for a native value transfer.
#[derive(Debug, Clone, Default)]
pub struct TxOptions {
    pub gas_limit: Option<U256>,
    pub gas_price: Option<U256>,
    pub data: Option<Bytes>,
}

/// A transaction prepared by an external service, ready to be signed.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: Option<U256>,
}

// --- Swap Route Models ---

/// One route as returned by `/v1/advanced/routes`. Steps keep every field the
/// aggregator sent so they can be posted back verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub from_amount: String,
    pub to_amount: String,
    #[serde(default)]
    pub to_amount_min: Option<String>,
    pub steps: Vec<RouteStep>,
}

impl Route {
    pub fn to_amount_value(&self) -> U256 {
        U256::from_dec_str(&self.to_amount).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub id: String,
    pub tool: String,
    pub action: Value,
    pub estimate: Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RouteStep {
    pub fn from_token_address(&self) -> Option<Address> {
        self.action["fromToken"]["address"]
            .as_str()
            .and_then(|s| Address::from_str(s).ok())
    }

    pub fn from_amount(&self) -> Option<U256> {
        self.action["fromAmount"]
            .as_str()
            .and_then(|s| U256::from_dec_str(s).ok())
    }

    pub fn approval_address(&self) -> Option<Address> {
        self.estimate["approvalAddress"]
            .as_str()
            .and_then(|s| Address::from_str(s).ok())
    }
}

// --- Contract Models ---

/// Output of a single-contract compilation.
#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

/// A pending slisBNB withdrawal as stored by the stake manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub uuid: U256,
    pub amount_in_slis_bnb: U256,
    pub start_time: U256,
}
