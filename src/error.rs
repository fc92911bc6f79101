// src/error.rs

use crate::blockchain::{models::ChainError, registry::RegistryError};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Every failure an action can end in. `kind()` gives the stable category
/// name reported to the host; `Display` keeps the underlying detail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),
    #[error("unsupported bridge direction: {from} -> {to}")]
    UnsupportedDirection { from: String, to: String },
    #[error("token symbol lookup is not supported on chain {0}")]
    UnsupportedLookupChain(String),
    #[error("token not found: {0}")]
    TokenNotFound(String),
    #[error("invalid address: {0}")]
    AddressInvalid(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("no route found: {0}")]
    NoRouteFound(String),
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
    #[error("deployment failed: {0}")]
    DeploymentFailed(String),
    #[error("compilation failed: {0}")]
    CompilationFailed(String),
    #[error("timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(String),
    #[error("faucet did not answer within {0:?}")]
    FaucetTimeout(Duration),
    #[error("external service error: {0}")]
    ExternalService(String),
    #[error("chain error: {0}")]
    Chain(String),
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        ActionError::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Validation(_) => "ValidationError",
            ActionError::InvalidAmount(_) => "InvalidAmount",
            ActionError::UnsupportedChain(_) => "UnsupportedChain",
            ActionError::UnsupportedDirection { .. } => "UnsupportedDirection",
            ActionError::UnsupportedLookupChain(_) => "UnsupportedLookupChain",
            ActionError::TokenNotFound(_) => "TokenNotFound",
            ActionError::AddressInvalid(_) => "AddressInvalid",
            ActionError::InsufficientFunds(_) => "InsufficientFunds",
            ActionError::Rejected(_) => "Rejected",
            ActionError::NoRouteFound(_) => "NoRouteFound",
            ActionError::TransactionFailed(_) => "TransactionFailed",
            ActionError::DeploymentFailed(_) => "DeploymentFailed",
            ActionError::CompilationFailed(_) => "CompilationFailed",
            ActionError::ConfirmationTimeout(_) => "ConfirmationTimeout",
            ActionError::FaucetTimeout(_) => "FaucetTimeout",
            ActionError::ExternalService(_) => "ExternalServiceError",
            ActionError::Chain(_) => "ChainError",
        }
    }

    /// Friendly text layered over the raw error for the chat surface.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::InsufficientFunds(_) => {
                "Insufficient funds to cover the amount plus gas fees.".to_string()
            }
            ActionError::Rejected(_) => "The transaction was rejected by the wallet or node.".to_string(),
            ActionError::NoRouteFound(_) => {
                "No swap route is available for this token pair and amount.".to_string()
            }
            ActionError::ConfirmationTimeout(hash) => format!(
                "Transaction {} was sent but not confirmed in time; check the explorer before retrying.",
                hash
            ),
            ActionError::FaucetTimeout(_) => {
                "The faucet did not respond in time. Please try again later.".to_string()
            }
            ActionError::UnsupportedLookupChain(chain) => format!(
                "Token symbols can only be looked up on bsc; pass a token contract address for {}.",
                chain
            ),
            other => {
                let text = other.to_string();
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => text,
                }
            }
        }
    }

    /// Structured diagnostic payload; the raw text is always preserved.
    pub fn to_content(&self, context: Value) -> Value {
        let mut content = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let (Value::Object(target), Value::Object(extra)) = (&mut content, context) {
            for (key, value) in extra {
                target.entry(key).or_insert(value);
            }
        }
        content
    }
}

impl From<ChainError> for ActionError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InsufficientFunds(m) => ActionError::InsufficientFunds(m),
            ChainError::Rejected(m) => ActionError::Rejected(m),
            ChainError::Reverted(m) => ActionError::TransactionFailed(format!("execution reverted: {}", m)),
            ChainError::Rpc(m) | ChainError::Transport(m) => ActionError::Chain(m),
        }
    }
}

impl From<RegistryError> for ActionError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownChain(name) => ActionError::UnsupportedChain(name),
            invalid @ RegistryError::InvalidRpcUrl { .. } => ActionError::Validation(invalid.to_string()),
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
