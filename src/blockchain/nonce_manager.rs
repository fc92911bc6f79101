// src/blockchain/nonce_manager.rs

use crate::blockchain::models::ChainError;
use crate::blockchain::services::transactions::{parse_quantity, rpc_request};
use dashmap::DashMap;
use ethers_core::types::{Address, U256};
use reqwest::Client;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

type Slot = Arc<Mutex<Option<U256>>>;

/// Hands out sequential nonces per (chain id, sender).
///
/// The first reservation for a sender reads the pending transaction count;
/// later ones increment the cached value under the slot's lock, so concurrent
/// sends on one chain never reuse a nonce.
#[derive(Debug, Clone, Default)]
pub struct NonceManager {
    slots: Arc<DashMap<(u64, Address), Slot>>,
}

impl NonceManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, chain_id: u64, sender: Address) -> Slot {
        self.slots.entry((chain_id, sender)).or_default().clone()
    }

    /// Reserves the next nonce, calling `fetch` only when nothing is cached.
    pub async fn reserve_with<F, Fut>(&self, chain_id: u64, sender: Address, fetch: F) -> Result<U256, ChainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<U256, ChainError>>,
    {
        let slot = self.slot(chain_id, sender);
        let mut next = slot.lock().await;
        let nonce = match *next {
            Some(cached) => cached,
            None => {
                let fetched = fetch().await?;
                debug!("nonce for {:?} on chain {} starts at {}", sender, chain_id, fetched);
                fetched
            }
        };
        *next = Some(nonce + U256::one());
        Ok(nonce)
    }

    /// Reserves the next nonce, seeding from `eth_getTransactionCount(pending)`.
    pub async fn get_next_nonce(
        &self,
        client: &Client,
        rpc_url: &str,
        chain_id: u64,
        sender: Address,
    ) -> Result<U256, ChainError> {
        self.reserve_with(chain_id, sender, || async move {
            let count = rpc_request(
                client,
                rpc_url,
                "eth_getTransactionCount",
                json!([format!("{:?}", sender), "pending"]),
            )
            .await?;
            parse_quantity(&count, "nonce")
        })
        .await
    }

    /// Forgets the cached nonce after a send that never reached the mempool.
    pub async fn reset(&self, chain_id: u64, sender: Address) {
        let slot = self.slots.get(&(chain_id, sender)).map(|s| s.value().clone());
        if let Some(slot) = slot {
            *slot.lock().await = None;
        }
    }
}
