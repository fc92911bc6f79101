// src/blockchain/services/name_service.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers_core::types::Address;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SPACE_ID_API_URL: &str = "https://api.prd.space.id";

/// Human-readable name to address.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>>;
}

#[derive(Deserialize)]
struct GetAddressResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    data: Option<String>,
}

/// Space ID resolver for `.bnb` names.
#[derive(Clone, Debug)]
pub struct SpaceIdResolver {
    http: reqwest::Client,
    api_url: String,
}

impl SpaceIdResolver {
    pub fn new(api_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for SpaceIdResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SPACE_ID_API_URL)
    }
}

#[async_trait]
impl NameResolver for SpaceIdResolver {
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>> {
        let domain = name.trim().trim_end_matches(".bnb");
        let url = format!("{}/v1/getAddress", self.api_url);
        debug!("Resolving {} via Space ID", name);
        let resp: GetAddressResponse = self
            .http
            .get(&url)
            .query(&[("tld", "bnb"), ("domain", domain)])
            .send()
            .await
            .context("Failed to call Space ID")?
            .error_for_status()
            .context("Space ID returned an error status")?
            .json()
            .await
            .context("Invalid Space ID response")?;

        if resp.code != 0 {
            return Ok(None);
        }
        Ok(resp
            .data
            .and_then(|raw| Address::from_str(&raw).ok())
            .filter(|addr| !addr.is_zero()))
    }
}
