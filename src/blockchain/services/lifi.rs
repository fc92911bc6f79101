// src/blockchain/services/lifi.rs
//
// LI.FI REST adapter: token symbol lookup and swap routing. The aggregator
// is never configured globally; every routing call carries its own
// `AggregatorConfig` so concurrent swaps cannot see each other's wallet.

use crate::blockchain::models::{PreparedTransaction, Route, RouteStep, TokenInfo};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, U256};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_LIFI_API_URL: &str = "https://li.quest";
pub const DEFAULT_INTEGRATOR: &str = "bnb-agent-actions";

/// Symbol to token metadata, scoped by chain id.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    async fn lookup(&self, chain_id: u64, symbol: &str) -> Result<Option<TokenInfo>>;
}

/// Route discovery and per-step transaction building.
#[async_trait]
pub trait RouteAggregator: Send + Sync {
    async fn routes(&self, config: &AggregatorConfig, request: &RoutesRequest) -> Result<Vec<Route>>;

    async fn step_transaction(
        &self,
        config: &AggregatorConfig,
        step: &RouteStep,
    ) -> Result<PreparedTransaction>;
}

/// Per-call aggregator settings: who is swapping, on which chain, under
/// which integrator tag.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    pub integrator: String,
    pub api_url: String,
    pub wallet: Address,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutesRequest {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub from_token_address: String,
    pub to_token_address: String,
    pub from_amount: String,
    pub from_address: String,
    pub options: RouteOptions,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    pub slippage: f64,
    pub integrator: String,
    pub order: String,
}

#[derive(Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepWithTransaction {
    transaction_request: Option<TransactionRequestPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRequestPayload {
    to: String,
    data: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    gas_limit: Option<String>,
}

fn parse_hex_or_dec(raw: &str) -> Result<U256> {
    match raw.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| anyhow!("bad hex quantity {}: {}", raw, e)),
        None => U256::from_dec_str(raw).map_err(|e| anyhow!("bad quantity {}: {}", raw, e)),
    }
}

impl TryFrom<TransactionRequestPayload> for PreparedTransaction {
    type Error = anyhow::Error;

    fn try_from(payload: TransactionRequestPayload) -> Result<Self> {
        Ok(PreparedTransaction {
            to: Address::from_str(&payload.to).context("invalid 'to' in step transaction")?,
            data: Bytes::from_str(&payload.data).context("invalid 'data' in step transaction")?,
            value: payload
                .value
                .as_deref()
                .map(parse_hex_or_dec)
                .transpose()?
                .unwrap_or_default(),
            gas_limit: payload.gas_limit.as_deref().map(parse_hex_or_dec).transpose()?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct LifiClient {
    http: reqwest::Client,
    api_url: String,
}

impl LifiClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("bnb-agent-actions/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn error_reason(resp: reqwest::Response) -> String {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
            .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
    }
}

impl Default for LifiClient {
    fn default() -> Self {
        Self::new(DEFAULT_LIFI_API_URL)
    }
}

#[async_trait]
impl TokenLookup for LifiClient {
    async fn lookup(&self, chain_id: u64, symbol: &str) -> Result<Option<TokenInfo>> {
        let url = format!("{}/v1/token", self.api_url);
        debug!("LI.FI token lookup {} on {}", symbol, chain_id);
        let resp = self
            .http
            .get(&url)
            .query(&[("chain", chain_id.to_string()), ("token", symbol.to_string())])
            .send()
            .await
            .context("Failed to call LI.FI token endpoint")?;

        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(None),
            status if status.is_success() => {
                let token: TokenInfo = resp.json().await.context("Invalid LI.FI token response")?;
                Ok(Some(token))
            }
            _ => bail!("LI.FI token lookup failed: {}", Self::error_reason(resp).await),
        }
    }
}

#[async_trait]
impl RouteAggregator for LifiClient {
    async fn routes(&self, config: &AggregatorConfig, request: &RoutesRequest) -> Result<Vec<Route>> {
        let url = format!("{}/v1/advanced/routes", config.api_url.trim_end_matches('/'));
        info!(
            "Requesting routes {} -> {} for {} on chain {}",
            request.from_token_address, request.to_token_address, request.from_amount, config.chain_id
        );
        let resp = self
            .http
            .post(&url)
            .header("x-lifi-integrator", &config.integrator)
            .json(request)
            .send()
            .await
            .context("Failed to call LI.FI routes endpoint")?;
        if !resp.status().is_success() {
            bail!("LI.FI routes request failed: {}", Self::error_reason(resp).await);
        }
        let parsed: RoutesResponse = resp.json().await.context("Invalid LI.FI routes response")?;
        debug!("LI.FI returned {} routes", parsed.routes.len());
        Ok(parsed.routes)
    }

    async fn step_transaction(
        &self,
        config: &AggregatorConfig,
        step: &RouteStep,
    ) -> Result<PreparedTransaction> {
        let url = format!("{}/v1/advanced/stepTransaction", config.api_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .header("x-lifi-integrator", &config.integrator)
            .json(step)
            .send()
            .await
            .context("Failed to call LI.FI stepTransaction endpoint")?;
        if !resp.status().is_success() {
            bail!("LI.FI stepTransaction failed: {}", Self::error_reason(resp).await);
        }
        let parsed: StepWithTransaction = resp
            .json()
            .await
            .context("Invalid LI.FI stepTransaction response")?;
        parsed
            .transaction_request
            .ok_or_else(|| anyhow!("step {} has no transaction request", step.id))?
            .try_into()
    }
}
