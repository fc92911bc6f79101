//! The seven agent actions and the machinery they share.
//!
//! Each action is a unit struct implementing [`Action`]: static metadata for
//! the host (name, similes, extraction template, examples) plus `run`, which
//! goes extract → normalize → orchestrate. Orchestrators are free functions
//! over an [`ActionContext`] so tests can inject fakes for every collaborator.

pub mod balance;
pub mod bridge;
pub mod deploy;
pub mod extract;
pub mod faucet;
pub mod params;
pub mod resolver;
pub mod stake;
pub mod swap;
pub mod templates;
pub mod tokens;
pub mod transfer;

use crate::blockchain::{
    client::{ChainRpc, EvmClient},
    nonce_manager::NonceManager,
    registry::ChainRegistry,
    services::{
        compiler::{SolcCompiler, SolidityCompiler},
        faucet::{FaucetTransport, WsFaucetTransport},
        lifi::{LifiClient, RouteAggregator, TokenLookup},
        name_service::{NameResolver, SpaceIdResolver},
    },
    signer::{ConfirmationPolicy, SignerContext},
};
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use params::RawParams;
use resolver::AddressResolver;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Per-process settings the orchestrators need beyond their collaborators.
#[derive(Debug, Clone)]
pub struct ActionSettings {
    pub lifi_api_url: String,
    pub lifi_integrator: String,
    pub faucet_ws_url: String,
    pub name_resolution_timeout: Duration,
    pub faucet_timeout: Duration,
}

impl From<&Config> for ActionSettings {
    fn from(config: &Config) -> Self {
        Self {
            lifi_api_url: config.lifi_api_url.clone(),
            lifi_integrator: config.lifi_integrator.clone(),
            faucet_ws_url: config.faucet_ws_url.clone(),
            name_resolution_timeout: config.name_resolution_timeout,
            faucet_timeout: config.faucet_timeout,
        }
    }
}

/// Everything an orchestrator may call out to.
pub struct ActionContext {
    pub signer: Arc<SignerContext>,
    pub tokens: Arc<dyn TokenLookup>,
    pub names: Arc<dyn NameResolver>,
    pub routes: Arc<dyn RouteAggregator>,
    pub compiler: Arc<dyn SolidityCompiler>,
    pub faucet: Arc<dyn FaucetTransport>,
    pub settings: ActionSettings,
}

impl ActionContext {
    /// Wires the production collaborators from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let key = config
            .private_key
            .as_ref()
            .ok_or_else(|| anyhow!("BNB_PRIVATE_KEY is not set"))?;
        let registry = Arc::new(ChainRegistry::new(config.rpc_overrides.clone()));
        let rpc: Arc<dyn ChainRpc> = Arc::new(EvmClient::new(NonceManager::new()));
        let signer = SignerContext::from_private_key(
            key,
            rpc,
            registry,
            ConfirmationPolicy {
                poll_interval: config.confirmation_poll,
                timeout: config.confirmation_timeout,
            },
        )
        .context("Failed to initialize signer")?;
        let lifi = Arc::new(LifiClient::new(config.lifi_api_url.clone()));

        Ok(Self {
            signer: Arc::new(signer),
            tokens: lifi.clone(),
            names: Arc::new(SpaceIdResolver::new(config.space_id_api_url.clone())),
            routes: lifi,
            compiler: Arc::new(SolcCompiler::new(
                config.solc_path.clone(),
                config.contracts_include_path.clone(),
            )),
            faucet: Arc::new(WsFaucetTransport),
            settings: ActionSettings::from(config),
        })
    }

    pub fn resolver(&self) -> AddressResolver<'_> {
        AddressResolver::new(
            self.names.as_ref(),
            self.signer.address(),
            self.settings.name_resolution_timeout,
        )
    }
}

/// What the host receives through its callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionCallback {
    pub text: String,
    pub content: Value,
}

/// Successful orchestration output.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub text: String,
    pub content: Value,
}

impl ActionOutcome {
    pub fn new<T: Serialize>(text: impl Into<String>, content: &T) -> Self {
        Self {
            text: text.into(),
            content: serde_json::to_value(content).unwrap_or(Value::Null),
        }
    }
}

/// One illustrative user/agent exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ActionExample {
    pub user: &'static str,
    pub params: Value,
    pub agent: &'static str,
}

/// The common transaction result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    pub chain: String,
    pub hash: String,
    pub amount: String,
    pub token: String,
    pub recipient: String,
    pub explorer_url: String,
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    fn similes(&self) -> &'static [&'static str];

    fn description(&self) -> &'static str;

    /// Extraction prompt handed to the host's LLM step.
    fn template(&self) -> &'static str;

    /// JSON schema of the structured parameters.
    fn parameters(&self) -> Value;

    fn examples(&self) -> Vec<ActionExample>;

    fn validate(&self, config: &Config) -> bool;

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome>;

    fn matches(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
            || self.similes().iter().any(|s| s.eq_ignore_ascii_case(name))
    }

    /// Host entry point. Never fails: every outcome reaches `callback`
    /// exactly once and the return value says which kind it was.
    async fn handle(
        &self,
        ctx: &ActionContext,
        message: &str,
        params: &Value,
        callback: &mut (dyn FnMut(ActionCallback) + Send),
    ) -> bool {
        info!("Starting {}", self.name());
        let raw = extract::extract(message).or(RawParams::from_value(params));
        match self.run(ctx, raw).await {
            Ok(outcome) => {
                info!("{} succeeded", self.name());
                callback(ActionCallback {
                    text: outcome.text,
                    content: outcome.content,
                });
                true
            }
            Err(err) => {
                error!("{} failed ({}): {}", self.name(), err.kind(), err);
                callback(ActionCallback {
                    text: format!("Error: {}", err.user_message()),
                    content: err.to_content(json!({ "action": self.name() })),
                });
                false
            }
        }
    }
}

/// Every action this crate provides, in listing order.
pub fn all_actions() -> Vec<Arc<dyn Action>> {
    vec![
        Arc::new(balance::BalanceAction),
        Arc::new(transfer::TransferAction),
        Arc::new(swap::SwapAction),
        Arc::new(bridge::BridgeAction),
        Arc::new(stake::StakeAction),
        Arc::new(faucet::FaucetAction),
        Arc::new(deploy::DeployAction),
    ]
}

pub fn find_action<'a>(actions: &'a [Arc<dyn Action>], name: &str) -> Option<&'a Arc<dyn Action>> {
    actions.iter().find(|a| a.matches(name))
}

/// Validation shared by the funds-moving actions.
pub fn requires_signer_key(config: &Config) -> bool {
    config.has_signer_key()
}

pub(crate) fn missing_context() -> ActionError {
    ActionError::validation("no signer configured; set BNB_PRIVATE_KEY")
}
