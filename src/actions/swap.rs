// src/actions/swap.rs

use crate::actions::{
    params::{normalize_swap, RawParams, SwapIntent, TokenRef},
    requires_signer_key,
    templates::SWAP_TEMPLATE,
    tokens::resolve_erc20,
    Action, ActionContext, ActionExample, ActionOutcome,
};
use crate::blockchain::models::Route;
use crate::blockchain::registry::ChainDescriptor;
use crate::blockchain::services::lifi::{AggregatorConfig, RouteOptions, RoutesRequest};
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use crate::utils::{format_amount, parse_amount};
use async_trait::async_trait;
use ethers::types::{Address, TransactionRequest, H160, U256, U64};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use tracing::{info, warn};

/// The aggregator's address for the chain's native currency.
pub const NATIVE_TOKEN_SENTINEL: Address = H160([0u8; 20]);

/// A swap side after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl SwapToken {
    pub fn is_native(&self) -> bool {
        self.address == NATIVE_TOKEN_SENTINEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Done,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Done => write!(f, "DONE"),
            StepStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// What happened to one route step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepExecution {
    pub step_id: String,
    pub tool: String,
    pub tx_hash: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
    pub chain: String,
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    pub expected_output: String,
    pub route_id: String,
    pub hash: String,
    pub steps: Vec<StepExecution>,
}

async fn resolve_side(ctx: &ActionContext, chain: &ChainDescriptor, token: &str) -> ActionResult<SwapToken> {
    match TokenRef::classify(Some(token), chain) {
        TokenRef::Native => Ok(SwapToken {
            address: NATIVE_TOKEN_SENTINEL,
            symbol: chain.native_symbol.clone(),
            decimals: 18,
        }),
        erc20 => {
            let resolved = resolve_erc20(&ctx.signer, ctx.tokens.as_ref(), chain, &erc20).await?;
            Ok(SwapToken {
                address: resolved.address,
                symbol: resolved.symbol,
                decimals: resolved.decimals,
            })
        }
    }
}

/// Highest quoted output wins.
pub fn select_best_route(routes: Vec<Route>) -> Option<Route> {
    routes.into_iter().max_by_key(|route| route.to_amount_value())
}

async fn execute_route(
    ctx: &ActionContext,
    chain: &ChainDescriptor,
    config: &AggregatorConfig,
    route: &Route,
    from: &SwapToken,
) -> ActionResult<Vec<StepExecution>> {
    let signer = &ctx.signer;
    let mut executions = Vec::with_capacity(route.steps.len());

    for step in &route.steps {
        let prepared = ctx
            .routes
            .step_transaction(config, step)
            .await
            .map_err(|e| ActionError::ExternalService(e.to_string()))?;

        let step_token = step.from_token_address().unwrap_or(from.address);
        if step_token != NATIVE_TOKEN_SENTINEL {
            if let (Some(spender), Some(required)) = (step.approval_address(), step.from_amount()) {
                signer.ensure_allowance(chain, step_token, spender, required).await?;
            }
        }

        let mut tx = TransactionRequest::new()
            .to(prepared.to)
            .data(prepared.data)
            .value(prepared.value);
        if let Some(gas) = prepared.gas_limit {
            tx = tx.gas(gas);
        }
        signer.simulate(chain, &tx).await?;
        let hash = signer.send(chain, tx).await?;
        let receipt = signer.wait_for_confirmation(chain, hash).await?;
        let status = if receipt.status == Some(U64::one()) {
            StepStatus::Done
        } else {
            StepStatus::Failed
        };
        info!("Swap step {} via {} finished: {}", step.id, step.tool, status);
        executions.push(StepExecution {
            step_id: step.id.clone(),
            tool: step.tool.clone(),
            tx_hash: format!("{:?}", hash),
            status,
        });
        if status == StepStatus::Failed {
            warn!("Stopping route {} after failed step {}", route.id, step.id);
            break;
        }
    }
    Ok(executions)
}

pub async fn swap(ctx: &ActionContext, intent: SwapIntent) -> ActionResult<SwapResult> {
    let chain = intent.chain;
    let from = resolve_side(ctx, &chain, &intent.from_token).await?;
    let to = resolve_side(ctx, &chain, &intent.to_token).await?;
    if from.address == to.address {
        return Err(ActionError::validation(format!(
            "Cannot swap the same token ({} and {} resolve to {:?})",
            intent.from_token, intent.to_token, from.address
        )));
    }
    let amount: U256 = parse_amount(&intent.amount, from.decimals)?;

    let config = AggregatorConfig {
        integrator: ctx.settings.lifi_integrator.clone(),
        api_url: ctx.settings.lifi_api_url.clone(),
        wallet: ctx.signer.address(),
        chain_id: chain.id,
    };
    let request = RoutesRequest {
        from_chain_id: chain.id,
        to_chain_id: chain.id,
        from_token_address: format!("{:?}", from.address),
        to_token_address: format!("{:?}", to.address),
        from_amount: amount.to_string(),
        from_address: format!("{:?}", config.wallet),
        options: RouteOptions {
            slippage: intent.slippage,
            integrator: config.integrator.clone(),
            order: "RECOMMENDED".to_string(),
        },
    };
    let routes = ctx
        .routes
        .routes(&config, &request)
        .await
        .map_err(|e| ActionError::ExternalService(e.to_string()))?;
    let route = select_best_route(routes).ok_or_else(|| {
        ActionError::NoRouteFound(format!(
            "{} {} -> {} on {}",
            intent.amount, from.symbol, to.symbol, chain.name
        ))
    })?;
    info!("Selected route {} quoting {} {}", route.id, route.to_amount, to.symbol);

    let steps = execute_route(ctx, &chain, &config, &route, &from).await?;
    let last = steps
        .last()
        .ok_or_else(|| ActionError::TransactionFailed(format!("route {} has no steps", route.id)))?;
    if last.status != StepStatus::Done {
        return Err(ActionError::TransactionFailed(format!(
            "swap step {} ended with status {}",
            last.step_id, last.status
        )));
    }

    Ok(SwapResult {
        chain: chain.name,
        from_token: from.symbol,
        to_token: to.symbol,
        amount: format_amount(amount, from.decimals),
        expected_output: format_amount(route.to_amount_value(), to.decimals),
        route_id: route.id.clone(),
        hash: last.tx_hash.clone(),
        steps,
    })
}

pub struct SwapAction;

#[async_trait]
impl Action for SwapAction {
    fn name(&self) -> &'static str {
        "SWAP"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["SWAP_TOKENS", "TOKEN_SWAP", "EXCHANGE", "TRADE"]
    }

    fn description(&self) -> &'static str {
        "Swap tokens on BNB Smart Chain using the best route from the LI.FI aggregator."
    }

    fn template(&self) -> &'static str {
        SWAP_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "chain": {"type": "string", "description": "Only bsc is supported"},
                "fromToken": {"type": "string", "description": "Token to sell (symbol or address)"},
                "toToken": {"type": "string", "description": "Token to buy (symbol or address)"},
                "amount": {"type": "string", "description": "Human amount of fromToken"},
                "slippage": {"type": "number", "description": "Fraction in (0, 1], default 0.005"}
            },
            "required": ["fromToken", "toToken", "amount"]
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            user: "Swap 1 BNB for USDT",
            params: json!({"chain": "bsc", "fromToken": "BNB", "toToken": "USDT", "amount": "1"}),
            agent: "Successfully swapped 1 BNB for USDT",
        }]
    }

    fn validate(&self, config: &Config) -> bool {
        requires_signer_key(config)
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let intent = normalize_swap(ctx.signer.registry(), &raw)?;
        let result = swap(ctx, intent).await?;
        Ok(ActionOutcome::new(
            format!(
                "Successfully swapped {} {} for ~{} {}\nTransaction Hash: {}",
                result.amount, result.from_token, result.expected_output, result.to_token, result.hash
            ),
            &result,
        ))
    }
}
