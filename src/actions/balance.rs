// src/actions/balance.rs

use crate::actions::{
    params::{normalize_balance, BalanceIntent, RawParams, TokenRef},
    templates::BALANCE_TEMPLATE,
    tokens::{lookup_symbol, ResolvedToken},
    Action, ActionContext, ActionExample, ActionOutcome,
};
use crate::config::Config;
use crate::error::ActionResult;
use crate::utils::{format_amount, parse_address};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
    pub chain: String,
    pub address: String,
    pub token: String,
    pub balance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
}

pub async fn get_balance(ctx: &ActionContext, intent: BalanceIntent) -> ActionResult<BalanceResult> {
    let signer = &ctx.signer;
    let chain = intent.chain;
    let address_text = ctx.resolver().resolve(intent.address.as_deref()).await;
    let owner = parse_address(&address_text)?;

    match intent.token {
        TokenRef::Native => {
            let wei = signer.native_balance(&chain, owner).await?;
            Ok(BalanceResult {
                balance: format_amount(wei, 18),
                token: chain.native_symbol.clone(),
                chain: chain.name,
                address: address_text,
                token_address: None,
            })
        }
        TokenRef::Address(raw) => {
            let token = parse_address(&raw)?;
            let decimals = signer.erc20_decimals(&chain, token).await?;
            let symbol = signer
                .erc20_symbol(&chain, token)
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| raw.clone());
            let units = signer.erc20_balance(&chain, token, owner).await?;
            Ok(BalanceResult {
                chain: chain.name,
                address: address_text,
                token: symbol,
                balance: format_amount(units, decimals),
                token_address: Some(raw),
            })
        }
        TokenRef::Symbol(symbol) => {
            let ResolvedToken {
                address,
                symbol,
                decimals,
            } = lookup_symbol(ctx.tokens.as_ref(), &chain, &symbol).await?;
            let units = signer.erc20_balance(&chain, address, owner).await?;
            Ok(BalanceResult {
                chain: chain.name,
                address: address_text,
                token: symbol,
                balance: format_amount(units, decimals),
                token_address: Some(format!("{:?}", address)),
            })
        }
    }
}

pub struct BalanceAction;

#[async_trait]
impl Action for BalanceAction {
    fn name(&self) -> &'static str {
        "GET_BALANCE"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["CHECK_BALANCE", "TOKEN_BALANCE", "get_balance"]
    }

    fn description(&self) -> &'static str {
        "Get the native or ERC20 token balance of an address on BNB Smart Chain or opBNB."
    }

    fn template(&self) -> &'static str {
        BALANCE_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "chain": {"type": "string", "description": "bsc, bscTestnet, opBNB or opBNBTestnet (default bsc)"},
                "address": {"type": "string", "description": "0x address or .bnb name (default: own wallet)"},
                "token": {"type": "string", "description": "Token symbol or contract address (default: native)"}
            }
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "Check my BNB balance",
                params: json!({"chain": "bsc"}),
                agent: "Balance of 0x1234...abcd on bsc: 1.25 BNB",
            },
            ActionExample {
                user: "How much USDT does 0x742d35Cc6634C0532925a3b844Bc454e4438f44e hold?",
                params: json!({"chain": "bsc", "address": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e", "token": "USDT"}),
                agent: "Balance of 0x742d...f44e on bsc: 530.2 USDT",
            },
        ]
    }

    fn validate(&self, _config: &Config) -> bool {
        true
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let intent = normalize_balance(ctx.signer.registry(), &raw)?;
        let result = get_balance(ctx, intent).await?;
        Ok(ActionOutcome::new(
            format!(
                "Balance of {} on {}: {} {}",
                result.address, result.chain, result.balance, result.token
            ),
            &result,
        ))
    }
}
