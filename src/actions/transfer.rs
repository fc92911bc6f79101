// src/actions/transfer.rs

use crate::actions::{
    params::{normalize_transfer, RawParams, TokenRef, TransferIntent},
    requires_signer_key,
    templates::TRANSFER_TEMPLATE,
    tokens::resolve_erc20,
    Action, ActionContext, ActionExample, ActionOutcome, TxResult,
};
use crate::blockchain::models::TxOptions;
use crate::blockchain::registry::ChainDescriptor;
use crate::blockchain::signer::SignerContext;
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use crate::utils::{format_amount, parse_address, parse_amount};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionRequest, H256, U256};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Gas for a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Everything left after paying for the transfer itself, with the gas
/// parameters that fee was computed from.
pub async fn native_sweep(
    signer: &SignerContext,
    chain: &ChainDescriptor,
    to: Address,
    data: Option<&Bytes>,
) -> ActionResult<TxOptions> {
    let gas_limit = match data {
        Some(data) => {
            let probe = TransactionRequest::new().to(to).data(data.clone());
            signer.estimate_gas(chain, &probe).await?
        }
        None => U256::from(NATIVE_TRANSFER_GAS),
    };
    let gas_price = signer.gas_price(chain).await?;
    Ok(TxOptions {
        gas_limit: Some(gas_limit),
        gas_price: Some(gas_price),
        data: data.cloned(),
    })
}

pub async fn transfer(ctx: &ActionContext, intent: TransferIntent) -> ActionResult<TxResult> {
    let signer = &ctx.signer;
    let chain = intent.chain;

    let recipient = ctx.resolver().resolve(intent.recipient.as_deref()).await;
    let to = parse_address(&recipient)?;

    // A symbol that names the native currency is native whatever path chose it.
    let token = match intent.token {
        TokenRef::Symbol(ref s) if chain.is_native_symbol(s) => TokenRef::Native,
        other => other,
    };

    let (hash, amount, label) = match token {
        TokenRef::Native => {
            let (value, options) = match intent.amount.as_deref() {
                Some(amount) => (
                    parse_amount(amount, 18)?,
                    TxOptions {
                        data: intent.data.clone(),
                        ..Default::default()
                    },
                ),
                None => {
                    let options = native_sweep(signer, &chain, to, intent.data.as_ref()).await?;
                    let fee = options.gas_limit.unwrap_or_default() * options.gas_price.unwrap_or_default();
                    let balance = signer.native_balance(&chain, signer.address()).await?;
                    if balance <= fee {
                        return Err(ActionError::InsufficientFunds(format!(
                            "balance {} {} does not cover the {} {} transfer fee",
                            format_amount(balance, 18),
                            chain.native_symbol,
                            format_amount(fee, 18),
                            chain.native_symbol
                        )));
                    }
                    debug!("Sweeping balance {} minus fee {}", balance, fee);
                    (balance - fee, options)
                }
            };
            info!("Transferring {} wei of {} to {}", value, chain.native_symbol, recipient);
            let hash = signer.send_native(&chain, to, value, options).await?;
            (hash, format_amount(value, 18), chain.native_symbol.clone())
        }
        erc20 => {
            let token = resolve_erc20(signer, ctx.tokens.as_ref(), &chain, &erc20).await?;
            let value = match intent.amount.as_deref() {
                Some(amount) => parse_amount(amount, token.decimals)?,
                None => {
                    let balance = signer
                        .erc20_balance(&chain, token.address, signer.address())
                        .await?;
                    if balance.is_zero() {
                        return Err(ActionError::InsufficientFunds(format!(
                            "no {} balance to transfer",
                            token.symbol
                        )));
                    }
                    balance
                }
            };
            info!("Transferring {} units of {} to {}", value, token.symbol, recipient);
            let hash = signer.erc20_transfer(&chain, token.address, to, value).await?;
            (hash, format_amount(value, token.decimals), token.symbol)
        }
    };

    if hash == H256::zero() {
        return Err(ActionError::TransactionFailed("no transaction hash was returned".into()));
    }
    signer.confirm_success(&chain, hash).await?;

    let hash = format!("{:?}", hash);
    Ok(TxResult {
        explorer_url: chain.tx_url(&hash),
        chain: chain.name,
        hash,
        amount,
        token: label,
        recipient,
    })
}

pub struct TransferAction;

#[async_trait]
impl Action for TransferAction {
    fn name(&self) -> &'static str {
        "TRANSFER"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["SEND_TOKEN", "TRANSFER_TOKEN", "SEND_BNB", "PAY"]
    }

    fn description(&self) -> &'static str {
        "Transfer native tokens or ERC20 tokens to an address or .bnb name on BNB Smart Chain or opBNB."
    }

    fn template(&self) -> &'static str {
        TRANSFER_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "chain": {"type": "string", "description": "bsc, bscTestnet, opBNB or opBNBTestnet (default bsc)"},
                "token": {"type": "string", "description": "Token symbol or contract address (default: native)"},
                "amount": {"type": "string", "description": "Human amount, e.g. \"0.1\"; omit to send the whole balance"},
                "toAddress": {"type": "string", "description": "Recipient 0x address or .bnb name"},
                "data": {"type": "string", "description": "Optional 0x hex payload for native transfers"}
            },
            "required": ["toAddress"]
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "Transfer 0.1 BNB to 0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
                params: json!({"chain": "bsc", "amount": "0.1", "toAddress": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e"}),
                agent: "Successfully transferred 0.1 BNB to 0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
            },
            ActionExample {
                user: "Send 25 USDT to alice.bnb",
                params: json!({"chain": "bsc", "token": "USDT", "amount": "25", "toAddress": "alice.bnb"}),
                agent: "Successfully transferred 25 USDT to 0x5aAe...1234",
            },
        ]
    }

    fn validate(&self, config: &Config) -> bool {
        requires_signer_key(config)
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let intent = normalize_transfer(ctx.signer.registry(), &raw)?;
        let result = transfer(ctx, intent).await?;
        Ok(ActionOutcome::new(
            format!(
                "Successfully transferred {} {} to {}\nTransaction Hash: {}",
                result.amount, result.token, result.recipient, result.hash
            ),
            &result,
        ))
    }
}
