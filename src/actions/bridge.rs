// src/actions/bridge.rs

use crate::actions::{
    params::{normalize_bridge, BridgeDirection, BridgeIntent, RawParams, TokenRef},
    requires_signer_key,
    templates::BRIDGE_TEMPLATE,
    tokens::resolve_erc20,
    Action, ActionContext, ActionExample, ActionOutcome,
};
use crate::blockchain::services::{bridge, token::decode_u256};
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use crate::utils::{format_amount, parse_address, parse_amount};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResult {
    pub from_chain: String,
    pub to_chain: String,
    pub method: String,
    pub hash: String,
    pub amount: String,
    pub token: String,
    pub recipient: String,
    pub explorer_url: String,
}

/// The bridge call picked for a (direction, token kind, recipient) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeCall {
    pub method: &'static str,
    pub bridge: Address,
    pub data: Bytes,
    pub value: U256,
}

fn constant_address(raw: &str) -> ActionResult<Address> {
    Address::from_str(raw).map_err(|_| ActionError::AddressInvalid(raw.to_string()))
}

/// Chooses among the four call variants per direction. `third_party` is
/// `Some` only when the recipient differs from the signer. `erc20` carries
/// the (source, destination) token addresses.
pub fn plan_bridge_call(
    direction: BridgeDirection,
    erc20: Option<(Address, Address)>,
    third_party: Option<Address>,
    amount: U256,
    delegation_fee: U256,
) -> ActionResult<BridgeCall> {
    let call = match direction {
        BridgeDirection::Deposit => {
            let bridge_address = constant_address(bridge::L1_STANDARD_BRIDGE)?;
            match (erc20, third_party) {
                (None, None) => BridgeCall {
                    method: "depositETH",
                    bridge: bridge_address,
                    data: bridge::deposit_eth_data(),
                    value: amount,
                },
                (None, Some(to)) => BridgeCall {
                    method: "depositETHTo",
                    bridge: bridge_address,
                    data: bridge::deposit_eth_to_data(to),
                    value: amount,
                },
                (Some((l1, l2)), None) => BridgeCall {
                    method: "depositERC20",
                    bridge: bridge_address,
                    data: bridge::deposit_erc20_data(l1, l2, amount),
                    value: U256::zero(),
                },
                (Some((l1, l2)), Some(to)) => BridgeCall {
                    method: "depositERC20To",
                    bridge: bridge_address,
                    data: bridge::deposit_erc20_to_data(l1, l2, to, amount),
                    value: U256::zero(),
                },
            }
        }
        BridgeDirection::Withdraw => {
            let bridge_address = constant_address(bridge::L2_STANDARD_BRIDGE)?;
            let (l2_token, value) = match erc20 {
                None => (constant_address(bridge::L2_NATIVE_TOKEN)?, amount + delegation_fee),
                Some((l2, _)) => (l2, delegation_fee),
            };
            match third_party {
                None => BridgeCall {
                    method: "withdraw",
                    bridge: bridge_address,
                    data: bridge::withdraw_data(l2_token, amount),
                    value,
                },
                Some(to) => BridgeCall {
                    method: "withdrawTo",
                    bridge: bridge_address,
                    data: bridge::withdraw_to_data(l2_token, to, amount),
                    value,
                },
            }
        }
    };
    Ok(call)
}

pub async fn bridge(ctx: &ActionContext, intent: BridgeIntent) -> ActionResult<BridgeResult> {
    let signer = &ctx.signer;
    let own = signer.address();
    let from_chain = intent.from_chain;
    let to_chain = intent.to_chain;

    let recipient_text = ctx.resolver().resolve(intent.recipient.as_deref()).await;
    let recipient = parse_address(&recipient_text)?;
    let third_party = (recipient != own).then_some(recipient);

    let (erc20, decimals, token_label) = match (&intent.from_token, &intent.to_token) {
        (TokenRef::Native, _) => (None, 18, from_chain.native_symbol.clone()),
        (source, destination) => {
            let source = resolve_erc20(signer, ctx.tokens.as_ref(), &from_chain, source).await?;
            let destination = match destination {
                TokenRef::Address(raw) => parse_address(raw)?,
                other => resolve_erc20(signer, ctx.tokens.as_ref(), &to_chain, other).await?.address,
            };
            (Some((source.address, destination)), source.decimals, source.symbol)
        }
    };
    let amount = parse_amount(&intent.amount, decimals)?;

    let delegation_fee = match intent.direction {
        BridgeDirection::Withdraw => {
            let l2_bridge = constant_address(bridge::L2_STANDARD_BRIDGE)?;
            let raw = signer
                .read(&from_chain, l2_bridge, bridge::delegation_fee_data())
                .await?;
            decode_u256(&raw).map_err(|e| ActionError::Chain(format!("delegationFee(): {}", e)))?
        }
        BridgeDirection::Deposit => U256::zero(),
    };
    debug!("Bridge delegation fee: {}", delegation_fee);

    let call = plan_bridge_call(intent.direction, erc20, third_party, amount, delegation_fee)?;

    if let Some((source_token, _)) = erc20 {
        signer
            .ensure_allowance(&from_chain, source_token, call.bridge, amount)
            .await?;
    }

    info!(
        "Bridging {} {} from {} to {} via {}",
        intent.amount, token_label, from_chain.name, to_chain.name, call.method
    );
    let hash = signer
        .execute(&from_chain, call.bridge, call.data, call.value)
        .await?;
    if hash == H256::zero() {
        return Err(ActionError::TransactionFailed("bridge returned no transaction hash".into()));
    }
    signer.confirm_success(&from_chain, hash).await?;

    let hash = format!("{:?}", hash);
    Ok(BridgeResult {
        explorer_url: from_chain.tx_url(&hash),
        from_chain: from_chain.name,
        to_chain: to_chain.name,
        method: call.method.to_string(),
        hash,
        amount: format_amount(amount, decimals),
        token: token_label,
        recipient: recipient_text,
    })
}

pub struct BridgeAction;

#[async_trait]
impl Action for BridgeAction {
    fn name(&self) -> &'static str {
        "BRIDGE"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["BRIDGE_TOKENS", "CROSS_CHAIN_TRANSFER", "DEPOSIT_TO_OPBNB", "WITHDRAW_FROM_OPBNB"]
    }

    fn description(&self) -> &'static str {
        "Bridge native or ERC20 tokens between BNB Smart Chain and opBNB using the standard bridge."
    }

    fn template(&self) -> &'static str {
        BRIDGE_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "fromChain": {"type": "string", "description": "bsc or opBNB (default bsc)"},
                "toChain": {"type": "string", "description": "opBNB or bsc"},
                "fromToken": {"type": "string", "description": "Token on the source chain (default: native)"},
                "toToken": {"type": "string", "description": "Token on the destination chain; required with fromToken"},
                "amount": {"type": "string", "description": "Human amount to bridge"},
                "toAddress": {"type": "string", "description": "Recipient on the destination chain (default: own wallet)"}
            },
            "required": ["amount"]
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "Bridge 0.1 BNB from BSC to opBNB",
                params: json!({"fromChain": "bsc", "toChain": "opBNB", "amount": "0.1"}),
                agent: "Successfully bridged 0.1 BNB from bsc to opBNB",
            },
            ActionExample {
                user: "Withdraw 0.5 BNB from opBNB back to BSC",
                params: json!({"fromChain": "opBNB", "toChain": "bsc", "amount": "0.5"}),
                agent: "Successfully bridged 0.5 BNB from opBNB to bsc",
            },
        ]
    }

    fn validate(&self, config: &Config) -> bool {
        requires_signer_key(config)
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let intent = normalize_bridge(ctx.signer.registry(), &raw)?;
        let result = bridge(ctx, intent).await?;
        Ok(ActionOutcome::new(
            format!(
                "Successfully bridged {} {} from {} to {}\nTransaction Hash: {}",
                result.amount, result.token, result.from_chain, result.to_chain, result.hash
            ),
            &result,
        ))
    }
}
