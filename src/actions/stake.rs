// src/actions/stake.rs

use crate::actions::{
    params::{normalize_stake, RawParams, StakeIntent, STAKE_CHAIN},
    requires_signer_key,
    templates::STAKE_TEMPLATE,
    Action, ActionContext, ActionExample, ActionOutcome,
};
use crate::blockchain::registry::ChainDescriptor;
use crate::blockchain::services::staking;
use crate::blockchain::signer::SignerContext;
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use crate::utils::{format_amount, parse_amount};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeResult {
    pub action: String,
    pub chain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slis_bnb_balance: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claimed_requests: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claim_hashes: Vec<String>,
}

struct Lista {
    manager: Address,
    slis_bnb: Address,
}

impl Lista {
    fn addresses() -> ActionResult<Self> {
        let parse = |raw: &str| Address::from_str(raw).map_err(|_| ActionError::AddressInvalid(raw.to_string()));
        Ok(Self {
            manager: parse(staking::STAKE_MANAGER)?,
            slis_bnb: parse(staking::SLIS_BNB)?,
        })
    }
}

async fn deposit(signer: &SignerContext, chain: &ChainDescriptor, lista: &Lista, amount: &str) -> ActionResult<StakeResult> {
    let value = parse_amount(amount, 18)?;
    info!("Staking {} BNB with Lista", amount);
    let hash = signer
        .execute(chain, lista.manager, staking::deposit_data(), value)
        .await?;
    signer.confirm_success(chain, hash).await?;
    let balance = signer
        .erc20_balance(chain, lista.slis_bnb, signer.address())
        .await?;
    Ok(StakeResult {
        action: "deposit".into(),
        chain: chain.name.clone(),
        hash: Some(format!("{:?}", hash)),
        amount: format_amount(value, 18),
        slis_bnb_balance: Some(format_amount(balance, 18)),
        claimed_requests: Vec::new(),
        claim_hashes: Vec::new(),
    })
}

async fn withdraw(
    signer: &SignerContext,
    chain: &ChainDescriptor,
    lista: &Lista,
    amount: Option<&str>,
) -> ActionResult<StakeResult> {
    let value = match amount {
        Some(amount) => parse_amount(amount, 18)?,
        None => {
            signer
                .erc20_balance(chain, lista.slis_bnb, signer.address())
                .await?
        }
    };
    if value.is_zero() {
        return Err(ActionError::InsufficientFunds("no slisBNB balance to withdraw".into()));
    }

    signer
        .ensure_allowance(chain, lista.slis_bnb, lista.manager, value)
        .await?;
    info!("Requesting withdrawal of {} slisBNB", format_amount(value, 18));
    let hash = signer
        .execute(chain, lista.manager, staking::request_withdraw_data(value), U256::zero())
        .await?;
    signer.confirm_success(chain, hash).await?;
    Ok(StakeResult {
        action: "withdraw".into(),
        chain: chain.name.clone(),
        hash: Some(format!("{:?}", hash)),
        amount: format_amount(value, 18),
        slis_bnb_balance: None,
        claimed_requests: Vec::new(),
        claim_hashes: Vec::new(),
    })
}

/// Claims the contiguous claimable prefix of the withdrawal queue.
///
/// Requests unlock in order, so scanning stops at the first one that is not
/// yet claimable. Claims are submitted from the highest index down so every
/// index still points at the same request regardless of how the contract
/// compacts its array after a claim.
async fn claim(signer: &SignerContext, chain: &ChainDescriptor, lista: &Lista) -> ActionResult<StakeResult> {
    let own = signer.address();
    let raw = signer
        .read(chain, lista.manager, staking::withdrawal_requests_data(own))
        .await?;
    let requests = staking::decode_withdrawal_requests(&raw)
        .map_err(|e| ActionError::Chain(format!("getUserWithdrawalRequests: {}", e)))?;
    debug!("{} pending withdrawal requests", requests.len());

    let mut claimable = Vec::new();
    for idx in 0..requests.len() {
        let raw = signer
            .read(chain, lista.manager, staking::request_status_data(own, idx))
            .await?;
        let (is_claimable, amount) = staking::decode_request_status(&raw)
            .map_err(|e| ActionError::Chain(format!("getUserRequestStatus: {}", e)))?;
        if !is_claimable {
            debug!("Request {} is not claimable yet", idx);
            break;
        }
        claimable.push((idx, amount));
    }

    let mut total = U256::zero();
    let mut hashes = Vec::with_capacity(claimable.len());
    for (idx, amount) in claimable.iter().rev() {
        let hash = signer
            .execute(chain, lista.manager, staking::claim_withdraw_data(*idx), U256::zero())
            .await?;
        signer.confirm_success(chain, hash).await?;
        info!("Claimed withdrawal request {} ({} BNB)", idx, format_amount(*amount, 18));
        total += *amount;
        hashes.push(format!("{:?}", hash));
    }

    Ok(StakeResult {
        action: "claim".into(),
        chain: chain.name.clone(),
        hash: hashes.last().cloned(),
        amount: format_amount(total, 18),
        slis_bnb_balance: None,
        claimed_requests: claimable.iter().map(|(idx, _)| *idx).collect(),
        claim_hashes: hashes,
    })
}

pub async fn stake(ctx: &ActionContext, intent: StakeIntent) -> ActionResult<StakeResult> {
    let signer = &ctx.signer;
    let chain = signer.chain(STAKE_CHAIN)?;
    let lista = Lista::addresses()?;
    match intent {
        StakeIntent::Deposit { amount } => deposit(signer, &chain, &lista, &amount).await,
        StakeIntent::Withdraw { amount } => withdraw(signer, &chain, &lista, amount.as_deref()).await,
        StakeIntent::Claim => claim(signer, &chain, &lista).await,
    }
}

fn summary(result: &StakeResult) -> String {
    match result.action.as_str() {
        "deposit" => format!(
            "Successfully staked {} BNB. Your slisBNB balance is now {}.\nTransaction Hash: {}",
            result.amount,
            result.slis_bnb_balance.as_deref().unwrap_or("0"),
            result.hash.as_deref().unwrap_or_default()
        ),
        "withdraw" => format!(
            "Requested withdrawal of {} slisBNB. The BNB can be claimed once the unbonding period ends.\nTransaction Hash: {}",
            result.amount,
            result.hash.as_deref().unwrap_or_default()
        ),
        _ if result.claimed_requests.is_empty() => {
            "No withdrawal requests are claimable yet; nothing was claimed.".to_string()
        }
        _ => format!(
            "Claimed {} withdrawal request(s) for a total of {} BNB.",
            result.claimed_requests.len(),
            result.amount
        ),
    }
}

pub struct StakeAction;

#[async_trait]
impl Action for StakeAction {
    fn name(&self) -> &'static str {
        "STAKE"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["STAKE_BNB", "UNSTAKE", "CLAIM_STAKE", "LIQUID_STAKING"]
    }

    fn description(&self) -> &'static str {
        "Stake BNB for slisBNB with Lista DAO, request a withdrawal, or claim unlocked withdrawals on BNB Smart Chain."
    }

    fn template(&self) -> &'static str {
        STAKE_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["deposit", "withdraw", "claim"]},
                "amount": {"type": "string", "description": "BNB for deposit, slisBNB for withdraw (omit for all)"}
            },
            "required": ["action"]
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "Stake 1 BNB",
                params: json!({"action": "deposit", "amount": "1"}),
                agent: "Successfully staked 1 BNB. Your slisBNB balance is now 0.98.",
            },
            ActionExample {
                user: "Claim my unstaked BNB",
                params: json!({"action": "claim"}),
                agent: "Claimed 1 withdrawal request(s) for a total of 0.5 BNB.",
            },
        ]
    }

    fn validate(&self, config: &Config) -> bool {
        requires_signer_key(config)
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let intent = normalize_stake(&raw)?;
        let result = stake(ctx, intent).await?;
        Ok(ActionOutcome::new(summary(&result), &result))
    }
}
