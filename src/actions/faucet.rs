// src/actions/faucet.rs

use crate::actions::{
    params::{normalize_faucet, FaucetIntent, RawParams},
    templates::FAUCET_TEMPLATE,
    Action, ActionContext, ActionExample, ActionOutcome,
};
use crate::blockchain::services::faucet::{classify_frame, request_frame, FaucetReply, FaucetSession, FAUCET_CHAIN};
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use crate::utils::parse_address;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetResult {
    pub chain: String,
    pub token: String,
    pub recipient: String,
    pub hash: String,
    pub explorer_url: String,
}

/// Reads frames until the faucet reports a hash or an error.
async fn await_drip(session: &mut dyn FaucetSession) -> ActionResult<String> {
    loop {
        let frame = session
            .next_message()
            .await
            .map_err(|e| ActionError::ExternalService(e.to_string()))?
            .ok_or_else(|| ActionError::ExternalService("faucet closed the connection".into()))?;
        match classify_frame(&frame) {
            FaucetReply::Accepted => info!("Faucet accepted the request"),
            FaucetReply::Funded(hash) => return Ok(hash),
            FaucetReply::Failed(message) => return Err(ActionError::ExternalService(message)),
            FaucetReply::Other => debug!("Ignoring faucet frame {}", frame),
        }
    }
}

/// Connects, sends the request and waits for the drip. The session is parked
/// in `slot` as soon as it opens so the caller can close it on every path.
async fn open_and_request(
    ctx: &ActionContext,
    recipient: &str,
    token: &str,
    slot: &mut Option<Box<dyn FaucetSession>>,
) -> ActionResult<String> {
    let session = ctx
        .faucet
        .open(&ctx.settings.faucet_ws_url)
        .await
        .map_err(|e| ActionError::ExternalService(e.to_string()))?;
    let session = slot.insert(session);
    session
        .send(request_frame(recipient, token))
        .await
        .map_err(|e| ActionError::ExternalService(e.to_string()))?;
    await_drip(session.as_mut()).await
}

pub async fn request_tokens(ctx: &ActionContext, intent: FaucetIntent) -> ActionResult<FaucetResult> {
    let chain = ctx.signer.chain(FAUCET_CHAIN)?;
    let recipient = ctx.resolver().resolve(intent.recipient.as_deref()).await;
    parse_address(&recipient)?;

    let wait = ctx.settings.faucet_timeout;
    let mut session = None;
    let outcome = match timeout(wait, open_and_request(ctx, &recipient, &intent.token, &mut session)).await {
        Ok(result) => result,
        Err(_) => Err(ActionError::FaucetTimeout(wait)),
    };

    if let Some(mut session) = session {
        if let Err(e) = session.close().await {
            warn!("Failed to close faucet session: {}", e);
        }
    }

    let hash = outcome?;
    Ok(FaucetResult {
        explorer_url: chain.tx_url(&hash),
        chain: chain.name,
        token: intent.token,
        recipient,
        hash,
    })
}

pub struct FaucetAction;

#[async_trait]
impl Action for FaucetAction {
    fn name(&self) -> &'static str {
        "FAUCET"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["REQUEST_FAUCET", "GET_TEST_TOKENS", "TESTNET_FAUCET", "request_faucet"]
    }

    fn description(&self) -> &'static str {
        "Request BNB Smart Chain testnet tokens (BNB, BTC, BUSD, DAI, ETH, USDC) from the public faucet."
    }

    fn template(&self) -> &'static str {
        FAUCET_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token": {"type": "string", "enum": ["BNB", "BTC", "BUSD", "DAI", "ETH", "USDC"]},
                "toAddress": {"type": "string", "description": "Recipient (default: own wallet)"}
            }
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            user: "Get me some testnet USDC",
            params: json!({"token": "USDC"}),
            agent: "Successfully requested USDC from the faucet",
        }]
    }

    fn validate(&self, _config: &Config) -> bool {
        true
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let intent = normalize_faucet(&raw)?;
        let result = request_tokens(ctx, intent).await?;
        Ok(ActionOutcome::new(
            format!(
                "Successfully requested {} for {} on {}\nTransaction Hash: {}",
                result.token, result.recipient, result.chain, result.hash
            ),
            &result,
        ))
    }
}
