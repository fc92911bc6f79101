//! Raw parameter shape and the per-action normalizers.
//!
//! Every field arriving from the host may be missing, the literal string
//! `"null"`, or the wrong JSON type. `RawParams` absorbs all of that; the
//! `normalize_*` functions turn it into typed intents.

use crate::blockchain::registry::{ChainDescriptor, ChainRegistry};
use crate::blockchain::services::faucet::FAUCET_TOKENS;
use crate::error::{ActionError, ActionResult};
use crate::utils::parse_amount;
use ethers::types::{Bytes, U256};
use serde_json::Value;
use std::str::FromStr;
use validator::Validate;

pub const DEFAULT_CHAIN: &str = "bsc";
pub const SWAP_CHAIN: &str = "bsc";
pub const STAKE_CHAIN: &str = "bsc";
pub const DEFAULT_SLIPPAGE: f64 = 0.005;

/// Coerces a loosely-typed field to a trimmed string, treating `null`,
/// `"null"`, `"undefined"` and empty values as absent.
pub fn clean_value(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    clean_str(&text)
}

pub fn clean_str(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("undefined") {
        None
    } else {
        Some(text.to_string())
    }
}

/// Every parameter any action reads, all optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams {
    pub chain: Option<String>,
    pub address: Option<String>,
    pub token: Option<String>,
    pub amount: Option<String>,
    pub to_address: Option<String>,
    pub data: Option<String>,
    pub from_token: Option<String>,
    pub to_token: Option<String>,
    pub slippage: Option<String>,
    pub from_chain: Option<String>,
    pub to_chain: Option<String>,
    pub stake_action: Option<String>,
    pub contract_type: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<String>,
    pub total_supply: Option<String>,
    pub base_uri: Option<String>,
}

fn first_of(params: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| clean_value(params.get(*key)))
}

impl RawParams {
    /// Reads the host's structured parameters, accepting camelCase and
    /// snake_case spellings.
    pub fn from_value(params: &Value) -> Self {
        Self {
            chain: first_of(params, &["chain", "network"]),
            address: first_of(params, &["address", "account", "wallet"]),
            token: first_of(params, &["token", "tokenAddress", "token_address", "asset"]),
            amount: first_of(params, &["amount", "value"]),
            to_address: first_of(params, &["toAddress", "to_address", "recipient", "to"]),
            data: first_of(params, &["data"]),
            from_token: first_of(params, &["fromToken", "from_token", "inputToken"]),
            to_token: first_of(params, &["toToken", "to_token", "outputToken"]),
            slippage: first_of(params, &["slippage"]),
            from_chain: first_of(params, &["fromChain", "from_chain", "sourceChain"]),
            to_chain: first_of(params, &["toChain", "to_chain", "destinationChain"]),
            stake_action: first_of(params, &["action", "stakeAction", "stake_action"]),
            contract_type: first_of(params, &["contractType", "contract_type", "type"]),
            name: first_of(params, &["name", "tokenName"]),
            symbol: first_of(params, &["symbol", "tokenSymbol"]),
            decimals: first_of(params, &["decimals"]),
            total_supply: first_of(params, &["totalSupply", "total_supply", "supply"]),
            base_uri: first_of(params, &["baseURI", "baseUri", "base_uri", "uri"]),
        }
    }

    /// Field-wise merge where `self` wins and `fallback` fills the gaps.
    pub fn or(self, fallback: RawParams) -> RawParams {
        RawParams {
            chain: self.chain.or(fallback.chain),
            address: self.address.or(fallback.address),
            token: self.token.or(fallback.token),
            amount: self.amount.or(fallback.amount),
            to_address: self.to_address.or(fallback.to_address),
            data: self.data.or(fallback.data),
            from_token: self.from_token.or(fallback.from_token),
            to_token: self.to_token.or(fallback.to_token),
            slippage: self.slippage.or(fallback.slippage),
            from_chain: self.from_chain.or(fallback.from_chain),
            to_chain: self.to_chain.or(fallback.to_chain),
            stake_action: self.stake_action.or(fallback.stake_action),
            contract_type: self.contract_type.or(fallback.contract_type),
            name: self.name.or(fallback.name),
            symbol: self.symbol.or(fallback.symbol),
            decimals: self.decimals.or(fallback.decimals),
            total_supply: self.total_supply.or(fallback.total_supply),
            base_uri: self.base_uri.or(fallback.base_uri),
        }
    }
}

/// A token reference after the native-vs-ERC20 decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRef {
    Native,
    Symbol(String),
    Address(String),
}

impl TokenRef {
    pub fn classify(token: Option<&str>, chain: &ChainDescriptor) -> Self {
        match token.and_then(clean_str) {
            None => TokenRef::Native,
            Some(t) if chain.is_native_symbol(&t) => TokenRef::Native,
            Some(t) if t.starts_with("0x") || t.starts_with("0X") => TokenRef::Address(t),
            Some(t) => TokenRef::Symbol(t),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TokenRef::Native)
    }

    pub fn label(&self, chain: &ChainDescriptor) -> String {
        match self {
            TokenRef::Native => chain.native_symbol.clone(),
            TokenRef::Symbol(s) | TokenRef::Address(s) => s.clone(),
        }
    }
}

fn resolve_chain(registry: &ChainRegistry, chain: Option<&str>) -> ActionResult<ChainDescriptor> {
    Ok(registry.get(chain.unwrap_or(DEFAULT_CHAIN))?)
}

/// Syntax-only amount check; decimals are applied once the token is known.
pub fn check_amount(amount: &str) -> ActionResult<()> {
    parse_amount(amount, 18).map(|_| ())
}

// --- Balance ---

#[derive(Debug, Clone)]
pub struct BalanceIntent {
    pub chain: ChainDescriptor,
    pub address: Option<String>,
    pub token: TokenRef,
}

pub fn normalize_balance(registry: &ChainRegistry, raw: &RawParams) -> ActionResult<BalanceIntent> {
    let chain = resolve_chain(registry, raw.chain.as_deref())?;
    let token = TokenRef::classify(raw.token.as_deref(), &chain);
    Ok(BalanceIntent {
        address: raw.address.clone().or_else(|| raw.to_address.clone()),
        token,
        chain,
    })
}

// --- Transfer ---

#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub chain: ChainDescriptor,
    pub token: TokenRef,
    /// `None` means "send everything".
    pub amount: Option<String>,
    pub recipient: Option<String>,
    pub data: Option<Bytes>,
}

pub fn normalize_transfer(registry: &ChainRegistry, raw: &RawParams) -> ActionResult<TransferIntent> {
    let chain = resolve_chain(registry, raw.chain.as_deref())?;
    let token = TokenRef::classify(raw.token.as_deref(), &chain);
    if let Some(amount) = raw.amount.as_deref() {
        check_amount(amount)?;
    }
    let data = match raw.data.as_deref() {
        Some(hex) => Some(
            Bytes::from_str(hex)
                .map_err(|_| ActionError::validation(format!("data must be 0x-prefixed hex, got '{}'", hex)))?,
        ),
        None => None,
    };
    if data.is_some() && !token.is_native() {
        return Err(ActionError::validation("data can only be attached to native transfers"));
    }
    Ok(TransferIntent {
        chain,
        token,
        amount: raw.amount.clone(),
        recipient: raw.to_address.clone(),
        data,
    })
}

// --- Swap ---

#[derive(Debug, Clone)]
pub struct SwapIntent {
    pub chain: ChainDescriptor,
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    pub slippage: f64,
}

pub fn parse_slippage(raw: Option<&str>) -> ActionResult<f64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SLIPPAGE);
    };
    let trimmed = raw.trim();
    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(n) => (n.trim(), true),
        None => (trimmed, false),
    };
    let value: f64 = number
        .parse()
        .map_err(|_| ActionError::validation(format!("slippage must be a number, got '{}'", raw)))?;
    let value = if percent { value / 100.0 } else { value };
    if !(value > 0.0 && value <= 1.0) {
        return Err(ActionError::validation(format!(
            "slippage must be in (0, 1], got {}",
            raw
        )));
    }
    Ok(value)
}

pub fn normalize_swap(registry: &ChainRegistry, raw: &RawParams) -> ActionResult<SwapIntent> {
    let chain = resolve_chain(registry, raw.chain.as_deref().or(Some(SWAP_CHAIN)))?;
    if chain.name != SWAP_CHAIN {
        return Err(ActionError::UnsupportedChain(format!(
            "swaps are only supported on {}, not {}",
            SWAP_CHAIN, chain.name
        )));
    }
    let from_token = raw
        .from_token
        .clone()
        .or_else(|| raw.token.clone())
        .ok_or_else(|| ActionError::validation("fromToken is required"))?;
    let to_token = raw
        .to_token
        .clone()
        .ok_or_else(|| ActionError::validation("toToken is required"))?;
    if from_token.eq_ignore_ascii_case(&to_token) {
        return Err(ActionError::validation(format!(
            "Cannot swap the same token ({} -> {})",
            from_token, to_token
        )));
    }
    let amount = raw
        .amount
        .clone()
        .ok_or_else(|| ActionError::validation("amount is required"))?;
    check_amount(&amount)?;
    Ok(SwapIntent {
        chain,
        from_token,
        to_token,
        amount,
        slippage: parse_slippage(raw.slippage.as_deref())?,
    })
}

// --- Bridge ---

/// The two wired-up directions between BSC (L1) and opBNB (L2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeDirection {
    Deposit,
    Withdraw,
}

impl BridgeDirection {
    pub fn from_chains(from: &str, to: &str) -> ActionResult<Self> {
        match (from, to) {
            ("bsc", "opBNB") => Ok(BridgeDirection::Deposit),
            ("opBNB", "bsc") => Ok(BridgeDirection::Withdraw),
            _ => Err(ActionError::UnsupportedDirection {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BridgeIntent {
    pub from_chain: ChainDescriptor,
    pub to_chain: ChainDescriptor,
    pub direction: BridgeDirection,
    pub from_token: TokenRef,
    pub to_token: TokenRef,
    pub amount: String,
    pub recipient: Option<String>,
}

pub fn normalize_bridge(registry: &ChainRegistry, raw: &RawParams) -> ActionResult<BridgeIntent> {
    let from_chain = resolve_chain(registry, raw.from_chain.as_deref().or(raw.chain.as_deref()))?;
    let to_chain = match raw.to_chain.as_deref() {
        Some(name) => registry.get(name)?,
        None if from_chain.name == "opBNB" => registry.get("bsc")?,
        None => registry.get("opBNB")?,
    };
    let direction = BridgeDirection::from_chains(&from_chain.name, &to_chain.name)?;

    let from_token = TokenRef::classify(raw.from_token.as_deref().or(raw.token.as_deref()), &from_chain);
    let to_token = TokenRef::classify(raw.to_token.as_deref(), &to_chain);
    if from_token.is_native() != to_token.is_native() {
        return Err(ActionError::validation(format!(
            "ERC20 bridging needs both fromToken and toToken (got {} -> {})",
            from_token.label(&from_chain),
            to_token.label(&to_chain)
        )));
    }

    let amount = raw
        .amount
        .clone()
        .ok_or_else(|| ActionError::validation("amount is required"))?;
    check_amount(&amount)?;

    Ok(BridgeIntent {
        from_chain,
        to_chain,
        direction,
        from_token,
        to_token,
        amount,
        recipient: raw.to_address.clone(),
    })
}

// --- Stake ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeIntent {
    Deposit { amount: String },
    /// `None` withdraws the whole slisBNB balance.
    Withdraw { amount: Option<String> },
    Claim,
}

pub fn normalize_stake(raw: &RawParams) -> ActionResult<StakeIntent> {
    if let Some(chain) = raw.chain.as_deref() {
        if crate::blockchain::registry::canonical_chain_name(chain) != Some(STAKE_CHAIN) {
            return Err(ActionError::UnsupportedChain(format!(
                "staking is only supported on {}, not {}",
                STAKE_CHAIN, chain
            )));
        }
    }
    let action = raw
        .stake_action
        .as_deref()
        .map(str::to_lowercase)
        .ok_or_else(|| ActionError::validation("action must be one of deposit, withdraw, claim"))?;
    match action.as_str() {
        "deposit" | "stake" => {
            let amount = raw
                .amount
                .clone()
                .ok_or_else(|| ActionError::validation("amount is required for deposit"))?;
            check_amount(&amount)?;
            Ok(StakeIntent::Deposit { amount })
        }
        "withdraw" | "unstake" => {
            if let Some(amount) = raw.amount.as_deref() {
                check_amount(amount)?;
            }
            Ok(StakeIntent::Withdraw {
                amount: raw.amount.clone(),
            })
        }
        "claim" => Ok(StakeIntent::Claim),
        other => Err(ActionError::validation(format!(
            "unknown stake action '{}'; expected deposit, withdraw or claim",
            other
        ))),
    }
}

// --- Faucet ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetIntent {
    pub token: String,
    pub recipient: Option<String>,
}

pub fn normalize_faucet(raw: &RawParams) -> ActionResult<FaucetIntent> {
    let token = raw.token.clone().unwrap_or_else(|| "BNB".to_string());
    if !FAUCET_TOKENS.contains(&token.as_str()) {
        return Err(ActionError::validation(format!(
            "Invalid token {}. Supported tokens: {}",
            token,
            FAUCET_TOKENS.join(", ")
        )));
    }
    Ok(FaucetIntent {
        token,
        recipient: raw.to_address.clone().or_else(|| raw.address.clone()),
    })
}

// --- Deploy ---

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Erc20Spec {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 11, message = "symbol must be 1-11 characters"))]
    pub symbol: String,
    #[validate(range(max = 36, message = "decimals must be at most 36"))]
    pub decimals: u8,
    /// Whole tokens; the contract scales by `10^decimals`.
    pub total_supply: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Erc721Spec {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 11, message = "symbol must be 1-11 characters"))]
    pub symbol: String,
    #[validate(length(min = 1, message = "baseURI is required"))]
    pub base_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Erc1155Spec {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "baseURI is required"))]
    pub base_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployIntent {
    Erc20(Erc20Spec),
    Erc721(Erc721Spec),
    Erc1155(Erc1155Spec),
}

impl DeployIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            DeployIntent::Erc20(_) => "ERC20",
            DeployIntent::Erc721(_) => "ERC721",
            DeployIntent::Erc1155(_) => "ERC1155",
        }
    }
}

fn required(field: Option<&String>, what: &str, kind: &str) -> ActionResult<String> {
    field
        .cloned()
        .ok_or_else(|| ActionError::validation(format!("{} is required for {} contracts", what, kind)))
}

fn check_spec<T: Validate>(spec: &T) -> ActionResult<()> {
    spec.validate()
        .map_err(|errors| ActionError::validation(errors.to_string()))
}

pub fn normalize_deploy(registry: &ChainRegistry, raw: &RawParams) -> ActionResult<(ChainDescriptor, DeployIntent)> {
    let chain = resolve_chain(registry, raw.chain.as_deref())?;
    let kind = raw
        .contract_type
        .as_deref()
        .map(|t| t.to_lowercase().replace(['-', '_', ' '], ""))
        .unwrap_or_else(|| "erc20".to_string());

    let intent = match kind.as_str() {
        "erc20" | "token" | "fungible" => {
            let decimals = required(raw.decimals.as_ref(), "decimals", "ERC20")?;
            let decimals: u8 = decimals
                .parse()
                .map_err(|_| ActionError::validation(format!("decimals must be an integer, got '{}'", decimals)))?;
            let supply = required(raw.total_supply.as_ref(), "totalSupply", "ERC20")?;
            let total_supply = U256::from_dec_str(supply.replace(['_', ','], "").as_str())
                .map_err(|_| ActionError::InvalidAmount(format!("totalSupply must be a whole number, got '{}'", supply)))?;
            if total_supply.is_zero() {
                return Err(ActionError::InvalidAmount("totalSupply must be greater than zero".into()));
            }
            let spec = Erc20Spec {
                name: required(raw.name.as_ref(), "name", "ERC20")?,
                symbol: required(raw.symbol.as_ref(), "symbol", "ERC20")?,
                decimals,
                total_supply,
            };
            check_spec(&spec)?;
            DeployIntent::Erc20(spec)
        }
        "erc721" | "nft" => {
            let spec = Erc721Spec {
                name: required(raw.name.as_ref(), "name", "ERC721")?,
                symbol: required(raw.symbol.as_ref(), "symbol", "ERC721")?,
                base_uri: required(raw.base_uri.as_ref(), "baseURI", "ERC721")?,
            };
            check_spec(&spec)?;
            DeployIntent::Erc721(spec)
        }
        "erc1155" | "multitoken" => {
            let spec = Erc1155Spec {
                name: required(raw.name.as_ref(), "name", "ERC1155")?,
                base_uri: required(raw.base_uri.as_ref(), "baseURI", "ERC1155")?,
            };
            check_spec(&spec)?;
            DeployIntent::Erc1155(spec)
        }
        other => {
            return Err(ActionError::validation(format!(
                "unsupported contract type '{}'; expected ERC20, ERC721 or ERC1155",
                other
            )))
        }
    };
    Ok((chain, intent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn registry() -> ChainRegistry {
        ChainRegistry::new(HashMap::new())
    }

    #[test]
    fn null_strings_and_wrong_types_are_absent() {
        let raw = RawParams::from_value(&json!({
            "chain": "null",
            "token": "undefined",
            "amount": 0.5,
            "toAddress": "  ",
            "data": {"nested": true},
        }));
        assert_eq!(raw.chain, None);
        assert_eq!(raw.token, None);
        assert_eq!(raw.amount.as_deref(), Some("0.5"));
        assert_eq!(raw.to_address, None);
        assert_eq!(raw.data, None);
    }

    #[test]
    fn merge_prefers_left_side() {
        let direct = RawParams {
            amount: Some("1".into()),
            ..Default::default()
        };
        let structured = RawParams {
            amount: Some("2".into()),
            chain: Some("opBNB".into()),
            ..Default::default()
        };
        let merged = direct.or(structured);
        assert_eq!(merged.amount.as_deref(), Some("1"));
        assert_eq!(merged.chain.as_deref(), Some("opBNB"));
    }

    #[test]
    fn token_classification() {
        let reg = registry();
        let bsc = reg.get("bsc").unwrap();
        assert_eq!(TokenRef::classify(None, &bsc), TokenRef::Native);
        assert_eq!(TokenRef::classify(Some("bnb"), &bsc), TokenRef::Native);
        assert_eq!(TokenRef::classify(Some("USDT"), &bsc), TokenRef::Symbol("USDT".into()));
        assert!(matches!(TokenRef::classify(Some("0x55d3"), &bsc), TokenRef::Address(_)));
    }

    #[test]
    fn transfer_defaults_to_bsc_and_rejects_zero() {
        let reg = registry();
        let intent = normalize_transfer(&reg, &RawParams::default()).unwrap();
        assert_eq!(intent.chain.name, "bsc");
        assert_eq!(intent.amount, None);
        assert!(intent.token.is_native());

        let zero = RawParams {
            amount: Some("0".into()),
            ..Default::default()
        };
        assert!(matches!(normalize_transfer(&reg, &zero), Err(ActionError::InvalidAmount(_))));
    }

    #[test]
    fn swap_rejects_same_token_and_other_chains() {
        let reg = registry();
        let same = RawParams {
            from_token: Some("USDT".into()),
            to_token: Some("usdt".into()),
            amount: Some("1".into()),
            ..Default::default()
        };
        let err = normalize_swap(&reg, &same).unwrap_err();
        assert!(err.to_string().contains("same token"));

        let elsewhere = RawParams {
            chain: Some("opBNB".into()),
            from_token: Some("BNB".into()),
            to_token: Some("USDT".into()),
            amount: Some("1".into()),
            ..Default::default()
        };
        assert!(matches!(normalize_swap(&reg, &elsewhere), Err(ActionError::UnsupportedChain(_))));
    }

    #[test]
    fn slippage_bounds() {
        assert_eq!(parse_slippage(None).unwrap(), DEFAULT_SLIPPAGE);
        assert_eq!(parse_slippage(Some("0.01")).unwrap(), 0.01);
        assert_eq!(parse_slippage(Some("1%")).unwrap(), 0.01);
        assert!(parse_slippage(Some("0")).is_err());
        assert!(parse_slippage(Some("1.5")).is_err());
    }

    #[test]
    fn bridge_directions() {
        let reg = registry();
        let intent = normalize_bridge(
            &reg,
            &RawParams {
                amount: Some("0.1".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(intent.direction, BridgeDirection::Deposit);
        assert_eq!(intent.to_chain.name, "opBNB");

        let back = normalize_bridge(
            &reg,
            &RawParams {
                from_chain: Some("opbnb".into()),
                amount: Some("0.1".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(back.direction, BridgeDirection::Withdraw);

        let other = normalize_bridge(
            &reg,
            &RawParams {
                from_chain: Some("bsc".into()),
                to_chain: Some("ethereum".into()),
                amount: Some("0.1".into()),
                ..Default::default()
            },
        );
        assert!(matches!(other, Err(ActionError::UnsupportedDirection { .. })));
    }

    #[test]
    fn stake_actions() {
        let deposit = RawParams {
            stake_action: Some("Deposit".into()),
            amount: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(
            normalize_stake(&deposit).unwrap(),
            StakeIntent::Deposit { amount: "1".into() }
        );
        let missing = RawParams {
            stake_action: Some("deposit".into()),
            ..Default::default()
        };
        assert!(normalize_stake(&missing).is_err());
        let withdraw = RawParams {
            stake_action: Some("withdraw".into()),
            ..Default::default()
        };
        assert_eq!(normalize_stake(&withdraw).unwrap(), StakeIntent::Withdraw { amount: None });
    }

    #[test]
    fn faucet_allow_list_is_case_sensitive() {
        let ok = normalize_faucet(&RawParams::default()).unwrap();
        assert_eq!(ok.token, "BNB");
        let lower = RawParams {
            token: Some("usdc".into()),
            ..Default::default()
        };
        assert!(normalize_faucet(&lower).is_err());
    }

    #[test]
    fn deploy_validates_per_kind() {
        let reg = registry();
        let erc20 = RawParams {
            name: Some("Demo".into()),
            symbol: Some("DMO".into()),
            decimals: Some("18".into()),
            total_supply: Some("1000000".into()),
            ..Default::default()
        };
        let (_, intent) = normalize_deploy(&reg, &erc20).unwrap();
        assert_eq!(intent.kind(), "ERC20");

        let nft_missing_uri = RawParams {
            contract_type: Some("erc-721".into()),
            name: Some("Demo".into()),
            symbol: Some("DMO".into()),
            ..Default::default()
        };
        let err = normalize_deploy(&reg, &nft_missing_uri).unwrap_err();
        assert!(err.to_string().contains("baseURI"));

        let long_symbol = RawParams {
            contract_type: Some("ERC721".into()),
            name: Some("Demo".into()),
            symbol: Some("WAYTOOLONGSYMBOL".into()),
            base_uri: Some("ipfs://x/".into()),
            ..Default::default()
        };
        assert!(normalize_deploy(&reg, &long_symbol).is_err());
    }
}
