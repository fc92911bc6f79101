//! Best-effort regex pass over the raw message text.
//!
//! Produces the same optional-field shape as the host's structured
//! parameters; anything found here takes precedence over them.

use crate::actions::params::{clean_str, RawParams};
use crate::blockchain::registry::canonical_chain_name;
use lazy_static::lazy_static;
use regex::Regex;

/// A human amount: `1500`, `1,500`, `1,000.25` or `.5`.
const NUMBER: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+";

lazy_static! {
    // The leading class keeps a match from starting inside `1,500` or `.5`.
    static ref AMOUNT_TOKEN_RE: Regex = Regex::new(&format!(
        r"(?i)(?:^|[^\w.,])({})\s*([a-z][a-z0-9]{{1,10}}|0x[0-9a-f]{{40}})\b",
        NUMBER
    ))
    .unwrap();
    static ref RECIPIENT_RE: Regex =
        Regex::new(r"(?i)\bto\s+(0x[0-9a-f]{40}|[a-z0-9][a-z0-9-]*\.bnb)\b").unwrap();
    static ref SWAP_RE: Regex = Regex::new(&format!(
        r"(?i)\bswap\s+(?:({})\s+)?([a-z][a-z0-9]{{1,10}}|0x[0-9a-f]{{40}})\s+(?:for|to|into)\s+([a-z][a-z0-9]{{1,10}}|0x[0-9a-f]{{40}})\b",
        NUMBER
    ))
    .unwrap();
    static ref FROM_TO_CHAIN_RE: Regex =
        Regex::new(r"(?i)\bfrom\s+([a-z][a-z0-9 _-]*?)\s+to\s+([a-z][a-z0-9_-]*(?:\s+testnet)?)\b").unwrap();
    static ref ON_CHAIN_RE: Regex =
        Regex::new(r"(?i)\b(?:on|in|using)\s+([a-z][a-z0-9_-]*(?:\s+testnet)?)\b").unwrap();
    // Only the leading verb counts: "check whether my withdraw requests can be
    // claimed" is a question, not an instruction to withdraw.
    static ref STAKE_VERB_RE: Regex = Regex::new(
        r"(?i)^\s*(?:please\s+)?(?:(?:i\s+)?(?:want|would\s+like)\s+to\s+)?(deposit|stake|withdraw|unstake|claim)\b"
    )
    .unwrap();
    static ref CONTRACT_KIND_RE: Regex =
        Regex::new(r"(?i)\b(erc[- ]?20|erc[- ]?721|erc[- ]?1155|nft|multi[- ]?token)\b").unwrap();
    static ref SLIPPAGE_RE: Regex = Regex::new(
        r"(?i)(?:slippage\s*(?:of|:|=)?\s*(\d+(?:\.\d+)?)\s*%|(\d+(?:\.\d+)?)\s*%\s*slippage)"
    )
    .unwrap();
}

/// Words that follow a number in a sentence but are not token symbols.
const NOT_A_SYMBOL: &[&str] = &[
    "to", "for", "from", "on", "in", "of", "and", "or", "with", "into", "tokens", "token", "coins",
    "percent", "slippage", "decimals", "supply", "using", "via", "at",
];

/// Drops thousands separators and gives a bare fraction its leading zero.
fn plain_number(raw: &str) -> String {
    let digits = raw.replace(',', "");
    if digits.starts_with('.') {
        format!("0{}", digits)
    } else {
        digits
    }
}

fn chain_name(raw: &str) -> Option<String> {
    canonical_chain_name(raw).map(str::to_string)
}

/// Runs every pattern over `message` and returns whatever was found.
pub fn extract(message: &str) -> RawParams {
    let mut out = RawParams::default();
    let Some(text) = clean_str(message) else {
        return out;
    };

    if let Some(caps) = SWAP_RE.captures(&text) {
        out.amount = caps.get(1).map(|m| plain_number(m.as_str()));
        out.from_token = caps.get(2).map(|m| m.as_str().to_string());
        out.to_token = caps.get(3).map(|m| m.as_str().to_string());
    }

    if out.amount.is_none() {
        for caps in AMOUNT_TOKEN_RE.captures_iter(&text) {
            let symbol = &caps[2];
            if NOT_A_SYMBOL.iter().any(|w| symbol.eq_ignore_ascii_case(w)) {
                continue;
            }
            out.amount = Some(plain_number(&caps[1]));
            out.token = Some(symbol.to_string());
            break;
        }
    }

    if let Some(caps) = RECIPIENT_RE.captures(&text) {
        out.to_address = Some(caps[1].to_string());
    }

    if let Some(caps) = FROM_TO_CHAIN_RE.captures(&text) {
        if let (Some(from), Some(to)) = (chain_name(&caps[1]), chain_name(&caps[2])) {
            out.from_chain = Some(from);
            out.to_chain = Some(to);
        }
    }
    for caps in ON_CHAIN_RE.captures_iter(&text) {
        if let Some(chain) = chain_name(&caps[1]) {
            out.chain = Some(chain);
            break;
        }
    }

    if let Some(caps) = STAKE_VERB_RE.captures(&text) {
        let verb = caps[1].to_lowercase();
        out.stake_action = Some(
            match verb.as_str() {
                "stake" | "deposit" => "deposit",
                "unstake" | "withdraw" => "withdraw",
                _ => "claim",
            }
            .to_string(),
        );
    }

    if let Some(caps) = CONTRACT_KIND_RE.captures(&text) {
        let kind = caps[1].to_lowercase().replace(['-', ' '], "");
        out.contract_type = Some(
            match kind.as_str() {
                "nft" | "erc721" => "ERC721",
                "multitoken" | "erc1155" => "ERC1155",
                _ => "ERC20",
            }
            .to_string(),
        );
    }

    if let Some(caps) = SLIPPAGE_RE.captures(&text) {
        if let Some(pct) = caps.get(1).or_else(|| caps.get(2)) {
            out.slippage = Some(format!("{}%", pct.as_str()));
        }
    }

    out
}
