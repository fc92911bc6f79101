//! Symbol and address resolution for ERC-20 tokens.

use crate::actions::params::TokenRef;
use crate::blockchain::registry::ChainDescriptor;
use crate::blockchain::services::lifi::TokenLookup;
use crate::blockchain::signer::SignerContext;
use crate::error::{ActionError, ActionResult};
use crate::utils::parse_address;
use ethers::types::Address;
use tracing::debug;

/// The only chain whose symbols the aggregator lookup can resolve.
pub const LOOKUP_CHAIN_ID: u64 = 56;

/// An ERC-20 token with everything needed to move or display amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Symbol to contract address via the lookup service (bsc only).
pub async fn lookup_symbol(
    tokens: &dyn TokenLookup,
    chain: &ChainDescriptor,
    symbol: &str,
) -> ActionResult<ResolvedToken> {
    if chain.id != LOOKUP_CHAIN_ID {
        return Err(ActionError::UnsupportedLookupChain(chain.name.clone()));
    }
    let info = tokens
        .lookup(chain.id, symbol)
        .await
        .map_err(|e| ActionError::ExternalService(e.to_string()))?
        .ok_or_else(|| ActionError::TokenNotFound(format!("{} on {}", symbol, chain.name)))?;
    debug!("{} on {} is {}", symbol, chain.name, info.address);
    Ok(ResolvedToken {
        address: parse_address(&info.address)?,
        symbol: info.symbol,
        decimals: info.decimals,
    })
}

/// Resolves a non-native token reference, reading decimals (and the symbol
/// when only an address was given) from the token contract.
pub async fn resolve_erc20(
    signer: &SignerContext,
    tokens: &dyn TokenLookup,
    chain: &ChainDescriptor,
    token: &TokenRef,
) -> ActionResult<ResolvedToken> {
    match token {
        TokenRef::Native => Err(ActionError::validation(format!(
            "{} is the native token, not an ERC20",
            chain.native_symbol
        ))),
        TokenRef::Symbol(symbol) => lookup_symbol(tokens, chain, symbol).await,
        TokenRef::Address(raw) => {
            let address = parse_address(raw)?;
            let decimals = signer.erc20_decimals(chain, address).await?;
            let symbol = signer
                .erc20_symbol(chain, address)
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| raw.clone());
            Ok(ResolvedToken {
                address,
                symbol,
                decimals,
            })
        }
    }
}
