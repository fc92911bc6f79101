//! Recipient / address normalization.

use crate::actions::params::clean_str;
use crate::blockchain::services::name_service::NameResolver;
use crate::blockchain::to_checksum;
use crate::utils::is_hex_address;
use ethers::types::Address;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Symbols that show up in the recipient slot when the host mis-assigns a
/// token; they are never sent to name resolution.
pub const COMMON_TOKEN_SYMBOLS: &[&str] = &[
    "BNB", "TBNB", "WBNB", "USDT", "USDC", "BUSD", "ETH", "WETH", "BTC", "BTCB", "DAI", "CAKE",
    "FDUSD", "SLISBNB", "XRP", "ADA", "DOGE",
];

pub fn is_common_token_symbol(value: &str) -> bool {
    COMMON_TOKEN_SYMBOLS
        .iter()
        .any(|symbol| symbol.eq_ignore_ascii_case(value))
}

pub struct AddressResolver<'a> {
    names: &'a dyn NameResolver,
    own_address: Address,
    timeout: Duration,
}

impl<'a> AddressResolver<'a> {
    pub fn new(names: &'a dyn NameResolver, own_address: Address, timeout: Duration) -> Self {
        Self {
            names,
            own_address,
            timeout,
        }
    }

    fn own(&self) -> String {
        to_checksum(&self.own_address, None)
    }

    /// Never fails; anything it cannot make sense of becomes the signer's
    /// own address. Valid hex addresses come back exactly as given.
    pub async fn resolve(&self, raw: Option<&str>) -> String {
        let Some(value) = raw.and_then(clean_str) else {
            return self.own();
        };

        if is_hex_address(&value) {
            return value;
        }

        if is_common_token_symbol(&value) {
            debug!("'{}' is a token symbol, using own address", value);
            return self.own();
        }

        match timeout(self.timeout, self.names.resolve_name(&value)).await {
            Ok(Ok(Some(address))) => {
                debug!("Resolved {} to {:?}", value, address);
                return to_checksum(&address, None);
            }
            Ok(Ok(None)) => debug!("No address registered for {}", value),
            Ok(Err(e)) => warn!("Name resolution for {} failed: {}", value, e),
            Err(_) => warn!("Name resolution for {} timed out after {:?}", value, self.timeout),
        }

        if value.starts_with("0x") {
            warn!("Passing through malformed address {}", value);
            return value;
        }

        self.own()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNames {
        calls: AtomicUsize,
        answer: Option<Address>,
        delay: Duration,
    }

    #[async_trait]
    impl NameResolver for CountingNames {
        async fn resolve_name(&self, _name: &str) -> Result<Option<Address>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(self.answer)
        }
    }

    fn names(answer: Option<Address>, delay: Duration) -> CountingNames {
        CountingNames {
            calls: AtomicUsize::new(0),
            answer,
            delay,
        }
    }

    fn own() -> Address {
        Address::from_low_u64_be(0xabc)
    }

    #[tokio::test]
    async fn hex_addresses_pass_through_with_case_preserved() {
        let n = names(None, Duration::ZERO);
        let resolver = AddressResolver::new(&n, own(), Duration::from_secs(5));
        let input = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
        assert_eq!(resolver.resolve(Some(input)).await, input);
        let lower = input.to_lowercase();
        assert_eq!(resolver.resolve(Some(&lower)).await, lower);
        assert_eq!(n.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn token_symbols_never_reach_name_resolution() {
        let n = names(Some(Address::from_low_u64_be(1)), Duration::ZERO);
        let resolver = AddressResolver::new(&n, own(), Duration::from_secs(5));
        for symbol in ["bnb", "USDT", "Usdc", "wbnb"] {
            assert_eq!(resolver.resolve(Some(symbol)).await, to_checksum(&own(), None));
        }
        assert_eq!(n.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absent_values_fall_back_to_own_address() {
        let n = names(None, Duration::ZERO);
        let resolver = AddressResolver::new(&n, own(), Duration::from_secs(5));
        for raw in [None, Some(""), Some("null"), Some("undefined")] {
            assert_eq!(resolver.resolve(raw).await, to_checksum(&own(), None));
        }
    }

    #[tokio::test]
    async fn names_resolve_and_slow_lookups_fall_through() {
        let target = Address::from_str("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();
        let n = names(Some(target), Duration::ZERO);
        let resolver = AddressResolver::new(&n, own(), Duration::from_secs(5));
        assert_eq!(resolver.resolve(Some("alice.bnb")).await, to_checksum(&target, None));

        let slow = names(Some(target), Duration::from_millis(200));
        let resolver = AddressResolver::new(&slow, own(), Duration::from_millis(20));
        assert_eq!(resolver.resolve(Some("alice.bnb")).await, to_checksum(&own(), None));
        assert_eq!(resolver.resolve(Some("0x1234")).await, "0x1234");
    }
}
