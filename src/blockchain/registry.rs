//! Chain metadata keyed by symbolic chain name.
//!
//! The registry starts with the four BNB Chain networks and lazily registers
//! any other network from the base catalog the first time it is referenced.
//! Writes are idempotent upserts, so concurrent first references to the same
//! chain race benignly: both writers compute an equal descriptor.

use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown chain '{0}'")]
    UnknownChain(String),
    #[error("invalid rpc url '{url}' for chain '{chain}'")]
    InvalidRpcUrl { chain: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub name: String,
    pub id: u64,
    pub native_symbol: String,
    pub rpc_url: String,
    pub explorer_url: String,
}

impl ChainDescriptor {
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }

    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url.trim_end_matches('/'), address)
    }

    /// Testnet currencies (`tBNB`) also answer to their mainnet symbol.
    pub fn is_native_symbol(&self, token: &str) -> bool {
        let token = token.trim();
        token.eq_ignore_ascii_case(&self.native_symbol)
            || self
                .native_symbol
                .strip_prefix('t')
                .map_or(false, |mainnet| token.eq_ignore_ascii_case(mainnet))
    }
}

struct CatalogEntry {
    name: &'static str,
    id: u64,
    native_symbol: &'static str,
    rpc_url: &'static str,
    explorer_url: &'static str,
    aliases: &'static [&'static str],
}

/// Chains registered eagerly at construction.
pub const SUPPORTED_CHAINS: [&str; 4] = ["bsc", "bscTestnet", "opBNB", "opBNBTestnet"];

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "bsc",
        id: 56,
        native_symbol: "BNB",
        rpc_url: "https://bsc-dataseed.bnbchain.org",
        explorer_url: "https://bscscan.com",
        aliases: &["bsc", "bnb", "binance", "bnb-chain", "bnb-smart-chain", "bsc-mainnet", "56"],
    },
    CatalogEntry {
        name: "bscTestnet",
        id: 97,
        native_symbol: "tBNB",
        rpc_url: "https://data-seed-prebsc-1-s1.bnbchain.org:8545",
        explorer_url: "https://testnet.bscscan.com",
        aliases: &["bsctestnet", "bsc-testnet", "bnb-testnet", "97"],
    },
    CatalogEntry {
        name: "opBNB",
        id: 204,
        native_symbol: "BNB",
        rpc_url: "https://opbnb-mainnet-rpc.bnbchain.org",
        explorer_url: "https://opbnb.bscscan.com",
        aliases: &["opbnb", "opbnb-mainnet", "204"],
    },
    CatalogEntry {
        name: "opBNBTestnet",
        id: 5611,
        native_symbol: "tBNB",
        rpc_url: "https://opbnb-testnet-rpc.bnbchain.org",
        explorer_url: "https://opbnb-testnet.bscscan.com",
        aliases: &["opbnbtestnet", "opbnb-testnet", "5611"],
    },
    CatalogEntry {
        name: "ethereum",
        id: 1,
        native_symbol: "ETH",
        rpc_url: "https://eth.llamarpc.com",
        explorer_url: "https://etherscan.io",
        aliases: &["ethereum", "eth", "mainnet", "1"],
    },
    CatalogEntry {
        name: "sepolia",
        id: 11155111,
        native_symbol: "ETH",
        rpc_url: "https://rpc.sepolia.org",
        explorer_url: "https://sepolia.etherscan.io",
        aliases: &["sepolia", "11155111"],
    },
    CatalogEntry {
        name: "base",
        id: 8453,
        native_symbol: "ETH",
        rpc_url: "https://mainnet.base.org",
        explorer_url: "https://basescan.org",
        aliases: &["base", "8453"],
    },
    CatalogEntry {
        name: "arbitrum",
        id: 42161,
        native_symbol: "ETH",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        explorer_url: "https://arbiscan.io",
        aliases: &["arbitrum", "arbitrum-one", "arb", "42161"],
    },
    CatalogEntry {
        name: "polygon",
        id: 137,
        native_symbol: "POL",
        rpc_url: "https://polygon-rpc.com",
        explorer_url: "https://polygonscan.com",
        aliases: &["polygon", "matic", "137"],
    },
    CatalogEntry {
        name: "optimism",
        id: 10,
        native_symbol: "ETH",
        rpc_url: "https://mainnet.optimism.io",
        explorer_url: "https://optimistic.etherscan.io",
        aliases: &["optimism", "op", "10"],
    },
];

/// Normalize common chain aliases users (and LLMs) pass in.
pub fn canonical_chain_name(input: &str) -> Option<&'static str> {
    // Normalize case and separators first
    let mut s = input.trim().to_lowercase();
    s = s.replace([' ', '_'], "-");
    while s.contains("--") {
        s = s.replace("--", "-");
    }
    let compact = s.replace('-', "");

    CATALOG
        .iter()
        .find(|entry| {
            entry.name.eq_ignore_ascii_case(&s)
                || entry
                    .aliases
                    .iter()
                    .any(|alias| *alias == s || alias.replace('-', "") == compact)
        })
        .map(|entry| entry.name)
}

fn catalog_entry(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name == name)
}

fn descriptor_from(entry: &CatalogEntry, rpc_url: Option<&String>) -> ChainDescriptor {
    ChainDescriptor {
        name: entry.name.to_string(),
        id: entry.id,
        native_symbol: entry.native_symbol.to_string(),
        rpc_url: rpc_url
            .cloned()
            .unwrap_or_else(|| entry.rpc_url.to_string()),
        explorer_url: entry.explorer_url.to_string(),
    }
}

/// Process-wide, append-only chain registry.
#[derive(Debug, Default)]
pub struct ChainRegistry {
    chains: DashMap<String, ChainDescriptor>,
    custom_rpc: HashMap<String, String>,
}

impl ChainRegistry {
    /// Builds a registry holding the supported BNB Chain networks, with any
    /// custom RPC URLs (keyed by canonical chain name) applied.
    pub fn new(custom_rpc: HashMap<String, String>) -> Self {
        let custom_rpc: HashMap<String, String> = custom_rpc
            .into_iter()
            .filter_map(|(name, url)| match canonical_chain_name(&name) {
                Some(canonical) => Some((canonical.to_string(), url)),
                None => {
                    warn!("Ignoring custom RPC for unknown chain {}", name);
                    None
                }
            })
            .collect();

        let registry = Self {
            chains: DashMap::new(),
            custom_rpc,
        };
        for name in SUPPORTED_CHAINS {
            if let Some(entry) = catalog_entry(name) {
                registry.register(descriptor_from(entry, registry.custom_rpc.get(name)));
            }
        }
        registry
    }

    /// Resolves a chain by name or alias, registering base-catalog chains on
    /// first reference.
    pub fn get(&self, name: &str) -> Result<ChainDescriptor, RegistryError> {
        let key = canonical_chain_name(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.trim().to_string());

        if let Some(found) = self.chains.get(&key.to_lowercase()) {
            return Ok(found.clone());
        }

        let entry =
            catalog_entry(&key).ok_or_else(|| RegistryError::UnknownChain(name.to_string()))?;
        let descriptor = descriptor_from(entry, self.custom_rpc.get(entry.name));
        debug!("Registering chain {} ({}) on first use", descriptor.name, descriptor.id);
        self.register(descriptor.clone());
        Ok(descriptor)
    }

    /// Idempotent upsert keyed by the descriptor's (case-insensitive) name.
    pub fn register(&self, descriptor: ChainDescriptor) {
        self.chains
            .insert(descriptor.name.to_lowercase(), descriptor);
    }

    /// Derives a copy of a catalog chain with its RPC endpoint replaced.
    pub fn with_custom_rpc(&self, name: &str, rpc_url: &str) -> Result<ChainDescriptor, RegistryError> {
        let base = self.get(name)?;
        url::Url::parse(rpc_url).map_err(|_| RegistryError::InvalidRpcUrl {
            chain: base.name.clone(),
            url: rpc_url.to_string(),
        })?;
        Ok(ChainDescriptor {
            rpc_url: rpc_url.to_string(),
            ..base
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = canonical_chain_name(name).unwrap_or(name);
        self.chains.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
