// src/config.rs

use crate::blockchain::services::{
    faucet::DEFAULT_FAUCET_WS_URL,
    lifi::{DEFAULT_INTEGRATOR, DEFAULT_LIFI_API_URL},
    name_service::DEFAULT_SPACE_ID_API_URL,
};
use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

// All configuration, loaded once at startup from the environment / .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Session signer key. Funds-moving actions refuse to run without it.
    pub private_key: Option<SecretString>,

    /// Custom RPC URLs keyed by canonical chain name (`bsc`, `bscTestnet`,
    /// `opBNB`, `opBNBTestnet`). Absent chains use the public endpoints.
    pub rpc_overrides: HashMap<String, String>,

    // External services
    pub lifi_api_url: String,
    pub lifi_integrator: String,
    pub space_id_api_url: String,
    pub faucet_ws_url: String,
    pub solc_path: String,
    pub contracts_include_path: String,

    // Timeouts
    pub confirmation_timeout: Duration,
    pub confirmation_poll: Duration,
    pub name_resolution_timeout: Duration,
    pub faucet_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            private_key: None,
            rpc_overrides: HashMap::new(),
            lifi_api_url: DEFAULT_LIFI_API_URL.to_string(),
            lifi_integrator: DEFAULT_INTEGRATOR.to_string(),
            space_id_api_url: DEFAULT_SPACE_ID_API_URL.to_string(),
            faucet_ws_url: DEFAULT_FAUCET_WS_URL.to_string(),
            solc_path: "solc".to_string(),
            contracts_include_path: "node_modules".to_string(),
            confirmation_timeout: Duration::from_secs(120),
            confirmation_poll: Duration::from_millis(1000),
            name_resolution_timeout: Duration::from_secs(5),
            faucet_timeout: Duration::from_secs(15),
        }
    }
}

const RPC_ENV_KEYS: [(&str, &str); 4] = [
    ("BSC_PROVIDER_URL", "bsc"),
    ("BSC_TESTNET_PROVIDER_URL", "bscTestnet"),
    ("OPBNB_PROVIDER_URL", "opBNB"),
    ("OPBNB_TESTNET_PROVIDER_URL", "opBNBTestnet"),
];

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match non_empty(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// True when a private key is configured and starts with `0x`.
    pub fn has_signer_key(&self) -> bool {
        self.private_key
            .as_ref()
            .map(|k| k.expose_secret().starts_with("0x"))
            .unwrap_or(false)
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let mut rpc_overrides = HashMap::new();
        for (key, chain) in RPC_ENV_KEYS {
            if let Some(url) = non_empty(key) {
                if url::Url::parse(&url).is_err() {
                    bail!("{} is not a valid URL: {}", key, url);
                }
                rpc_overrides.insert(chain.to_string(), url);
            }
        }

        let confirmation_timeout = Duration::from_secs(parse_or(
            "CONFIRMATION_TIMEOUT_SECS",
            defaults.confirmation_timeout.as_secs(),
        )?);
        let confirmation_poll = Duration::from_millis(parse_or(
            "CONFIRMATION_POLL_MS",
            defaults.confirmation_poll.as_millis() as u64,
        )?);

        Ok(Config {
            port: parse_or("PORT", defaults.port).context("PORT must be a valid port")?,
            private_key: non_empty("BNB_PRIVATE_KEY").map(SecretString::new),
            rpc_overrides,
            lifi_api_url: non_empty("LIFI_API_URL").unwrap_or(defaults.lifi_api_url),
            lifi_integrator: non_empty("LIFI_INTEGRATOR").unwrap_or(defaults.lifi_integrator),
            space_id_api_url: non_empty("SPACE_ID_API_URL").unwrap_or(defaults.space_id_api_url),
            faucet_ws_url: non_empty("FAUCET_WS_URL").unwrap_or(defaults.faucet_ws_url),
            solc_path: non_empty("SOLC_PATH").unwrap_or(defaults.solc_path),
            contracts_include_path: non_empty("CONTRACTS_INCLUDE_PATH")
                .unwrap_or(defaults.contracts_include_path),
            confirmation_timeout,
            confirmation_poll,
            ..defaults
        })
    }
}
