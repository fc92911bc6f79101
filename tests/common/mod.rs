//! In-memory collaborators for driving the orchestrators end to end.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bnb_agent_actions::{
    actions::{ActionContext, ActionSettings},
    blockchain::{
        client::ChainRpc,
        models::{ChainError, CompiledContract, PreparedTransaction, Route, RouteStep, TokenInfo},
        registry::{ChainDescriptor, ChainRegistry},
        services::{
            compiler::SolidityCompiler,
            faucet::{FaucetSession, FaucetTransport},
            lifi::{AggregatorConfig, RouteAggregator, RoutesRequest, TokenLookup},
            name_service::NameResolver,
            token::selector,
        },
        signer::{ConfirmationPolicy, SignerContext},
    },
    config::Config,
};
use ethers::signers::LocalWallet;
use ethers::types::{
    Address, Bytes, NameOrAddress, TransactionReceipt, TransactionRequest, H256, U256, U64,
};
use ethers_core::abi::{decode, encode, Abi, ParamType, Token};
use secrecy::SecretString;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Well-known development key; never holds real funds.
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const USDT: &str = "0x55d398326f99059fF775485246999027B3197955";
pub const DEPLOYED_AT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub fn own() -> Address {
    addr(TEST_ADDRESS)
}

pub fn addr(raw: &str) -> Address {
    Address::from_str(raw).unwrap()
}

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

pub fn uint(value: U256) -> Bytes {
    Bytes::from(encode(&[Token::Uint(value)]))
}

fn target(tx: &TransactionRequest) -> Option<Address> {
    match tx.to.as_ref() {
        Some(NameOrAddress::Address(a)) => Some(*a),
        _ => None,
    }
}

fn calldata(tx: &TransactionRequest) -> Vec<u8> {
    tx.data.as_ref().map(|d| d.to_vec()).unwrap_or_default()
}

/// A transaction the fake chain accepted for broadcast.
#[derive(Debug, Clone)]
pub struct SentTx {
    pub chain: String,
    pub hash: H256,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
}

impl SentTx {
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).map(|s| [s[0], s[1], s[2], s[3]])
    }

    pub fn calls(&self, sig: &str) -> bool {
        self.selector() == Some(selector(sig))
    }
}

#[derive(Default)]
struct ChainState {
    native: HashMap<Address, U256>,
    erc20: HashMap<(Address, Address), U256>,
    decimals: HashMap<Address, u8>,
    symbols: HashMap<Address, String>,
    allowances: HashMap<(Address, Address, Address), U256>,
    exact: HashMap<Vec<u8>, Bytes>,
    reverting: HashSet<[u8; 4]>,
    failing_sends: HashSet<usize>,
    zero_hash: bool,
    never_mined: bool,
    sent: Vec<SentTx>,
    calls: Vec<TransactionRequest>,
}

/// A single shared ledger standing in for every chain.
#[derive(Clone)]
pub struct FakeChain {
    state: Arc<Mutex<ChainState>>,
    pub gas_price: U256,
    pub gas_estimate: U256,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            gas_price: U256::from(3_000_000_000u64),
            gas_estimate: U256::from(50_000u64),
        }
    }
}

impl FakeChain {
    pub fn set_native(&self, owner: Address, balance: U256) {
        self.state.lock().unwrap().native.insert(owner, balance);
    }

    pub fn add_token(&self, token: Address, symbol: &str, decimals: u8) {
        let mut state = self.state.lock().unwrap();
        state.decimals.insert(token, decimals);
        state.symbols.insert(token, symbol.to_string());
    }

    pub fn set_erc20(&self, token: Address, owner: Address, balance: U256) {
        self.state.lock().unwrap().erc20.insert((token, owner), balance);
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Answers `eth_call` with `reply` whenever the calldata equals `data` exactly.
    pub fn respond(&self, data: Bytes, reply: Bytes) {
        self.state.lock().unwrap().exact.insert(data.to_vec(), reply);
    }

    /// Simulations of this function revert.
    pub fn revert_on(&self, sig: &str) {
        self.state.lock().unwrap().reverting.insert(selector(sig));
    }

    /// The n-th broadcast (zero based) gets a failed receipt.
    pub fn fail_send(&self, index: usize) {
        self.state.lock().unwrap().failing_sends.insert(index);
    }

    pub fn return_zero_hash(&self) {
        self.state.lock().unwrap().zero_hash = true;
    }

    pub fn never_mine(&self) {
        self.state.lock().unwrap().never_mined = true;
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn calls(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    fn erc20_read(state: &ChainState, token: Address, data: &[u8]) -> Option<Bytes> {
        let (sel, args) = (data.get(..4)?, data.get(4..)?);
        if sel == selector("balanceOf(address)") {
            let owner = match decode(&[ParamType::Address], args).ok()?.first()? {
                Token::Address(a) => *a,
                _ => return None,
            };
            let balance = state.erc20.get(&(token, owner)).copied().unwrap_or_default();
            return Some(uint(balance));
        }
        if sel == selector("allowance(address,address)") {
            let tokens = decode(&[ParamType::Address, ParamType::Address], args).ok()?;
            let (owner, spender) = match tokens.as_slice() {
                [Token::Address(o), Token::Address(s)] => (*o, *s),
                _ => return None,
            };
            let allowance = state
                .allowances
                .get(&(token, owner, spender))
                .copied()
                .unwrap_or_default();
            return Some(uint(allowance));
        }
        if sel == selector("decimals()") {
            return state.decimals.get(&token).map(|d| uint(U256::from(*d)));
        }
        if sel == selector("symbol()") {
            return state
                .symbols
                .get(&token)
                .map(|s| Bytes::from(encode(&[Token::String(s.clone())])));
        }
        None
    }
}

#[async_trait]
impl ChainRpc for FakeChain {
    async fn balance(&self, _chain: &ChainDescriptor, address: Address) -> Result<U256, ChainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .native
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn call(&self, _chain: &ChainDescriptor, tx: &TransactionRequest) -> Result<Bytes, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(tx.clone());
        let data = calldata(tx);
        if let Some(sel) = data.get(..4) {
            if state.reverting.contains(&[sel[0], sel[1], sel[2], sel[3]]) {
                return Err(ChainError::Reverted("execution reverted".into()));
            }
        }
        if let Some(reply) = state.exact.get(&data) {
            return Ok(reply.clone());
        }
        if let Some(token) = target(tx) {
            if let Some(reply) = Self::erc20_read(&state, token, &data) {
                return Ok(reply);
            }
        }
        // Writes being simulated succeed with empty return data.
        Ok(Bytes::default())
    }

    async fn estimate_gas(&self, _chain: &ChainDescriptor, _tx: &TransactionRequest) -> Result<U256, ChainError> {
        Ok(self.gas_estimate)
    }

    async fn gas_price(&self, _chain: &ChainDescriptor) -> Result<U256, ChainError> {
        Ok(self.gas_price)
    }

    async fn send_transaction(
        &self,
        chain: &ChainDescriptor,
        _wallet: &LocalWallet,
        tx: TransactionRequest,
    ) -> Result<H256, ChainError> {
        let mut state = self.state.lock().unwrap();
        let index = state.sent.len();
        let hash = if state.zero_hash {
            H256::zero()
        } else {
            H256::from_low_u64_be(index as u64 + 1)
        };
        let data = Bytes::from(calldata(&tx));
        let to = target(&tx);

        // approve(spender, amount) takes effect immediately.
        if let (Some(token), Some(sel)) = (to, data.get(..4)) {
            if sel == selector("approve(address,uint256)") {
                if let Ok(tokens) = decode(&[ParamType::Address, ParamType::Uint(256)], &data[4..]) {
                    if let [Token::Address(spender), Token::Uint(amount)] = tokens.as_slice() {
                        let owner = tx.from.unwrap_or_default();
                        state.allowances.insert((token, owner, *spender), *amount);
                    }
                }
            }
        }

        state.sent.push(SentTx {
            chain: chain.name.clone(),
            hash,
            to,
            value: tx.value.unwrap_or_default(),
            data,
            gas: tx.gas,
            gas_price: tx.gas_price,
        });
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        _chain: &ChainDescriptor,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        let state = self.state.lock().unwrap();
        if state.never_mined {
            return Ok(None);
        }
        let Some(index) = state.sent.iter().position(|tx| tx.hash == hash) else {
            return Ok(None);
        };
        let status = if state.failing_sends.contains(&index) { 0u64 } else { 1u64 };
        let contract_address = state.sent[index].to.is_none().then(|| addr(DEPLOYED_AT));
        Ok(Some(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(index as u64 + 100)),
            status: Some(U64::from(status)),
            contract_address,
            ..Default::default()
        }))
    }
}

/// Symbol table for the aggregator's token endpoint.
#[derive(Default, Clone)]
pub struct FakeTokens {
    tokens: Arc<Mutex<HashMap<String, TokenInfo>>>,
    pub lookups: Arc<Mutex<Vec<(u64, String)>>>,
}

impl FakeTokens {
    pub fn with(self, symbol: &str, address: &str, decimals: u8) -> Self {
        self.tokens.lock().unwrap().insert(
            symbol.to_uppercase(),
            TokenInfo {
                address: address.to_string(),
                symbol: symbol.to_string(),
                decimals,
                chain_id: 56,
                name: symbol.to_string(),
                price_usd: None,
            },
        );
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenLookup for FakeTokens {
    async fn lookup(&self, chain_id: u64, symbol: &str) -> Result<Option<TokenInfo>> {
        self.lookups
            .lock()
            .unwrap()
            .push((chain_id, symbol.to_string()));
        Ok(self.tokens.lock().unwrap().get(&symbol.to_uppercase()).cloned())
    }
}

#[derive(Default, Clone)]
pub struct FakeNames {
    names: Arc<Mutex<HashMap<String, Address>>>,
}

impl FakeNames {
    pub fn with(self, name: &str, address: &str) -> Self {
        self.names
            .lock()
            .unwrap()
            .insert(name.to_string(), addr(address));
        self
    }
}

#[async_trait]
impl NameResolver for FakeNames {
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>> {
        Ok(self.names.lock().unwrap().get(name).copied())
    }
}

/// Serves canned routes; every step resolves to the same prepared transaction.
#[derive(Default, Clone)]
pub struct FakeRoutes {
    routes: Arc<Mutex<Vec<Route>>>,
    prepared: Arc<Mutex<Option<PreparedTransaction>>>,
    pub requests: Arc<Mutex<Vec<RoutesRequest>>>,
    pub prepared_steps: Arc<Mutex<Vec<String>>>,
}

impl FakeRoutes {
    pub fn with_route(self, route: Value) -> Self {
        let route: Route = serde_json::from_value(route).unwrap();
        self.routes.lock().unwrap().push(route);
        self
    }

    pub fn with_prepared(self, prepared: PreparedTransaction) -> Self {
        *self.prepared.lock().unwrap() = Some(prepared);
        self
    }
}

#[async_trait]
impl RouteAggregator for FakeRoutes {
    async fn routes(&self, _config: &AggregatorConfig, request: &RoutesRequest) -> Result<Vec<Route>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.routes.lock().unwrap().clone())
    }

    async fn step_transaction(&self, _config: &AggregatorConfig, step: &RouteStep) -> Result<PreparedTransaction> {
        self.prepared_steps.lock().unwrap().push(step.id.clone());
        self.prepared
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("no transaction prepared for step {}", step.id))
    }
}

/// Returns a tiny artifact whose constructor matches the contract kind.
#[derive(Default, Clone)]
pub struct FakeCompiler {
    pub fail_with: Option<String>,
    pub compiled: Arc<Mutex<Vec<String>>>,
}

fn constructor_abi(contract_name: &str) -> &'static str {
    match contract_name {
        "Erc20Contract" => {
            r#"[{"type":"constructor","stateMutability":"nonpayable","inputs":[
                {"name":"name","type":"string"},{"name":"symbol","type":"string"},
                {"name":"decimals","type":"uint8"},{"name":"totalSupply","type":"uint256"}]}]"#
        }
        "Erc721Contract" => {
            r#"[{"type":"constructor","stateMutability":"nonpayable","inputs":[
                {"name":"name","type":"string"},{"name":"symbol","type":"string"},
                {"name":"baseURI","type":"string"}]}]"#
        }
        _ => {
            r#"[{"type":"constructor","stateMutability":"nonpayable","inputs":[
                {"name":"name","type":"string"},{"name":"baseURI","type":"string"}]}]"#
        }
    }
}

#[async_trait]
impl SolidityCompiler for FakeCompiler {
    async fn compile(&self, source: &str, contract_name: &str) -> Result<CompiledContract> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!(message.clone()));
        }
        if !source.contains(&format!("contract {}", contract_name)) {
            return Err(anyhow!("{} not found in source", contract_name));
        }
        self.compiled.lock().unwrap().push(contract_name.to_string());
        Ok(CompiledContract {
            name: contract_name.to_string(),
            abi: serde_json::from_str::<Abi>(constructor_abi(contract_name))?,
            bytecode: Bytes::from(vec![0x60, 0x80, 0x60, 0x40, 0x52]),
        })
    }
}

/// Replays scripted frames; with `hang` set it never answers, and with
/// `hang_on_connect` the connection itself never completes.
#[derive(Default, Clone)]
pub struct FakeFaucet {
    pub frames: Vec<Value>,
    pub hang: bool,
    pub hang_on_connect: bool,
    pub sent: Arc<Mutex<Vec<Value>>>,
    pub closed: Arc<AtomicBool>,
}

impl FakeFaucet {
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct FakeFaucetSession {
    frames: std::vec::IntoIter<Value>,
    hang: bool,
    sent: Arc<Mutex<Vec<Value>>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl FaucetTransport for FakeFaucet {
    async fn open(&self, _url: &str) -> Result<Box<dyn FaucetSession>> {
        if self.hang_on_connect {
            std::future::pending::<()>().await;
        }
        Ok(Box::new(FakeFaucetSession {
            frames: self.frames.clone().into_iter(),
            hang: self.hang,
            sent: self.sent.clone(),
            closed: self.closed.clone(),
        }))
    }
}

#[async_trait]
impl FaucetSession for FakeFaucetSession {
    async fn send(&mut self, frame: Value) -> Result<()> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }

    async fn next_message(&mut self) -> Result<Option<Value>> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        Ok(self.frames.next())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Everything a test may want to inspect after running an action.
pub struct Harness {
    pub chain: FakeChain,
    pub tokens: FakeTokens,
    pub names: FakeNames,
    pub routes: FakeRoutes,
    pub compiler: FakeCompiler,
    pub faucet: FakeFaucet,
    pub settings: ActionSettings,
}

impl Default for Harness {
    fn default() -> Self {
        let mut settings = ActionSettings::from(&Config::default());
        settings.name_resolution_timeout = Duration::from_millis(200);
        settings.faucet_timeout = Duration::from_millis(50);
        Self {
            chain: FakeChain::default(),
            tokens: FakeTokens::default(),
            names: FakeNames::default(),
            routes: FakeRoutes::default(),
            compiler: FakeCompiler::default(),
            faucet: FakeFaucet::default(),
            settings,
        }
    }
}

impl Harness {
    pub fn context(&self) -> ActionContext {
        let signer = SignerContext::from_private_key(
            &SecretString::new(TEST_KEY.to_string()),
            Arc::new(self.chain.clone()),
            Arc::new(ChainRegistry::new(HashMap::new())),
            ConfirmationPolicy {
                poll_interval: Duration::from_millis(5),
                timeout: Duration::from_millis(100),
            },
        )
        .unwrap();
        ActionContext {
            signer: Arc::new(signer),
            tokens: Arc::new(self.tokens.clone()),
            names: Arc::new(self.names.clone()),
            routes: Arc::new(self.routes.clone()),
            compiler: Arc::new(self.compiler.clone()),
            faucet: Arc::new(self.faucet.clone()),
            settings: self.settings.clone(),
        }
    }
}

/// Config whose key check passes.
pub fn signer_config() -> Config {
    Config {
        private_key: Some(SecretString::new(TEST_KEY.to_string())),
        ..Config::default()
    }
}
