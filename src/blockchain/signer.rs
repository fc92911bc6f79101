//! The session signer: one private key, many chains.
//!
//! Every operation takes the chain descriptor explicitly; the signer holds
//! no per-chain state. Writes are never retried here.

use crate::blockchain::{
    client::ChainRpc,
    models::{CompiledContract, TxOptions},
    registry::{ChainDescriptor, ChainRegistry},
    services::{contract, token},
};
use crate::error::{ActionError, ActionResult};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U256, U64};
use ethers_core::abi::Token;
use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// How long to wait for a receipt and how often to poll for it.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct SignerContext {
    wallet: LocalWallet,
    rpc: Arc<dyn ChainRpc>,
    registry: Arc<ChainRegistry>,
    confirmation: ConfirmationPolicy,
}

impl std::fmt::Debug for SignerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerContext")
            .field("address", &self.wallet.address())
            .field("confirmation", &self.confirmation)
            .finish_non_exhaustive()
    }
}

impl SignerContext {
    /// Builds the signer from a `0x`-prefixed (or bare) hex private key.
    pub fn from_private_key(
        private_key: &SecretString,
        rpc: Arc<dyn ChainRpc>,
        registry: Arc<ChainRegistry>,
        confirmation: ConfirmationPolicy,
    ) -> ActionResult<Self> {
        let key = private_key.expose_secret().trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let wallet = LocalWallet::from_str(key)
            .map_err(|_| ActionError::validation("configured private key is not a valid secp256k1 key"))?;
        info!("Signer initialized for {:?}", wallet.address());
        Ok(Self {
            wallet,
            rpc,
            registry,
            confirmation,
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn chain(&self, name: &str) -> ActionResult<ChainDescriptor> {
        Ok(self.registry.get(name)?)
    }

    // --- reads ---

    pub async fn native_balance(&self, chain: &ChainDescriptor, owner: Address) -> ActionResult<U256> {
        Ok(self.rpc.balance(chain, owner).await?)
    }

    pub async fn gas_price(&self, chain: &ChainDescriptor) -> ActionResult<U256> {
        Ok(self.rpc.gas_price(chain).await?)
    }

    pub async fn estimate_gas(&self, chain: &ChainDescriptor, tx: &TransactionRequest) -> ActionResult<U256> {
        let tx = tx.clone().from(self.address());
        Ok(self.rpc.estimate_gas(chain, &tx).await?)
    }

    /// Read-only contract call.
    pub async fn read(&self, chain: &ChainDescriptor, to: Address, data: Bytes) -> ActionResult<Bytes> {
        let tx = TransactionRequest::new().to(to).data(data);
        Ok(self.rpc.call(chain, &tx).await?)
    }

    pub async fn erc20_balance(&self, chain: &ChainDescriptor, token: Address, owner: Address) -> ActionResult<U256> {
        let raw = self.read(chain, token, token::balance_of_data(owner)).await?;
        token::decode_u256(&raw).map_err(|e| ActionError::TokenNotFound(format!("{:?}: {}", token, e)))
    }

    pub async fn erc20_decimals(&self, chain: &ChainDescriptor, token: Address) -> ActionResult<u8> {
        let raw = self.read(chain, token, token::decimals_data()).await?;
        let decimals = token::decode_u256(&raw)
            .map_err(|e| ActionError::TokenNotFound(format!("{:?} has no decimals(): {}", token, e)))?;
        u8::try_from(decimals.low_u64())
            .map_err(|_| ActionError::TokenNotFound(format!("{:?} reports {} decimals", token, decimals)))
    }

    pub async fn erc20_symbol(&self, chain: &ChainDescriptor, token: Address) -> ActionResult<Option<String>> {
        let raw = self.read(chain, token, token::symbol_data()).await?;
        Ok(token::decode_string(&raw))
    }

    pub async fn erc20_allowance(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> ActionResult<U256> {
        let raw = self
            .read(chain, token, token::allowance_data(owner, spender))
            .await?;
        token::decode_u256(&raw).map_err(|e| ActionError::TokenNotFound(format!("{:?}: {}", token, e)))
    }

    // --- writes ---

    /// `eth_call` from the signer's address; surfaces reverts before anything is signed.
    pub async fn simulate(&self, chain: &ChainDescriptor, tx: &TransactionRequest) -> ActionResult<Bytes> {
        let tx = tx.clone().from(self.address());
        self.rpc.call(chain, &tx).await.map_err(|e| {
            debug!("simulation failed on {}: {}", chain.name, e);
            ActionError::from(e)
        })
    }

    pub async fn send(&self, chain: &ChainDescriptor, tx: TransactionRequest) -> ActionResult<H256> {
        let tx = tx.from(self.address());
        let hash = self.rpc.send_transaction(chain, &self.wallet, tx).await?;
        info!("Sent transaction {:?} on {}", hash, chain.name);
        Ok(hash)
    }

    /// Simulate, then send, a contract write.
    pub async fn execute(
        &self,
        chain: &ChainDescriptor,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> ActionResult<H256> {
        let tx = TransactionRequest::new().to(to).data(data).value(value);
        self.simulate(chain, &tx).await?;
        self.send(chain, tx).await
    }

    pub async fn send_native(
        &self,
        chain: &ChainDescriptor,
        to: Address,
        amount: U256,
        options: TxOptions,
    ) -> ActionResult<H256> {
        let mut tx = TransactionRequest::new().to(to).value(amount);
        if let Some(gas) = options.gas_limit {
            tx = tx.gas(gas);
        }
        if let Some(price) = options.gas_price {
            tx = tx.gas_price(price);
        }
        if let Some(data) = options.data {
            tx = tx.data(data);
        }
        self.send(chain, tx).await
    }

    pub async fn erc20_approve(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> ActionResult<H256> {
        self.execute(chain, token, token::approve_data(spender, amount), U256::zero())
            .await
    }

    pub async fn erc20_transfer(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        to: Address,
        amount: U256,
    ) -> ActionResult<H256> {
        self.execute(chain, token, token::transfer_data(to, amount), U256::zero())
            .await
    }

    /// Approves `required` when the current allowance is short, and waits for
    /// that approval to confirm. ERC-20 `approve` sets an absolute allowance,
    /// so approving `required` always covers the shortfall.
    pub async fn ensure_allowance(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        spender: Address,
        required: U256,
    ) -> ActionResult<Option<H256>> {
        let current = self
            .erc20_allowance(chain, token, self.address(), spender)
            .await?;
        if current >= required {
            debug!("allowance {} already covers {}", current, required);
            return Ok(None);
        }
        info!(
            "Allowance {} < {} for spender {:?}; approving {}",
            current, required, spender, required
        );
        let hash = self.erc20_approve(chain, token, spender, required).await?;
        self.confirm_success(chain, hash).await?;
        Ok(Some(hash))
    }

    /// Simulates the creation of a compiled artifact, sends it and returns the
    /// deployed address once the receipt reports success.
    pub async fn deploy_contract(
        &self,
        chain: &ChainDescriptor,
        artifact: &CompiledContract,
        args: &[Token],
    ) -> ActionResult<Address> {
        let data = contract::deployment_data(artifact, args)
            .map_err(|e| ActionError::DeploymentFailed(e.to_string()))?;
        let tx = TransactionRequest::new().data(data);
        self.simulate(chain, &tx)
            .await
            .map_err(|e| ActionError::DeploymentFailed(e.to_string()))?;
        let hash = self.send(chain, tx).await?;
        let receipt = self.wait_for_confirmation(chain, hash).await?;
        if receipt.status != Some(U64::one()) {
            return Err(ActionError::DeploymentFailed(format!(
                "deployment transaction {:?} did not succeed",
                hash
            )));
        }
        receipt.contract_address.ok_or_else(|| {
            ActionError::DeploymentFailed(format!("receipt for {:?} has no contract address", hash))
        })
    }

    /// Polls until the transaction is mined, bounded by the confirmation policy.
    pub async fn wait_for_confirmation(
        &self,
        chain: &ChainDescriptor,
        hash: H256,
    ) -> ActionResult<TransactionReceipt> {
        let deadline = Instant::now() + self.confirmation.timeout;
        loop {
            if let Some(receipt) = self.rpc.transaction_receipt(chain, hash).await? {
                debug!("{:?} mined in block {:?}", hash, receipt.block_number);
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(ActionError::ConfirmationTimeout(format!("{:?}", hash)));
            }
            sleep(self.confirmation.poll_interval).await;
        }
    }

    /// Waits for the receipt and requires a success status.
    pub async fn confirm_success(
        &self,
        chain: &ChainDescriptor,
        hash: H256,
    ) -> ActionResult<TransactionReceipt> {
        if hash.is_zero() {
            return Err(ActionError::TransactionFailed(
                "no transaction hash was returned".to_string(),
            ));
        }
        let receipt = self.wait_for_confirmation(chain, hash).await?;
        if receipt.status != Some(U64::one()) {
            return Err(ActionError::TransactionFailed(format!(
                "transaction {:?} reverted on {}",
                hash, chain.name
            )));
        }
        Ok(receipt)
    }
}
