// src/blockchain/mod.rs

pub mod client;
pub use client::{ChainRpc, EvmClient};

pub mod evm_client;
pub mod models;
pub mod nonce_manager;
pub mod registry;
pub mod services;
pub mod signer;

pub use registry::{ChainDescriptor, ChainRegistry};
pub use signer::{ConfirmationPolicy, SignerContext};

pub use ethers::{
    types::{Address, H256, U256, U64},
    utils::to_checksum,
};
