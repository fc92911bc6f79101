// src/blockchain/services/mod.rs

pub mod bridge;
pub mod compiler;
pub mod contract;
pub mod faucet;
pub mod lifi;
pub mod name_service;
pub mod staking;
pub mod token;
pub mod transactions;
