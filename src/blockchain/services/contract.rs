// src/blockchain/services/contract.rs

use crate::blockchain::models::CompiledContract;
use anyhow::{anyhow, Result};
use ethers_core::abi::Token;
use ethers_core::types::Bytes;

/// Creation calldata: bytecode followed by the ABI-encoded constructor args.
pub fn deployment_data(contract: &CompiledContract, args: &[Token]) -> Result<Bytes> {
    if contract.bytecode.is_empty() {
        return Err(anyhow!("contract {} has no bytecode", contract.name));
    }
    match contract.abi.constructor() {
        Some(constructor) => {
            let encoded = constructor
                .encode_input(contract.bytecode.to_vec(), args)
                .map_err(|e| anyhow!("constructor arguments do not match ABI: {}", e))?;
            Ok(Bytes::from(encoded))
        }
        None if args.is_empty() => Ok(contract.bytecode.clone()),
        None => Err(anyhow!(
            "contract {} has no constructor but {} arguments were given",
            contract.name,
            args.len()
        )),
    }
}
