// src/blockchain/services/token.rs
//
// Calldata encoders and return-data decoders for the ERC-20 surface the
// actions use. Everything here is pure; the signer context does the I/O.

use anyhow::{anyhow, Result};
use ethers_core::abi::{decode, encode, ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};
use ethers_core::utils::keccak256;

pub fn selector(sig: &str) -> [u8; 4] {
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&keccak256(sig.as_bytes())[0..4]);
    sel
}

pub fn encode_call(sig: &str, tokens: Vec<Token>) -> Bytes {
    let mut out = selector(sig).to_vec();
    let mut tail = encode(&tokens);
    out.append(&mut tail);
    Bytes::from(out)
}

pub fn decode_u256(data: &[u8]) -> Result<U256> {
    match decode(&[ParamType::Uint(256)], data)?.first() {
        Some(Token::Uint(n)) => Ok(*n),
        _ => Err(anyhow!("expected a uint256 return value")),
    }
}

pub fn decode_string(data: &[u8]) -> Option<String> {
    // Try standard ABI string
    if let Ok(tokens) = decode(&[ParamType::String], data) {
        if let Some(Token::String(s)) = tokens.first() {
            return Some(s.clone());
        }
    }
    // Fallback: bytes32 to string (strip zeros), as older tokens return
    if let Ok(tokens) = decode(&[ParamType::FixedBytes(32)], data) {
        if let Some(Token::FixedBytes(b)) = tokens.first() {
            return String::from_utf8(b.iter().copied().take_while(|c| *c != 0u8).collect()).ok();
        }
    }
    None
}

pub fn balance_of_data(owner: Address) -> Bytes {
    encode_call("balanceOf(address)", vec![Token::Address(owner)])
}

pub fn decimals_data() -> Bytes {
    encode_call("decimals()", vec![])
}

pub fn symbol_data() -> Bytes {
    encode_call("symbol()", vec![])
}

pub fn allowance_data(owner: Address, spender: Address) -> Bytes {
    encode_call(
        "allowance(address,address)",
        vec![Token::Address(owner), Token::Address(spender)],
    )
}

pub fn transfer_data(to: Address, amount: U256) -> Bytes {
    encode_call(
        "transfer(address,uint256)",
        vec![Token::Address(to), Token::Uint(amount)],
    )
}

pub fn approve_data(spender: Address, amount: U256) -> Bytes {
    encode_call(
        "approve(address,uint256)",
        vec![Token::Address(spender), Token::Uint(amount)],
    )
}
