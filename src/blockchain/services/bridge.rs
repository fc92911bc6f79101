// src/blockchain/services/bridge.rs
//
// Calldata for the opBNB standard bridge pair (L1 on bsc, L2 on opBNB).

use super::token::encode_call;
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, U256};

pub const L1_STANDARD_BRIDGE: &str = "0xF05F0e4362859c3331Cb9395CBC201E3Fa6757Ea";
pub const L2_STANDARD_BRIDGE: &str = "0x4200000000000000000000000000000000000010";
/// Legacy ERC-20 representation of the native token on the L2.
pub const L2_NATIVE_TOKEN: &str = "0xDeadDeAddeAddEAddeadDEaDDEAdDeaDDeAD0000";
pub const MIN_GAS_LIMIT: u32 = 1;

fn min_gas() -> Token {
    Token::Uint(U256::from(MIN_GAS_LIMIT))
}

fn empty_extra_data() -> Token {
    Token::Bytes(Vec::new())
}

pub fn deposit_eth_data() -> Bytes {
    encode_call("depositETH(uint32,bytes)", vec![min_gas(), empty_extra_data()])
}

pub fn deposit_eth_to_data(to: Address) -> Bytes {
    encode_call(
        "depositETHTo(address,uint32,bytes)",
        vec![Token::Address(to), min_gas(), empty_extra_data()],
    )
}

pub fn deposit_erc20_data(l1_token: Address, l2_token: Address, amount: U256) -> Bytes {
    encode_call(
        "depositERC20(address,address,uint256,uint32,bytes)",
        vec![
            Token::Address(l1_token),
            Token::Address(l2_token),
            Token::Uint(amount),
            min_gas(),
            empty_extra_data(),
        ],
    )
}

pub fn deposit_erc20_to_data(l1_token: Address, l2_token: Address, to: Address, amount: U256) -> Bytes {
    encode_call(
        "depositERC20To(address,address,address,uint256,uint32,bytes)",
        vec![
            Token::Address(l1_token),
            Token::Address(l2_token),
            Token::Address(to),
            Token::Uint(amount),
            min_gas(),
            empty_extra_data(),
        ],
    )
}

pub fn withdraw_data(l2_token: Address, amount: U256) -> Bytes {
    encode_call(
        "withdraw(address,uint256,uint32,bytes)",
        vec![
            Token::Address(l2_token),
            Token::Uint(amount),
            min_gas(),
            empty_extra_data(),
        ],
    )
}

pub fn withdraw_to_data(l2_token: Address, to: Address, amount: U256) -> Bytes {
    encode_call(
        "withdrawTo(address,address,uint256,uint32,bytes)",
        vec![
            Token::Address(l2_token),
            Token::Address(to),
            Token::Uint(amount),
            min_gas(),
            empty_extra_data(),
        ],
    )
}

pub fn delegation_fee_data() -> Bytes {
    encode_call("delegationFee()", vec![])
}
