// src/blockchain/services/staking.rs
//
// Lista DAO liquid staking (BNB -> slisBNB) on bsc.

use super::token::encode_call;
use crate::blockchain::models::WithdrawalRequest;
use anyhow::{anyhow, Result};
use ethers_core::abi::{decode, ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};

pub const STAKE_MANAGER: &str = "0x1adB950d8bB3dA4bE104211D5AB038628e477fE6";
pub const SLIS_BNB: &str = "0xB0b84D294e0C75A6abe60171b70edEb2EFd14A1B";

pub fn deposit_data() -> Bytes {
    encode_call("deposit()", vec![])
}

pub fn request_withdraw_data(amount_in_slis_bnb: U256) -> Bytes {
    encode_call("requestWithdraw(uint256)", vec![Token::Uint(amount_in_slis_bnb)])
}

pub fn withdrawal_requests_data(user: Address) -> Bytes {
    encode_call("getUserWithdrawalRequests(address)", vec![Token::Address(user)])
}

pub fn request_status_data(user: Address, idx: usize) -> Bytes {
    encode_call(
        "getUserRequestStatus(address,uint256)",
        vec![Token::Address(user), Token::Uint(U256::from(idx))],
    )
}

pub fn claim_withdraw_data(idx: usize) -> Bytes {
    encode_call("claimWithdraw(uint256)", vec![Token::Uint(U256::from(idx))])
}

fn request_tuple() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
    ])
}

pub fn decode_withdrawal_requests(data: &[u8]) -> Result<Vec<WithdrawalRequest>> {
    let tokens = decode(&[ParamType::Array(Box::new(request_tuple()))], data)?;
    let Some(Token::Array(items)) = tokens.into_iter().next() else {
        return Err(anyhow!("expected an array of withdrawal requests"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Token::Tuple(fields) => match fields.as_slice() {
                [Token::Uint(uuid), Token::Uint(amount), Token::Uint(start)] => {
                    Ok(WithdrawalRequest {
                        uuid: *uuid,
                        amount_in_slis_bnb: *amount,
                        start_time: *start,
                    })
                }
                _ => Err(anyhow!("malformed withdrawal request tuple")),
            },
            _ => Err(anyhow!("malformed withdrawal request entry")),
        })
        .collect()
}

/// Decodes `(bool isClaimable, uint256 amount)`.
pub fn decode_request_status(data: &[u8]) -> Result<(bool, U256)> {
    let tokens = decode(&[ParamType::Bool, ParamType::Uint(256)], data)?;
    match tokens.as_slice() {
        [Token::Bool(claimable), Token::Uint(amount)] => Ok((*claimable, *amount)),
        _ => Err(anyhow!("malformed request status")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::abi::encode;

    #[test]
    fn decodes_request_list() {
        let encoded = encode(&[Token::Array(vec![
            Token::Tuple(vec![
                Token::Uint(U256::from(7u64)),
                Token::Uint(U256::exp10(18)),
                Token::Uint(U256::from(1_700_000_000u64)),
            ]),
            Token::Tuple(vec![
                Token::Uint(U256::from(8u64)),
                Token::Uint(U256::from(5u64)),
                Token::Uint(U256::from(1_700_000_100u64)),
            ]),
        ])]);
        let requests = decode_withdrawal_requests(&encoded).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].uuid, U256::from(7u64));
        assert_eq!(requests[1].amount_in_slis_bnb, U256::from(5u64));
    }

    #[test]
    fn decodes_status_pair() {
        let encoded = encode(&[Token::Bool(true), Token::Uint(U256::from(42u64))]);
        assert_eq!(decode_request_status(&encoded).unwrap(), (true, U256::from(42u64)));
    }
}
