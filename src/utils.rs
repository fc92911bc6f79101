//! Amount and address helpers shared by the actions and the host bridge.

use crate::error::{ActionError, ActionResult};
use crate::mcp::protocol::{error_codes, Response};
use ethers::types::{Address, U256};
use ethers::utils::{format_units, parse_units, ParseUnits};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};
use std::str::FromStr;

lazy_static! {
    static ref AMOUNT_RE: Regex = Regex::new(r"^\d+(\.\d+)?$").unwrap();
    static ref HEX_ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

/// `0x` followed by exactly 40 hex digits, any case.
pub fn is_hex_address(value: &str) -> bool {
    HEX_ADDRESS_RE.is_match(value)
}

pub fn parse_address(value: &str) -> ActionResult<Address> {
    if !is_hex_address(value) {
        return Err(ActionError::AddressInvalid(value.to_string()));
    }
    Address::from_str(value).map_err(|_| ActionError::AddressInvalid(value.to_string()))
}

/// Parses a human-denominated amount into base units. Zero is rejected.
pub fn parse_amount(amount: &str, decimals: u8) -> ActionResult<U256> {
    let trimmed = amount.trim();
    if !AMOUNT_RE.is_match(trimmed) {
        return Err(ActionError::InvalidAmount(amount.to_string()));
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > decimals as usize {
            return Err(ActionError::InvalidAmount(format!(
                "{} has more than {} decimal places",
                amount, decimals
            )));
        }
    }
    let value: U256 = match parse_units(trimmed, decimals as u32) {
        Ok(ParseUnits::U256(v)) => v,
        Ok(ParseUnits::I256(v)) => v.into_raw(),
        Err(e) => return Err(ActionError::InvalidAmount(format!("{}: {}", amount, e))),
    };
    if value.is_zero() {
        return Err(ActionError::InvalidAmount(format!("{} must be greater than zero", amount)));
    }
    Ok(value)
}

/// Formats base units as a human amount, trimming trailing zeros.
pub fn format_amount(value: U256, decimals: u8) -> String {
    let formatted = format_units(value, decimals as u32).unwrap_or_else(|_| value.to_string());
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
