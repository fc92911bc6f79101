//! opBNB standard bridge orchestration.

mod common;

use bnb_agent_actions::actions::{bridge::BridgeAction, Action, ActionCallback};
use bnb_agent_actions::blockchain::services::bridge::{
    delegation_fee_data, deposit_erc20_data, deposit_eth_data, deposit_eth_to_data, withdraw_data,
    L1_STANDARD_BRIDGE, L2_NATIVE_TOKEN, L2_STANDARD_BRIDGE,
};
use common::*;
use ethers::types::U256;
use serde_json::{json, Value};

const OPBNB_USDT: &str = "0x9e5AAC1Ba1a2e6aEd6b32689DFcF62A509Ca96f3";

async fn run(harness: &Harness, params: Value) -> (bool, ActionCallback) {
    let ctx = harness.context();
    let mut delivered = None;
    let ok = BridgeAction
        .handle(&ctx, "", &params, &mut |cb| delivered = Some(cb))
        .await;
    (ok, delivered.expect("callback fired"))
}

#[tokio::test]
async fn native_deposit_to_self_uses_deposit_eth() {
    let harness = Harness::default();

    let (ok, cb) = run(
        &harness,
        json!({"fromChain": "bsc", "toChain": "opBNB", "amount": "0.1"}),
    )
    .await;

    assert!(ok, "{}", cb.text);
    assert_eq!(cb.content["method"], "depositETH");
    assert_eq!(cb.content["recipient"], TEST_ADDRESS);
    let sent = harness.chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chain, "bsc");
    assert_eq!(sent[0].to, Some(addr(L1_STANDARD_BRIDGE)));
    assert_eq!(sent[0].data, deposit_eth_data());
    assert_eq!(sent[0].value, U256::exp10(17));
}

#[tokio::test]
async fn native_deposit_to_someone_else_uses_deposit_eth_to() {
    let harness = Harness::default();

    let (ok, cb) = run(
        &harness,
        json!({"fromChain": "bsc", "toChain": "opBNB", "amount": "1", "toAddress": RECIPIENT}),
    )
    .await;

    assert!(ok, "{}", cb.text);
    assert_eq!(cb.content["method"], "depositETHTo");
    assert_eq!(harness.chain.sent()[0].data, deposit_eth_to_data(addr(RECIPIENT)));
}

#[tokio::test]
async fn native_withdrawal_pays_amount_plus_delegation_fee() {
    let harness = Harness::default();
    let fee = U256::from(1_000_000_000_000u64);
    harness.chain.respond(delegation_fee_data(), uint(fee));

    let (ok, cb) = run(
        &harness,
        json!({"fromChain": "opBNB", "toChain": "bsc", "amount": "0.5"}),
    )
    .await;

    assert!(ok, "{}", cb.text);
    assert_eq!(cb.content["method"], "withdraw");
    let sent = harness.chain.sent();
    assert_eq!(sent[0].chain, "opBNB");
    assert_eq!(sent[0].to, Some(addr(L2_STANDARD_BRIDGE)));
    assert_eq!(sent[0].value, U256::exp10(17) * 5 + fee);
    assert_eq!(sent[0].data, withdraw_data(addr(L2_NATIVE_TOKEN), U256::exp10(17) * 5));
}

#[tokio::test]
async fn erc20_deposit_approves_the_l1_bridge_first() {
    let harness = Harness {
        tokens: FakeTokens::default().with("USDT", USDT, 18),
        ..Harness::default()
    };

    let (ok, cb) = run(
        &harness,
        json!({
            "fromChain": "bsc",
            "toChain": "opBNB",
            "fromToken": "USDT",
            "toToken": OPBNB_USDT,
            "amount": "3"
        }),
    )
    .await;

    assert!(ok, "{}", cb.text);
    assert_eq!(cb.content["method"], "depositERC20");
    let sent = harness.chain.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].calls("approve(address,uint256)"));
    assert_eq!(sent[0].to, Some(addr(USDT)));
    assert_eq!(sent[1].data, deposit_erc20_data(addr(USDT), addr(OPBNB_USDT), ether(3)));
    assert!(sent[1].value.is_zero());
    assert_eq!(
        harness.chain.allowance(addr(USDT), own(), addr(L1_STANDARD_BRIDGE)),
        ether(3)
    );
}

#[tokio::test]
async fn only_bsc_and_opbnb_are_bridged() {
    let harness = Harness::default();
    let (ok, cb) = run(
        &harness,
        json!({"fromChain": "bsc", "toChain": "bscTestnet", "amount": "1"}),
    )
    .await;
    assert!(!ok);
    assert_eq!(cb.content["kind"], "UnsupportedDirection");
    assert!(harness.chain.sent().is_empty());
}

#[tokio::test]
async fn simulation_revert_stops_before_sending() {
    let harness = Harness::default();
    harness.chain.revert_on("depositETH(uint32,bytes)");

    let (ok, cb) = run(
        &harness,
        json!({"fromChain": "bsc", "toChain": "opBNB", "amount": "0.1"}),
    )
    .await;
    assert!(!ok);
    assert_eq!(cb.content["kind"], "TransactionFailed");
    assert!(harness.chain.sent().is_empty());
}
