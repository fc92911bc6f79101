//! HTTP adapters for the token, route and name services against a mock server.

use bnb_agent_actions::blockchain::models::RouteStep;
use bnb_agent_actions::blockchain::services::{
    lifi::{AggregatorConfig, LifiClient, RouteAggregator, RouteOptions, RoutesRequest, TokenLookup},
    name_service::{NameResolver, SpaceIdResolver},
};
use ethers::types::{Address, U256};
use mockito::{mock, Matcher};
use serde_json::json;
use std::str::FromStr;

const USDT: &str = "0x55d398326f99059fF775485246999027B3197955";

fn aggregator_config() -> AggregatorConfig {
    AggregatorConfig {
        integrator: "test-suite".into(),
        api_url: mockito::server_url(),
        wallet: Address::from_low_u64_be(7),
        chain_id: 56,
    }
}

#[tokio::test]
async fn token_lookup_parses_metadata() {
    let _m = mock("GET", "/v1/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("chain".into(), "56".into()),
            Matcher::UrlEncoded("token".into(), "USDT".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "address": USDT,
                "symbol": "USDT",
                "decimals": 18,
                "chainId": 56,
                "name": "Tether USD",
                "priceUSD": "1.00"
            })
            .to_string(),
        )
        .create();

    let client = LifiClient::new(mockito::server_url());
    let token = client.lookup(56, "USDT").await.unwrap().unwrap();
    assert_eq!(token.address, USDT);
    assert_eq!(token.decimals, 18);
}

#[tokio::test]
async fn unknown_token_is_none_not_error() {
    let _m = mock("GET", "/v1/token")
        .match_query(Matcher::UrlEncoded("token".into(), "NOPE".into()))
        .with_status(404)
        .with_body(r#"{"message":"Token not found"}"#)
        .create();

    let client = LifiClient::new(mockito::server_url());
    assert!(client.lookup(56, "NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn routes_post_the_request_with_integrator_header() {
    let _m = mock("POST", "/v1/advanced/routes")
        .match_header("x-lifi-integrator", "test-suite")
        .match_body(Matcher::PartialJson(json!({
            "fromChainId": 56,
            "fromAmount": "1000",
            "options": {"order": "RECOMMENDED"}
        })))
        .with_status(200)
        .with_body(
            json!({
                "routes": [{
                    "id": "route-1",
                    "fromAmount": "1000",
                    "toAmount": "990",
                    "steps": []
                }]
            })
            .to_string(),
        )
        .create();

    let request = RoutesRequest {
        from_chain_id: 56,
        to_chain_id: 56,
        from_token_address: format!("{:?}", Address::zero()),
        to_token_address: USDT.into(),
        from_amount: "1000".into(),
        from_address: format!("{:?}", Address::from_low_u64_be(7)),
        options: RouteOptions {
            slippage: 0.005,
            integrator: "test-suite".into(),
            order: "RECOMMENDED".into(),
        },
    };
    let routes = LifiClient::default()
        .routes(&aggregator_config(), &request)
        .await
        .unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].to_amount_value(), U256::from(990));
}

#[tokio::test]
async fn route_errors_carry_the_service_message() {
    let _m = mock("POST", "/v1/advanced/routes")
        .with_status(422)
        .with_body(r#"{"message":"Invalid fromAmount"}"#)
        .create();

    let request = RoutesRequest {
        from_chain_id: 56,
        to_chain_id: 56,
        from_token_address: USDT.into(),
        to_token_address: USDT.into(),
        from_amount: "0".into(),
        from_address: USDT.into(),
        options: RouteOptions {
            slippage: 0.005,
            integrator: "test-suite".into(),
            order: "RECOMMENDED".into(),
        },
    };
    let err = LifiClient::default()
        .routes(&aggregator_config(), &request)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid fromAmount"));
}

#[tokio::test]
async fn step_transaction_is_prepared() {
    let _m = mock("POST", "/v1/advanced/stepTransaction")
        .with_status(200)
        .with_body(
            json!({
                "id": "step-1",
                "transactionRequest": {
                    "to": "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE",
                    "data": "0xabcdef01",
                    "value": "0x0de0b6b3a7640000",
                    "gasLimit": "250000"
                }
            })
            .to_string(),
        )
        .create();

    let step: RouteStep = serde_json::from_value(json!({
        "id": "step-1",
        "tool": "pancakeswap",
        "action": {},
        "estimate": {}
    }))
    .unwrap();
    let prepared = LifiClient::default()
        .step_transaction(&aggregator_config(), &step)
        .await
        .unwrap();
    assert_eq!(prepared.value, U256::exp10(18));
    assert_eq!(prepared.gas_limit, Some(U256::from(250_000u64)));
    assert_eq!(prepared.data.to_vec(), vec![0xab, 0xcd, 0xef, 0x01]);
}

#[tokio::test]
async fn space_id_resolves_bnb_names() {
    let owner = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
    let _m = mock("GET", "/v1/getAddress")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tld".into(), "bnb".into()),
            Matcher::UrlEncoded("domain".into(), "alice".into()),
        ]))
        .with_status(200)
        .with_body(json!({"code": 0, "data": owner}).to_string())
        .create();

    let resolver = SpaceIdResolver::new(mockito::server_url());
    let resolved = resolver.resolve_name("alice.bnb").await.unwrap();
    assert_eq!(resolved, Some(Address::from_str(owner).unwrap()));
}

#[tokio::test]
async fn unregistered_names_resolve_to_none() {
    let _m = mock("GET", "/v1/getAddress")
        .match_query(Matcher::UrlEncoded("domain".into(), "nobody".into()))
        .with_status(200)
        .with_body(json!({"code": 1, "data": null}).to_string())
        .create();

    let resolver = SpaceIdResolver::new(mockito::server_url());
    assert_eq!(resolver.resolve_name("nobody.bnb").await.unwrap(), None);
}
